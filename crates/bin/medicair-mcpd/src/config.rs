use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use medicair_db::DatabaseConfig;

const DEFAULT_DB_PATH: &str = ":memory:";
const DEFAULT_WIDGET_DIR: &str = "public";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";

#[derive(Parser, Debug)]
#[command(name = "medicair-mcpd", version, about = "MedicAir MCP daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    /// DuckDB path, `:memory:`, or a `md:` MotherDuck database.
    #[arg(long, env = "MEDICAIR_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: String,

    #[arg(long, env = "MOTHERDUCK_TOKEN")]
    motherduck_token: Option<String>,

    #[arg(long, env = "MEDICAIR_HOME_DIR")]
    home_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "MEDICAIR_SAAS_MODE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    saas_mode: bool,

    #[arg(
        long,
        env = "MEDICAIR_READ_ONLY",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    read_only: bool,

    /// Directory holding the query-results widget asset.
    #[arg(long, env = "MEDICAIR_WIDGET_DIR", default_value = DEFAULT_WIDGET_DIR)]
    widget_dir: PathBuf,

    #[arg(
        long = "stdio",
        env = "MEDICAIR_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "MEDICAIR_HTTP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    http_serve: bool,

    #[arg(long, env = "MEDICAIR_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ServerConfig {
    pub db_path: String,
    pub motherduck_token: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub saas_mode: bool,
    pub read_only: bool,
    pub widget_dir: PathBuf,
    pub enable_stdio: bool,
    pub http_serve: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    /// Connection settings for the query backend.
    #[must_use]
    pub fn database_config(&self) -> DatabaseConfig {
        let mut config = DatabaseConfig::new(self.db_path.clone())
            .with_saas_mode(self.saas_mode)
            .with_read_only(self.read_only);
        if let Some(token) = &self.motherduck_token {
            config = config.with_motherduck_token(token.clone());
        }
        if let Some(home_dir) = &self.home_dir {
            config = config.with_home_dir(home_dir.clone());
        }
        config
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let motherduck_token = args.motherduck_token.filter(|value| !value.trim().is_empty());

        if args.db_path.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "MEDICAIR_DB_PATH",
                value: args.db_path,
            });
        }
        if args.saas_mode && motherduck_token.is_none() {
            return Err(ConfigError::MissingSetting("MOTHERDUCK_TOKEN"));
        }
        if !args.enable_stdio && !args.http_serve {
            return Err(ConfigError::InvalidSetting {
                name: "MEDICAIR_ENABLE_STDIO/MEDICAIR_HTTP_SERVE",
                value: "both transports disabled".to_string(),
            });
        }

        Ok(Self {
            db_path: args.db_path,
            motherduck_token,
            home_dir: args.home_dir,
            saas_mode: args.saas_mode,
            read_only: args.read_only,
            widget_dir: args.widget_dir,
            enable_stdio: args.enable_stdio,
            http_serve: args.http_serve,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}
