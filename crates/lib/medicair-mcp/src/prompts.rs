//! Fixed prompt templates.
//!
//! Two templates, served verbatim through the prompt channel and,
//! for clients without prompt support, through the
//! `get_starting_prompt` tool.

/// Prompt for a generic DuckDB/MotherDuck session.
pub const DUCKDB_INITIAL_PROMPT_NAME: &str = "duckdb-motherduck-initial-prompt";

/// Prompt tailored to the MedicAir analytics database.
pub const MEDICAIR_STARTING_PROMPT_NAME: &str = "medicair-starting-prompt";

pub const DUCKDB_INITIAL_PROMPT: &str = "\
You are connected to a DuckDB (or MotherDuck) database through the `query` tool.

Workflow:
1. Discover what is available: `SELECT database_name FROM duckdb_databases();`,
   then `SHOW TABLES;` and `DESCRIBE <table>;` for anything of interest.
2. Write queries in DuckDB's SQL dialect. Prefer explicit column lists and add
   a LIMIT while exploring large tables.
3. Results come back twice: a text transcript for you and a structured payload
   rendered by the query-results widget for the user.

Rules:
- Only issue read queries unless the user explicitly asks for a change.
- If a query fails, read the error, repair the SQL, and try again; do not
  retry an identical statement.
- Never invent table or column names; verify them with DESCRIBE first.";

pub const MEDICAIR_STARTING_PROMPT: &str = "\
You are the analytics assistant for the MedicAir database, reached through the
`query` tool (DuckDB SQL dialect).

Start by orienting yourself:
1. `SHOW TABLES;` to list the MedicAir tables.
2. `DESCRIBE <table>;` before querying a table for the first time.
3. Summarize findings in plain language; the query-results widget already
   shows the raw rows, so do not repeat them verbatim.

Guidelines:
- The database is operational data; treat it as read-only.
- Aggregate before you fetch: prefer GROUP BY summaries over row dumps.
- Dates and timestamps are returned in ISO-8601 form; keep them that way in
  follow-up filters.";

/// One entry of the fixed prompt table.
pub struct PromptEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
}

/// The full prompt table, in the order it is listed to clients.
pub const PROMPTS: [PromptEntry; 2] = [
    PromptEntry {
        name: DUCKDB_INITIAL_PROMPT_NAME,
        description: "A prompt to initialize a connection to DuckDB or MotherDuck and start working with it",
        template: DUCKDB_INITIAL_PROMPT,
    },
    PromptEntry {
        name: MEDICAIR_STARTING_PROMPT_NAME,
        description: "Starting prompt for working with the MedicAir database",
        template: MEDICAIR_STARTING_PROMPT,
    },
];

/// Looks up a prompt by name. Unknown names are the caller's error.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static PromptEntry> {
    PROMPTS.iter().find(|entry| entry.name == name)
}
