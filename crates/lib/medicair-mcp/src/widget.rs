//! Static asset store for the query-results widget.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use rmcp::model::{AnnotateAble, RawResource, Resource};

/// Virtual URI the widget is advertised and addressed under.
pub const WIDGET_URI: &str = "ui://widget/query-results.html";

/// Canonical logical path of the widget.
pub const WIDGET_PATH: &str = "widget/query-results.html";

/// Media type expected by Apps-SDK style widget hosts.
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

/// Filename of the widget body on disk, relative to the asset root.
const WIDGET_ASSET: &str = "query-results-widget.html";

#[derive(Debug)]
pub enum WidgetError {
    UnknownPath(String),
    AssetMissing(PathBuf),
    Io { path: PathBuf, message: String },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPath(path) => write!(f, "unknown UI resource path: {path}"),
            Self::AssetMissing(path) => {
                write!(f, "widget asset not found: {}", path.display())
            }
            Self::Io { path, message } => {
                write!(f, "failed to read widget asset {}: {message}", path.display())
            }
        }
    }
}

impl Error for WidgetError {}

/// Loads widget bodies from a directory under the deployment root.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    root: PathBuf,
}

impl WidgetStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads the widget body for a logical UI path.
    ///
    /// # Errors
    /// Fails closed: paths that do not name the widget are rejected,
    /// and a missing asset file is an error rather than a panic.
    pub fn load(&self, logical_path: &str) -> Result<String, WidgetError> {
        if !is_widget_path(logical_path) {
            return Err(WidgetError::UnknownPath(logical_path.to_string()));
        }
        let asset = self.root.join(WIDGET_ASSET);
        if !asset.exists() {
            return Err(WidgetError::AssetMissing(asset));
        }
        tracing::debug!(asset = %asset.display(), "loading widget body");
        std::fs::read_to_string(&asset).map_err(|err| WidgetError::Io {
            path: asset,
            message: err.to_string(),
        })
    }
}

/// The widget is the only UI resource this server serves; exact,
/// suffix, and fragment matches are all accepted.
fn is_widget_path(path: &str) -> bool {
    path == WIDGET_PATH || path.ends_with("query-results.html") || path.contains("query-results")
}

/// Descriptor advertised through `resources/list`.
#[must_use]
pub fn resource_descriptor() -> Resource {
    let mut raw = RawResource::new(WIDGET_URI, "Query Results Widget");
    raw.description = Some("Widget HTML used to render SQL query results.".to_string());
    raw.mime_type = Some(WIDGET_MIME_TYPE.to_string());
    raw.no_annotation()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_asset(body: &str) -> (tempfile::TempDir, WidgetStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(WIDGET_ASSET), body).expect("write asset");
        let store = WidgetStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn canonical_path_loads_the_asset() {
        let (_dir, store) = store_with_asset("<html>widget</html>");
        assert_eq!(store.load(WIDGET_PATH).expect("loads"), "<html>widget</html>");
    }

    #[test]
    fn suffix_and_fragment_paths_are_accepted() {
        let (_dir, store) = store_with_asset("body");
        assert!(store.load("apps/query-results.html").is_ok());
        assert!(store.load("query-results").is_ok());
    }

    #[test]
    fn unknown_paths_fail_closed() {
        let (_dir, store) = store_with_asset("body");
        assert!(matches!(
            store.load("widget/other.html"),
            Err(WidgetError::UnknownPath(_))
        ));
    }

    #[test]
    fn missing_asset_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = WidgetStore::new(dir.path());
        assert!(matches!(
            store.load(WIDGET_PATH),
            Err(WidgetError::AssetMissing(_))
        ));
    }
}
