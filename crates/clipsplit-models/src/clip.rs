//! Clip artifact model.

use serde::{Deserialize, Serialize};

/// One output media file inside a run workspace.
///
/// `path` is the sole addressable identifier for rename/delete/merge/
/// thumbnail/share operations. It is always relative to the output root
/// and forward-slash separated regardless of host path conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Displayable file name.
    pub name: String,
    /// Path relative to the output root (`<workspace>/<file>`).
    pub path: String,
}

impl Clip {
    /// Build a clip from its workspace directory name and file name.
    pub fn new(workspace_name: &str, file_name: &str) -> Self {
        Self {
            name: file_name.to_string(),
            path: format!("{workspace_name}/{file_name}"),
        }
    }
}
