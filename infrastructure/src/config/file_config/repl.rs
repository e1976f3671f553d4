//! REPL configuration from TOML (`[repl]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show a spinner until the first answer fragment arrives
    pub show_progress: bool,
    /// Path to the line-editor history file; `~/` is expanded
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl FileReplConfig {
    /// Resolved history file path, if one is configured.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.as_deref().map(expand_home)
    }
}

pub(crate) fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_kept() {
        let config = FileReplConfig {
            history_file: Some("/tmp/basilisk_history".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/basilisk_history"))
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = FileReplConfig {
            history_file: Some("~/.basilisk_history".to_string()),
            ..Default::default()
        };
        let path = config.history_path().unwrap();
        assert!(path.ends_with(".basilisk_history"));
        if let Some(home) = dirs::home_dir() {
            assert!(path.starts_with(home));
        }
    }
}
