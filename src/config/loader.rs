//! Configuration file loading.

use crate::config::schema::RunnerConfig;
use crate::error::{FlowError, Result};
use std::fs;
use std::path::Path;

/// Load a runner configuration file.
pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FlowError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            FlowError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`RunnerConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<RunnerConfig> {
    if content.trim().is_empty() {
        return Ok(RunnerConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| FlowError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("runner.yml");
        fs::write(&path, "settings:\n  batch_size: 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.settings["batch_size"], 10);
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.yml");
        assert!(matches!(
            load_config(&path),
            Err(FlowError::ConfigNotFound { path: p }) if p == path
        ));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = parse_config("log_events: [", Path::new("bad.yml")).unwrap_err();
        match err {
            FlowError::ConfigParseError { path, message } => {
                assert_eq!(path, Path::new("bad.yml"));
                assert!(!message.is_empty());
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_field_type_is_parse_error() {
        let result = parse_config("log_events: sometimes", Path::new("x.yml"));
        assert!(matches!(result, Err(FlowError::ConfigParseError { .. })));
    }

    #[test]
    fn empty_content_is_default() {
        let config = parse_config("  \n", Path::new("empty.yml")).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }
}
