// targets.rs - Resolve the ordered list of domains to scan

use crate::config::TargetSelection;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

/// Expand a target selection into the domains to process, in order.
/// A single target is passed through unvalidated; the tools do their own checks.
pub fn load_targets(selection: &TargetSelection) -> Result<Vec<String>, ConfigError> {
    match selection {
        TargetSelection::Single(domain) => Ok(vec![domain.clone()]),
        TargetSelection::List(path) => read_target_list(path),
    }
}

/// Read a line-delimited target list. Blank lines are dropped, duplicates are kept.
pub fn read_target_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ListNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::ListUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_target_lines(&content))
}

fn parse_target_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_single_target_passes_through() {
        let targets = load_targets(&TargetSelection::Single("203.0.113.5".into())).unwrap();
        assert_eq!(targets, vec!["203.0.113.5".to_string()]);
    }

    #[test]
    fn test_list_skips_blank_lines_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("targets.txt");
        fs::write(&list, "b.example.com\n\n  a.example.com  \n").unwrap();

        let targets = load_targets(&TargetSelection::List(list)).unwrap();
        assert_eq!(targets, vec!["b.example.com", "a.example.com"]);
    }

    #[test]
    fn test_list_keeps_duplicates() {
        let targets = parse_target_lines("x.com\nx.com\n\t\n");
        assert_eq!(targets, vec!["x.com", "x.com"]);
    }

    #[test]
    fn test_missing_list_is_config_error() {
        let err = load_targets(&TargetSelection::List(PathBuf::from("/nonexistent/list.txt")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ListNotFound(_)));
    }
}
