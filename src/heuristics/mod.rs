pub mod fiscal_period;
pub mod roster;

pub use fiscal_period::*;
pub use roster::*;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for transcript analysis.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of leading lines searched for fiscal-period hints and analyst names
    pub header_lines: usize,
    /// Case-insensitive substring marking a header line as naming an analyst
    pub roster_trigger: String,
    /// Line prefixes (case-sensitive) that end an analyst's question
    pub closing_markers: Vec<String>,
    /// Use these analyst names instead of detecting them from each header
    pub fixed_roster: Option<Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            header_lines: 20,
            roster_trigger: "analyst".to_string(),
            closing_markers: vec!["Operator".to_string()],
            fixed_roster: None,
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse analysis config")
    }

    /// Add spokesperson names as closing markers, skipping blanks and duplicates
    pub fn with_spokespeople<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into().trim().to_string();
            if !name.is_empty() && !self.closing_markers.contains(&name) {
                self.closing_markers.push(name);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.header_lines, 20);
        assert_eq!(config.roster_trigger, "analyst");
        assert_eq!(config.closing_markers, vec!["Operator".to_string()]);
        assert!(config.fixed_roster.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"closing_markers": ["Operator", "Matt Baer"]}"#).unwrap();
        assert_eq!(config.header_lines, 20);
        assert_eq!(config.closing_markers.len(), 2);
    }

    #[test]
    fn test_with_spokespeople_dedups() {
        let config = AnalysisConfig::default().with_spokespeople(["Dana Park", "Operator", " ", "Dana Park"]);
        assert_eq!(
            config.closing_markers,
            vec!["Operator".to_string(), "Dana Park".to_string()]
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"header_lines": 5, "fixed_roster": ["Jane Doe"]}"#).unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(config.header_lines, 5);
        assert_eq!(config.fixed_roster, Some(vec!["Jane Doe".to_string()]));
    }
}
