use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON settings file.
pub const SETTINGS_ENV: &str = "BUSINESS_REPORT_SETTINGS";

/// Report texts and output locations. Every field may be omitted in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Centered bold heading on the page.
    pub title: String,
    /// Body text used when the summary is empty.
    pub summary_placeholder: String,
    /// Suggested name in the "Save report" dialog.
    pub download_file_name: String,
    /// Parent of the per-session directories; system temp dir when unset.
    pub temp_root: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "AI-Based Business Report".to_string(),
            summary_placeholder: "No summary available.".to_string(),
            download_file_name: "AI_Business_Report.pdf".to_string(),
            temp_root: None,
        }
    }
}

impl ReportSettings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Settings from `BUSINESS_REPORT_SETTINGS`, or defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "title": "Quarterly Review" }"#).unwrap();

        let settings = ReportSettings::load(&path).unwrap();
        assert_eq!(settings.title, "Quarterly Review");
        assert_eq!(settings.summary_placeholder, "No summary available.");
        assert_eq!(settings.download_file_name, "AI_Business_Report.pdf");
        assert_eq!(settings.temp_root(), std::env::temp_dir());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ title: ").unwrap();
        assert!(ReportSettings::load(&path).is_err());
    }
}
