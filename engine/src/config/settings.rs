// Engine settings, optionally loaded from a JSON file passed on the command line
use crate::data::docx::DEFAULT_HIGHLIGHT_FILL;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Hex fill colour written into `w:shd` on every rewritten run.
    pub highlight_fill: String,
    /// Appended to the file stem when writing a copy instead of overwriting.
    pub copy_suffix: String,
    /// Seconds between "still processing" heartbeats in the CLI.
    pub progress_interval_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            highlight_fill: DEFAULT_HIGHLIGHT_FILL.to_string(),
            copy_suffix: "_formatted".to_string(),
            progress_interval_secs: 2,
        }
    }
}

impl EngineSettings {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to load settings from '{}'", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: EngineSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let fill = self.highlight_fill.as_str();
        if fill.len() != 6 || !fill.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("highlight_fill must be a 6-digit hex colour, got '{}'", fill);
        }
        if self.progress_interval_secs == 0 {
            anyhow::bail!("progress_interval_secs must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings = EngineSettings::from_json(r#"{ "highlight_fill": "00FF00" }"#).unwrap();
        assert_eq!(settings.highlight_fill, "00FF00");
        assert_eq!(settings.copy_suffix, "_formatted");
        assert_eq!(settings.progress_interval_secs, 2);
    }

    #[test]
    fn test_empty_object_is_default() {
        let settings = EngineSettings::from_json("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.highlight_fill, DEFAULT_HIGHLIGHT_FILL);
    }

    #[test]
    fn test_rejects_bad_colour() {
        let err = EngineSettings::from_json(r#"{ "highlight_fill": "yellow" }"#).unwrap_err();
        assert!(err.to_string().contains("highlight_fill"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        assert!(EngineSettings::from_json(r#"{ "progress_interval_secs": 0 }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "copy_suffix": "_grouped" }}"#).unwrap();
        let settings = EngineSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.copy_suffix, "_grouped");
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = EngineSettings::load_from_file(Path::new("no_such_settings.json")).unwrap_err();
        assert!(err.to_string().contains("no_such_settings.json"));
    }
}
