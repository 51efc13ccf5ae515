use autoletter_preview::{Envelope, SampleValues};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "autoletter.config.json";

/// Autoletter configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Preview values layered over the built-in samples
    #[serde(default)]
    pub sample_values: BTreeMap<String, String>,

    #[serde(default)]
    pub from_name: String,

    #[serde(default)]
    pub from_email: String,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn samples(&self) -> SampleValues {
        SampleValues::default().with_overrides(self.sample_values.clone())
    }

    pub fn envelope(&self, subject: Option<String>, preview_text: Option<String>) -> Envelope {
        Envelope {
            from_name: self.from_name.clone(),
            from_email: self.from_email.clone(),
            subject: subject.unwrap_or_default(),
            preview_text: preview_text.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "sampleValues": { "firstName": "Ada", "plan": "Pro" },
            "fromName": "Dana",
            "fromEmail": "dana@acme.io"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.from_name, "Dana");
        assert_eq!(config.from_email, "dana@acme.io");

        let samples = config.samples();
        assert_eq!(samples.get("firstName"), Some("Ada"));
        assert_eq!(samples.get("plan"), Some("Pro"));
        assert_eq!(samples.get("company"), Some("Acme Corp"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sample_values.is_empty());
        assert_eq!(config.samples(), SampleValues::default());
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        assert_eq!(Config::load(&cwd).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"fromName":"Dana"}"#).unwrap();
        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.from_name, "Dana");
        assert_eq!(config.from_email, "");
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();
        assert!(Config::load(&dir.path().display().to_string()).is_err());
    }

    #[test]
    fn test_envelope_from_config() {
        let config = Config {
            from_name: "Dana".to_string(),
            ..Config::default()
        };
        let envelope = config.envelope(Some("Hi".to_string()), None);
        assert_eq!(envelope.from_name, "Dana");
        assert_eq!(envelope.subject, "Hi");
        assert_eq!(envelope.preview_text, "");
    }
}
