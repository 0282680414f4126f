mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use tracing::debug;

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            report_file: default_report_file(),
            state_file: default_state_file(),
            log_dir: default_log_dir(),
            preview_rows: default_preview_rows(),
            concurrency: default_concurrency(),
            llm: LlmConfig::default(),
            executor: ExecutorConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.preview_rows == 0 {
            return Err(ConfigError::Invalid("preview_rows must be at least 1".into()));
        }
        if self.executor.timeout_sec == 0 {
            return Err(ConfigError::Invalid(
                "executor.timeout_sec must be at least 1".into(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_match_reference_layout() {
        let config = Config::default();
        assert_eq!(config.input_dir, PathBuf::from("data/raw"));
        assert_eq!(config.output_dir, PathBuf::from("data/clean"));
        assert_eq!(config.report_file, PathBuf::from("processing_report.json"));
        assert_eq!(config.executor.timeout_sec, 30);
        assert_eq!(config.concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "input_dir: inbox\nexecutor:\n  timeout_sec: 5\nllm:\n  model: gemini-2.5-pro"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("inbox"));
        assert_eq!(config.output_dir, PathBuf::from("data/clean"));
        assert_eq!(config.executor.timeout_sec, 5);
        assert_eq!(config.executor.script_name, "temp_agent_script.py");
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.preview_rows, 5);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = Config {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_blank_model() {
        let mut config = Config::default();
        config.llm.model = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
