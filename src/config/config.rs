//! TOML configuration of the parser's naming and execution policies.

use crate::error::{ArgsError, ArgsResult};
use crate::executor::OnErrorStrategy;
use crate::naming::{Case, Splicer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Parser options.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```toml
/// arg_case = "kebab_lower"
/// strategy = "post_runners"
/// globals_enabled = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Case of derived flag names
    pub arg_case: Case,
    /// Case of derived environment variable names
    pub env_case: Case,
    /// Case of derived subcommand names
    pub cmd_case: Case,
    /// Joins a group prefix and a flag name
    pub arg_splicer: Splicer,
    /// Joins a group prefix and an environment variable name
    pub env_splicer: Splicer,
    /// How hook failures interact with the remaining hooks
    pub strategy: OnErrorStrategy,
    /// Propagate `global` flags to descendant subcommands
    pub globals_enabled: bool,
    /// Fill absent flags from their environment variable
    pub env_fallback: bool,
    /// Coerce default literals into absent flags
    pub apply_defaults: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            arg_case: Case::CamelLower,
            env_case: Case::SnakeUpper,
            cmd_case: Case::Lower,
            arg_splicer: Splicer::Dot,
            env_splicer: Splicer::Underscore,
            strategy: OnErrorStrategy::Break,
            globals_enabled: false,
            env_fallback: false,
            apply_defaults: true,
        }
    }
}

impl ParserConfig {
    /// Parse from TOML text
    pub fn from_toml_str(content: &str) -> ArgsResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> ArgsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ArgsError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            ArgsError::config(format!("Failed to parse TOML config {}: {e}", path.display()))
        })
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> ArgsResult<String> {
        toml::to_string(self).map_err(|e| ArgsError::config(e.to_string()))
    }

    /// Case policy for flag names
    pub fn with_arg_case(mut self, case: Case) -> Self {
        self.arg_case = case;
        self
    }

    /// Case policy for environment variable names
    pub fn with_env_case(mut self, case: Case) -> Self {
        self.env_case = case;
        self
    }

    /// Case policy for subcommand names
    pub fn with_cmd_case(mut self, case: Case) -> Self {
        self.cmd_case = case;
        self
    }

    /// Splicer joining nested flag names
    pub fn with_arg_splicer(mut self, splicer: Splicer) -> Self {
        self.arg_splicer = splicer;
        self
    }

    /// Splicer joining nested environment variable names
    pub fn with_env_splicer(mut self, splicer: Splicer) -> Self {
        self.env_splicer = splicer;
        self
    }

    /// Set the execution strategy for handling hook errors
    pub fn with_on_error_strategy(mut self, strategy: OnErrorStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable global arguments
    pub fn with_globals_enabled(mut self) -> Self {
        self.globals_enabled = true;
        self
    }

    /// Read unset arguments from their environment variables
    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    /// Leave unset arguments at their current value
    pub fn without_defaults(mut self) -> Self {
        self.apply_defaults = false;
        self
    }
}

/// Loads a [`ParserConfig`] from disk, falling back to defaults.
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    /// Path the configuration was (or would have been) read from
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: ParserConfig,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None or missing, uses defaults.
    pub fn new(config_path: Option<&Path>) -> ArgsResult<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config/argbind.toml"));

        let config = if config_path.exists() {
            ParserConfig::from_toml_file(&config_path)?
        } else {
            ParserConfig::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.arg_case, Case::CamelLower);
        assert_eq!(config.env_case, Case::SnakeUpper);
        assert_eq!(config.cmd_case, Case::Lower);
        assert_eq!(config.arg_splicer, Splicer::Dot);
        assert_eq!(config.env_splicer, Splicer::Underscore);
        assert_eq!(config.strategy, OnErrorStrategy::Break);
        assert!(!config.globals_enabled);
        assert!(config.apply_defaults);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ParserConfig::from_toml_str(
            r#"
arg_case = "kebab_lower"
strategy = "post_runners_continue"
globals_enabled = true
"#,
        )
        .unwrap();

        assert_eq!(config.arg_case, Case::KebabLower);
        assert_eq!(config.strategy, OnErrorStrategy::PostRunnersContinue);
        assert!(config.globals_enabled);
        assert_eq!(config.env_case, Case::SnakeUpper);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ParserConfig::from_toml_str("strategy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ArgsError::Config(_)));
    }

    #[test]
    fn test_builder_round_trip() {
        let config = ParserConfig::default()
            .with_arg_case(Case::SnakeLower)
            .with_on_error_strategy(OnErrorStrategy::Continue)
            .with_env_fallback();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ParserConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_loader_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cmd_case = \"kebab_lower\"").unwrap();

        let loader = ConfigurationLoader::new(Some(file.path())).unwrap();
        assert_eq!(loader.config.cmd_case, Case::KebabLower);
    }

    #[test]
    fn test_loader_missing_file_uses_defaults() {
        let loader = ConfigurationLoader::new(Some(Path::new("/nonexistent/argbind.toml"))).unwrap();
        assert_eq!(loader.config, ParserConfig::default());
    }
}
