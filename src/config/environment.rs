//! Environment variable lookup for flag fallbacks.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolves environment variables for absent flags.
///
/// Values set with [`EnvironmentLoader::with_var`] shadow the process
/// environment, which keeps tests independent of the host.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentLoader {
    env_file: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to a .env file loaded into the process environment.
    ///   Nothing is loaded when None.
    pub fn new(env_file: Option<&Path>) -> Self {
        // Only load a .env file if an explicit path was provided, so unrelated
        // .env files in the working directory never leak into flag values.
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    warn!("Failed to load .env file {}: {}", path.display(), e);
                }
            }
        }

        Self {
            env_file: env_file.map(Path::to_path_buf),
            overrides: HashMap::new(),
        }
    }

    /// Shadow a variable without touching the process environment
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// The .env file this loader was created with
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Value of `name`, empty names never match
    pub fn var(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_override_shadows_process() {
        let env_loader = EnvironmentLoader::default().with_var("ARGBIND_TEST_SHADOW", "shadowed");
        assert_eq!(
            env_loader.var("ARGBIND_TEST_SHADOW"),
            Some("shadowed".to_string())
        );
        assert_eq!(env_loader.var(""), None);
    }

    #[test]
    fn test_env_file_loading() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ARGBIND_TEST_FROM_FILE=loaded").unwrap();

        let env_loader = EnvironmentLoader::new(Some(file.path()));
        assert_eq!(env_loader.env_file(), Some(file.path()));
        assert_eq!(
            env_loader.var("ARGBIND_TEST_FROM_FILE"),
            Some("loaded".to_string())
        );
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let env_loader = EnvironmentLoader::new(Some(Path::new("/nonexistent/.env")));
        assert_eq!(env_loader.var("ARGBIND_TEST_NEVER_SET"), None);
    }
}
