//! Configuration loader
//!
//! [`ConfigLoader`] assembles [`Settings`] from TOML files, prefixed
//! environment variables, and the variables set by the deployment platform.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "GKE_NOTIFIER_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "GKE_NOTIFIER_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "GKE_NOTIFIER";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Platform variables mapped onto settings keys, applied last.
const PLATFORM_OVERRIDES: &[(&str, &str)] = &[
    ("SLACK_WEBHOOK", "notifier.webhook_url"),
    ("PROJECT_ID", "notifier.project_id"),
    ("PORT", "server.port"),
];

/// Loader performing layered configuration loading
///
/// Sources, lowest priority first:
/// 1. `default.toml`
/// 2. `{environment}.toml`
/// 3. `local.toml`
/// 4. `GKE_NOTIFIER_*` environment variables
/// 5. `SLACK_WEBHOOK`, `PROJECT_ID` and `PORT`
///
/// In single file mode the three files are replaced by that one file, which
/// must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from the process environment
    ///
    /// Reads `GKE_NOTIFIER_CONFIG_DIR`, `GKE_NOTIFIER_CONFIG_FILE` and
    /// `GKE_NOTIFIER_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both `GKE_NOTIFIER_CONFIG_DIR` and
    /// `GKE_NOTIFIER_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_dir.is_some() && config_file.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "GKE_NOTIFIER_CONFIG_DIR and GKE_NOTIFIER_CONFIG_FILE cannot both be set. \
                 Use GKE_NOTIFIER_CONFIG_DIR for layered configuration or \
                 GKE_NOTIFIER_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Create a loader reading a single configuration file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment detected from `GKE_NOTIFIER_APP_ENV`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load and validate settings from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the single configuration file does not exist
    /// - a source cannot be parsed or deserialized
    /// - the resulting settings fail validation
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let mut settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;
        settings.application.environment = self.environment;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.add_layered_files(builder)?,
        };

        let builder = Self::add_env_source(builder);
        let builder = Self::add_platform_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    fn add_layered_files(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let env_file = format!("{}.toml", self.environment.as_str());

        let mut builder = builder;
        for name in ["default.toml", env_file.as_str(), "local.toml"] {
            builder = Self::add_file_source(builder, &self.config_dir.join(name), false)?;
        }
        Ok(builder)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
    }

    /// `GKE_NOTIFIER_NOTIFIER__WEBHOOK_URL` -> `notifier.webhook_url`
    fn add_env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }

    fn add_platform_overrides(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let mut builder = builder;
        for (var, key) in PLATFORM_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }
        Ok(builder)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests mutate process environment variables and must not interleave
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_VARS: &[&str] = &[
        CONFIG_DIR_ENV,
        CONFIG_FILE_ENV,
        AppEnvironment::ENV_VAR,
        "GKE_NOTIFIER_NOTIFIER__WEBHOOK_URL",
        "GKE_NOTIFIER_NOTIFIER__PROJECT_ID",
        "GKE_NOTIFIER_SERVER__PORT",
        "SLACK_WEBHOOK",
        "PROJECT_ID",
        "PORT",
    ];

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Sets variables for one test and restores the originals on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        /// Start from a clean slate for every variable the loader reads
        fn clean() -> Self {
            let mut guard = Self {
                vars_to_restore: Vec::new(),
            };
            for var in ALL_VARS {
                guard.remove(var);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.vars_to_restore
                .push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_loader_defaults() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_loader_mutual_exclusivity_error() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_without_any_files_uses_defaults() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_layered_files_precedence() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[
            (
                "default.toml",
                "[server]\nport = 3000\n\n[notifier]\nproject_id = \"default-project\"\ntimeout_seconds = 5\n",
            ),
            ("production.toml", "[notifier]\nproject_id = \"prod-project\"\n"),
            ("local.toml", "[server]\nport = 4000\n"),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.notifier.project_id, "prod-project");
        assert_eq!(settings.notifier.timeout_seconds, 5);
    }

    #[test]
    fn test_with_environment_overrides_detection() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[(
            "test.toml",
            "[notifier]\nproject_id = \"test-project\"\n",
        )]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let settings = ConfigLoader::new()
            .unwrap()
            .with_environment(AppEnvironment::Test)
            .load()
            .unwrap();
        assert_eq!(settings.notifier.project_id, "test-project");
        assert_eq!(settings.application.environment, AppEnvironment::Test);
    }

    #[test]
    fn test_prefixed_env_vars_override_files() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", "[server]\nport = 3000\n")]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("GKE_NOTIFIER_SERVER__PORT", "9090");
        env.set(
            "GKE_NOTIFIER_NOTIFIER__WEBHOOK_URL",
            "https://hooks.slack.com/services/T/B/prefixed",
        );

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(
            settings.notifier.webhook_url,
            "https://hooks.slack.com/services/T/B/prefixed"
        );
    }

    #[test]
    fn test_platform_vars_take_precedence() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[(
            "default.toml",
            "[notifier]\nwebhook_url = \"https://example.com/from-file\"\nproject_id = \"file-project\"\n",
        )]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set(
            "GKE_NOTIFIER_NOTIFIER__WEBHOOK_URL",
            "https://example.com/from-prefixed",
        );
        env.set("SLACK_WEBHOOK", "https://hooks.slack.com/services/T/B/platform");
        env.set("PROJECT_ID", "platform-project");
        env.set("PORT", "8181");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(
            settings.notifier.webhook_url,
            "https://hooks.slack.com/services/T/B/platform"
        );
        assert_eq!(settings.notifier.project_id, "platform-project");
        assert_eq!(settings.server.port, 8181);
    }

    #[test]
    fn test_empty_platform_var_is_ignored() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[(
            "default.toml",
            "[notifier]\nproject_id = \"file-project\"\n",
        )]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.set("PROJECT_ID", "");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.notifier.project_id, "file-project");
    }

    #[test]
    fn test_single_file_mode() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[(
            "single.toml",
            "[logger]\nlevel = \"debug\"\nformat = \"json\"\n",
        )]);

        let settings = ConfigLoader::from_file(temp_dir.path().join("single.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.logger.level, "debug");
        assert_eq!(settings.logger.format, "json");
    }

    #[test]
    fn test_single_file_mode_missing_file() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::clean();

        let result = ConfigLoader::from_file("/nonexistent/notifier.toml").load();
        assert!(
            matches!(result, Err(ConfigError::FileNotFound(msg)) if msg.contains("notifier.toml"))
        );
    }

    #[test]
    fn test_invalid_settings_fail_validation() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::clean();
        let temp_dir = setup_config_dir(&[("default.toml", "[logger]\nlevel = \"loud\"\n")]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());

        let result = ConfigLoader::new().unwrap().load();
        assert!(
            matches!(result, Err(ConfigError::ValidationError { field, .. }) if field == "logger.level")
        );
    }
}
