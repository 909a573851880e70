use crate::config::{CONFIG_FILE_NAME, DevToolConfig, ENV_PREFIX};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use std::path::Path;

impl DevToolConfig {
    /// Load configuration from multiple sources.
    /// Priority: environment variables > config file > defaults
    ///
    /// `root` is the project directory; `config_path` is an explicit
    /// `--config` file, which must exist when given.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = &config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        // FRONTDEV_LISTEN, FRONTDEV_DEBOUNCE_MS, ...
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let mut config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: if e.path.is_empty() {
                "configuration".to_string()
            } else {
                e.path.join(".")
            },
            value: e.kind.to_string(),
            hint: format!(
                "Check {} and {}* environment variables for field types",
                CONFIG_FILE_NAME, ENV_PREFIX
            ),
        })?;

        config.root = root.to_path_buf();
        Ok(config)
    }
}
