use crate::api::endpoint::BASE_URL;
use crate::api::{RetryPolicy, Throttle};
use config::{Config, ConfigError};
use std::time::Duration;

const ENV_PREFIX: &str = "ESS";

/// Client configuration.
///
/// Read from (lowest precedence first) built-in defaults, an optional file and
/// `ESS_`-prefixed environment variables, e.g. `ESS_APP_ID`, `ESS_APP_SECRET`,
/// `ESS_TIMEOUT_MS`.
#[derive(Clone, serde::Deserialize)]
pub struct Settings {
    pub app_id: String,
    pub app_secret: String,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Delay between the calls made by `get_data`.
    pub request_delay_ms: u64,
    /// Retries after a rate-limit response; `0` disables retrying.
    pub retry_max: u32,
    pub retry_initial_delay_ms: u64,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn throttle(&self) -> Throttle {
        Throttle::from_millis(self.request_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        match self.retry_max {
            0 => RetryPolicy::Never,
            max_retries => RetryPolicy::ExponentialBackoff {
                max_retries,
                initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
            },
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("app_id", &self.app_id)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("retry_max", &self.retry_max)
            .field("retry_initial_delay_ms", &self.retry_initial_delay_ms)
            .finish()
    }
}

fn with_defaults() -> Result<Config, ConfigError> {
    let mut settings = Config::default();
    settings
        .set_default("base_url", BASE_URL)?
        .set_default("timeout_ms", 30_000_i64)?
        .set_default("request_delay_ms", 0_i64)?
        .set_default("retry_max", 0_i64)?
        .set_default("retry_initial_delay_ms", 1_000_i64)?;
    Ok(settings)
}

/// Read settings from the environment only.
pub fn read_settings() -> Result<Settings, ConfigError> {
    read_settings_from(None)
}

/// Read settings from `file` (any format `config` understands, if it exists)
/// overridden by the environment.
pub fn read_settings_from(file: Option<&str>) -> Result<Settings, ConfigError> {
    let mut settings = with_defaults()?;
    if let Some(file) = file {
        settings.merge(config::File::with_name(file).required(false))?;
    }
    settings.merge(config::Environment::with_prefix(ENV_PREFIX))?;
    settings.try_into()
}

#[cfg(test)]
mod test {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        let mut settings = with_defaults()?;
        settings.merge(File::from_str(toml, FileFormat::Toml))?;
        settings.try_into()
    }

    #[test]
    fn defaults() {
        let settings = from_toml("app_id = \"id\"\napp_secret = \"secret\"").unwrap();
        assert_eq!("id", settings.app_id);
        assert_eq!("secret", settings.app_secret);
        assert_eq!(BASE_URL, settings.base_url);
        assert_eq!(Duration::from_secs(30), settings.timeout());
        assert_eq!(Throttle::default(), settings.throttle());
        assert_eq!(RetryPolicy::Never, settings.retry_policy());
    }

    #[test]
    fn overrides() {
        let settings = from_toml(
            "app_id = \"id\"\n\
             app_secret = \"secret\"\n\
             base_url = \"http://localhost:8080/api\"\n\
             timeout_ms = 5000\n\
             request_delay_ms = 1500\n\
             retry_max = 4\n\
             retry_initial_delay_ms = 250\n",
        )
        .unwrap();
        assert_eq!("http://localhost:8080/api", settings.base_url);
        assert_eq!(Duration::from_secs(5), settings.timeout());
        assert_eq!(Throttle::from_millis(1500), settings.throttle());
        assert_eq!(
            RetryPolicy::ExponentialBackoff {
                max_retries: 4,
                initial_delay: Duration::from_millis(250),
            },
            settings.retry_policy()
        );
    }

    #[test]
    fn credentials_are_required() {
        assert!(from_toml("app_id = \"id\"").is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let settings = from_toml("app_id = \"id\"\napp_secret = \"hunter2\"").unwrap();
        assert!(!format!("{:?}", settings).contains("hunter2"));
    }
}
