use std::time::Duration;
use std::{env, fmt, fs, path};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Tunables for the monitoring loop.
///
/// Every field has a default, so a settings file only needs the keys it
/// wants to change and a missing file means "all defaults".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorSettings {
    /// Target length of one cycle, probing included
    pub interval_secs: u64,

    /// A 2xx response slower than this is DOWN
    pub latency_threshold_ms: u64,

    /// Whole-request timeout handed to the HTTP client, 0 disables it
    pub request_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            latency_threshold_ms: 500,
            request_timeout_secs: 10,
            user_agent: format!("uppe-monitor/{}", crate::VERSION),
        }
    }
}

/// Get default settings path ($XDG_CONFIG_HOME/uppe/monitor.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("uppe/monitor.toml"))
}

impl fmt::Display for MonitorSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_1 = write_indented(1);

        writeln!(f, "Monitor Settings:")?;
        write_1(f, "Interval", &format!("{}s", self.interval_secs))?;
        write_1(f, "Latency Threshold", &format!("{}ms", self.latency_threshold_ms))?;
        match self.request_timeout_secs {
            0 => write_1(f, "Request Timeout", &"none")?,
            secs => write_1(f, "Request Timeout", &format!("{secs}s"))?,
        }
        write_1(f, "User Agent", &self.user_agent)?;

        Ok(())
    }
}

impl MonitorSettings {
    /// Read settings from `optional_path`, or from the default location
    /// when no path is given.
    ///
    /// A file that does not exist yields the defaults. Nothing is ever
    /// written back.
    ///
    /// ```no_run
    /// let settings = uptime::MonitorSettings::from_config(None::<&std::path::Path>)?;
    /// println!("{settings}");
    /// # Ok::<(), uptime::ConfigError>(())
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path = match optional_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_config_path()?,
        };

        if !config_path.exists() {
            debug!(path = %config_path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let raw_string = fs::read_to_string(&config_path)
            .map_err(|source| ConfigError::Read { path: config_path.clone(), source })?;
        let settings: Self = toml::from_str(&raw_string)
            .map_err(|source| ConfigError::Parse { path: config_path, source })?;
        settings.validate()?;

        Ok(settings)
    }

    /// Like [`MonitorSettings::from_config`] with the default location, but
    /// falls back to defaults when there is no home directory to look in.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::from_config(None::<&path::Path>) {
            Err(ConfigError::ConfigPathUnavailable) => Ok(Self::default()),
            other => other,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "interval_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }

        if self.latency_threshold_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "latency_threshold_ms",
                reason: "must be at least 1 millisecond".to_string(),
            });
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn latency_threshold(&self) -> Duration {
        Duration::from_millis(self.latency_threshold_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_fixed_cadence() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.interval(), Duration::from_secs(15));
        assert_eq!(settings.latency_threshold(), Duration::from_millis(500));
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(10)));
        assert!(settings.user_agent.starts_with("uppe-monitor/"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = MonitorSettings::from_config(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings, MonitorSettings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let file = write_settings("interval_secs = 30\nrequest_timeout_secs = 0\n");
        let settings = MonitorSettings::from_config(Some(file.path())).unwrap();

        assert_eq!(settings.interval(), Duration::from_secs(30));
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.latency_threshold_ms, 500);
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let file = write_settings("intervall_secs = 30\n");
        let err = MonitorSettings::from_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_settings("interval_secs = 0\n");
        let err = MonitorSettings::from_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "interval_secs", .. }));
    }

    #[test]
    fn display_lists_every_setting() {
        let rendered = MonitorSettings::default().to_string();
        assert!(rendered.contains("Interval: 15s"));
        assert!(rendered.contains("Latency Threshold: 500ms"));
        assert!(rendered.contains("Request Timeout: 10s"));
    }
}
