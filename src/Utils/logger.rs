//! Logger settings and initialization.
//!
//! The solver itself only emits `log` records (`debug!` for every registration and resolved
//! value, `warn!` for skipped equations, `trace!` for every step of the tree walk). Nothing is
//! printed until an application installs a logger, which is what [`LoggerSettings::init`] does.
//!
//! Settings can be built in code or read from the `[logging]` table of a TOML document:
//! ```toml
//! [logging]
//! level = "debug"     # off, error, warn, info, debug, trace
//! console = true
//! file = "auto"       # a file name, or "auto" for a timestamped one
//! ```
use crate::algebra::errors::ConfigError;
use chrono::Local;
use log::info;
use simplelog::*;
use std::fs::File;
use std::path::Path;

/// Where log records go and how verbose they are
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerSettings {
    pub log_level: LevelFilter,
    pub log_to_console: bool,
    pub log_to_file: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        LoggerSettings {
            log_level: LevelFilter::Info,
            log_to_console: true,
            log_to_file: None,
        }
    }
}

impl LoggerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    ////////////////////////////////builder functions
    /// Set logging level (Off, Error, Warn, Info, Debug, Trace)
    pub fn set_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Enable logging to file; "auto" picks a timestamped name
    pub fn set_log_file(mut self, filename: &str) -> Self {
        self.log_to_file = Some(filename.to_string());
        self
    }

    /// Enable/disable console logging
    pub fn set_console_logging(mut self, enabled: bool) -> Self {
        self.log_to_console = enabled;
        self
    }

    ////////////////////////////////configuration
    /// Reads the `[logging]` table of a TOML document. Missing keys keep their defaults, a
    /// document without the table gives the default settings.
    pub fn from_toml_str(document: &str) -> Result<Self, ConfigError> {
        let table = document.parse::<toml::Table>()?;
        let mut settings = LoggerSettings::default();
        let Some(logging) = table.get("logging") else {
            return Ok(settings);
        };
        let logging = logging
            .as_table()
            .ok_or_else(|| ConfigError::Invalid("`logging` must be a table".to_string()))?;
        for (key, value) in logging {
            match key.as_str() {
                "level" => {
                    let level = value.as_str().ok_or_else(|| {
                        ConfigError::Invalid("`logging.level` must be a string".to_string())
                    })?;
                    settings.log_level = level.parse::<LevelFilter>().map_err(|_| {
                        ConfigError::Invalid(format!("unknown log level `{}`", level))
                    })?;
                }
                "console" => {
                    settings.log_to_console = value.as_bool().ok_or_else(|| {
                        ConfigError::Invalid("`logging.console` must be a boolean".to_string())
                    })?;
                }
                "file" => {
                    let file = value.as_str().ok_or_else(|| {
                        ConfigError::Invalid("`logging.file` must be a string".to_string())
                    })?;
                    settings.log_to_file = Some(file.to_string());
                }
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "unknown key `logging.{}`",
                        other
                    )));
                }
            }
        }
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    /// Log file name with "auto" expanded
    pub fn file_name(&self) -> Option<String> {
        self.log_to_file.as_ref().map(|name| {
            if name == "auto" {
                Local::now().format("log_%Y-%m-%d_%H-%M-%S.txt").to_string()
            } else {
                name.clone()
            }
        })
    }

    ////////////////////////////////logging functions
    /// Initialize the global logger based on current settings.
    ///
    /// Only the first successful call in a process installs a logger, later calls are no-ops.
    pub fn init(&self) -> Result<(), ConfigError> {
        let level = self.log_level;
        let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

        // Console logger
        if self.log_to_console {
            loggers.push(TermLogger::new(
                level,
                Config::default(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ));
        }

        // File logger
        if let Some(filename) = self.file_name() {
            let file = File::create(&filename)?;
            loggers.push(WriteLogger::new(level, Config::default(), file));
        }

        if !loggers.is_empty() && CombinedLogger::init(loggers).is_ok() {
            info!("logger started at level {}", level);
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
    fn test_builder() {
        let settings = LoggerSettings::new()
            .set_log_level(LevelFilter::Debug)
            .set_console_logging(false)
            .set_log_file("solver.log");
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert!(!settings.log_to_console);
        assert_eq!(settings.file_name(), Some("solver.log".to_string()));
    }

    #[test]
    fn test_from_toml_str() {
        let settings = LoggerSettings::from_toml_str(
            r#"
            [logging]
            level = "trace"
            console = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.log_level, LevelFilter::Trace);
        assert!(!settings.log_to_console);
        assert_eq!(settings.log_to_file, None);
    }

    #[test]
    fn test_missing_table_gives_defaults() {
        let settings = LoggerSettings::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert_eq!(settings, LoggerSettings::default());
    }

    #[test]
    fn test_invalid_settings() {
        let res = LoggerSettings::from_toml_str("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(res, Err(ConfigError::Invalid(_))));
        let res = LoggerSettings::from_toml_str("[logging]\nconsole = \"yes\"\n");
        assert!(matches!(res, Err(ConfigError::Invalid(_))));
        let res = LoggerSettings::from_toml_str("[logging]\ncolour = true\n");
        assert!(matches!(res, Err(ConfigError::Invalid(_))));
        let res = LoggerSettings::from_toml_str("[logging\n");
        assert!(matches!(res, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_auto_file_name() {
        let settings = LoggerSettings::new().set_log_file("auto");
        let name = settings.file_name().unwrap();
        assert!(name.starts_with("log_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"\nfile = \"auto\"").unwrap();
        let settings = LoggerSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.log_level, LevelFilter::Warn);
        assert_eq!(settings.log_to_file, Some("auto".to_string()));
        let missing = file.path().with_extension("missing");
        assert!(matches!(
            LoggerSettings::from_file(missing),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_init_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.log");
        let settings = LoggerSettings::new()
            .set_console_logging(false)
            .set_log_file(path.to_str().unwrap());
        settings.init().unwrap();
        assert!(path.exists());
        // a second logger is silently ignored
        settings.init().unwrap();
    }
}
