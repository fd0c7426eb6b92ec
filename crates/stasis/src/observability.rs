use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use tracing::Level;
use tracing_subscriber::prelude::*;

const LOG_FORMAT_TEXT: &str = "text";
const LOG_FORMAT_JSON: &str = "json";

#[derive(Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

/// If in debug mode, default level is debug to get maximum logging
#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "debug";

/// If not in debug mode, default level is error to get important logs
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "error";

fn detect_log_format(log_format: Option<&str>) -> Result<LogFormat> {
    match log_format {
        None | Some(LOG_FORMAT_TEXT) => Ok(LogFormat::Text),
        Some(LOG_FORMAT_JSON) => Ok(LogFormat::Json),
        Some(unknown) => bail!("unknown log format: {}", unknown),
    }
}

fn detect_log_level(input: Option<String>, is_debug: bool) -> Result<Level> {
    // `--debug` is kept as a shorthand, `--log-level` wins when both are given
    let log_level: Cow<str> = match input {
        None if is_debug => "debug".into(),
        None => DEFAULT_LOG_LEVEL.into(),
        Some(level) => level.into(),
    };

    Ok(Level::from_str(log_level.as_ref())?)
}

fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {path:?}"))
}

#[derive(Debug, Default)]
pub struct ObservabilityConfig {
    pub log_debug_flag: bool,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_format: Option<String>,
    pub systemd_log: bool,
}

impl From<&crate::Opts> for ObservabilityConfig {
    fn from(opts: &crate::Opts) -> Self {
        Self {
            log_debug_flag: opts.global.debug,
            log_level: opts.stasis_extend.log_level.to_owned(),
            log_file: opts.global.log.to_owned(),
            log_format: opts.global.log_format.to_owned(),
            systemd_log: opts.stasis_extend.systemd_log,
        }
    }
}

/// Installs the global subscriber. Logs go to stderr or the log file, never
/// to stdout, which only carries command output.
pub fn init<T>(config: T) -> Result<()>
where
    T: Into<ObservabilityConfig>,
{
    let config = config.into();
    let level = detect_log_level(config.log_level, config.log_debug_flag)
        .with_context(|| "failed to parse log level")?;
    let log_level_filter = tracing_subscriber::filter::LevelFilter::from(level);
    let log_format = detect_log_format(config.log_format.as_deref())
        .with_context(|| "failed to detect log format")?;

    let systemd_journald = if config.systemd_log {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer.with_syslog_identifier("stasis".to_string())),
            Err(err) => {
                // journald is optional, e.g. it is absent inside most containers
                eprintln!("failed to initialize journald logging: {:?}", err);
                None
            }
        }
    } else {
        None
    };
    let subscriber = tracing_subscriber::registry()
        .with(log_level_filter)
        .with(systemd_journald);

    // every writer and format pair yields a different layer type, hence one
    // branch per combination
    let result = match (config.log_file.as_deref(), log_format) {
        (None, LogFormat::Text) => subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (None, LogFormat::Json) => subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        (Some(path), LogFormat::Text) => subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(open_log_file(path)?))
            .try_init(),
        (Some(path), LogFormat::Json) => subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_span_list(false)
                    .with_writer(open_log_file(path)?),
            )
            .try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("failed to init logger: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_log_level() {
        let test = vec![
            ("error", tracing::Level::ERROR),
            ("warn", tracing::Level::WARN),
            ("info", tracing::Level::INFO),
            ("debug", tracing::Level::DEBUG),
            ("trace", tracing::Level::TRACE),
        ];
        for (input, expected) in test {
            assert_eq!(
                detect_log_level(Some(input.to_string()), false)
                    .expect("failed to parse log level"),
                expected
            )
        }
        assert_eq!(
            detect_log_level(None, true).expect("failed to parse log level"),
            tracing::Level::DEBUG
        );
        // an explicit level beats the debug flag
        assert_eq!(
            detect_log_level(Some("warn".to_string()), true).expect("failed to parse log level"),
            tracing::Level::WARN
        );
        assert!(detect_log_level(Some("invalid".to_string()), false).is_err());
    }

    #[test]
    fn test_detect_log_level_default() {
        let expected = if cfg!(debug_assertions) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::ERROR
        };
        assert_eq!(detect_log_level(None, false).unwrap(), expected);
    }

    #[test]
    fn test_detect_log_format() {
        assert_eq!(detect_log_format(None).unwrap(), LogFormat::Text);
        assert_eq!(detect_log_format(Some("text")).unwrap(), LogFormat::Text);
        assert_eq!(detect_log_format(Some("json")).unwrap(), LogFormat::Json);
        assert!(detect_log_format(Some("xml")).is_err());
    }

    #[test]
    fn test_log_file_keeps_previous_runs() -> Result<()> {
        use std::io::Write;

        let temp_dir = tempfile::tempdir()?;
        let log_file = temp_dir.path().join("stasis.log");
        writeln!(open_log_file(&log_file)?, "first run")?;
        writeln!(open_log_file(&log_file)?, "second")?;

        assert_eq!(std::fs::read_to_string(&log_file)?, "first run\nsecond\n");
        Ok(())
    }

    #[test]
    fn test_json_logfile() -> Result<()> {
        // the only test in this binary that installs the global subscriber
        let temp_dir = tempfile::tempdir()?;
        let log_file = temp_dir.path().join("test.log");
        let config = ObservabilityConfig {
            log_file: Some(log_file.clone()),
            log_format: Some(LOG_FORMAT_JSON.to_owned()),
            log_level: Some("error".to_owned()),
            ..Default::default()
        };
        init(config)?;

        tracing::info!("below the configured level");
        tracing::error!("testing json log");

        let data = std::fs::read_to_string(&log_file)?;
        assert!(!data.contains("below the configured level"));
        let line = data
            .lines()
            .find(|line| line.contains("testing json log"))
            .context("error event missing from log file")?;
        let value: serde_json::Value = serde_json::from_str(line)?;
        assert_eq!(value["message"], "testing json log");
        Ok(())
    }
}
