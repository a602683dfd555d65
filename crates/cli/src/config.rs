//! Optional TOML configuration for `bterm`.
//!
//! ```toml
//! [output]
//! wrap = true       # wrap terms in bexpr/bpred/btrans
//! format = "text"   # or "json"
//!
//! [log]
//! level = "warn"    # any tracing-subscriber EnvFilter directive
//! ```
//!
//! Command-line flags take precedence over the file; `RUST_LOG` takes
//! precedence over `[log] level`.

use std::path::Path;

use serde::Deserialize;

use crate::OutputFormat;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub log: LogSection,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OutputSection {
    pub wrap: Option<bool>,
    pub format: Option<OutputFormat>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LogSection {
    pub level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let c = Config::from_toml_str("").unwrap();
        assert!(c.output.wrap.is_none());
        assert!(c.output.format.is_none());
        assert!(c.log.level.is_none());
    }

    #[test]
    fn all_sections_parse() {
        let c = Config::from_toml_str(
            "[output]\nwrap = false\nformat = \"json\"\n\n[log]\nlevel = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(c.output.wrap, Some(false));
        assert_eq!(c.output.format, Some(OutputFormat::Json));
        assert_eq!(c.log.level.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("[output]\ncolour = true\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/bterm.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bterm.toml"));
    }
}
