//! Engine options.
//!
//! Options can be set one at a time over the protocol (`setoption`) or
//! loaded together from a JSON file whose keys match the option names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or setting options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read options file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("invalid value '{value}' for option {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Tunable engine behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Sampling temperature; 0 always plays the best-scored move.
    pub variety: f64,
    /// RNG seed for sampling; 0 seeds from entropy.
    pub seed: u64,
    /// Answer a survivable opponent breakthrough by intercepting it instead
    /// of only reporting it.
    pub intercept_breakthroughs: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            variety: 0.0,
            seed: 0,
            intercept_breakthroughs: false,
        }
    }
}

impl EngineOptions {
    /// Parses options from a JSON object. Missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Sets one option by its protocol name (case-insensitive). A missing
    /// value switches a boolean option on.
    pub fn set(&mut self, name: &str, value: Option<&str>) -> Result<(), ConfigError> {
        let raw = value.unwrap_or("").trim();
        match name.to_ascii_lowercase().as_str() {
            "variety" => {
                let v: f64 = raw.parse().map_err(|_| invalid("Variety", raw))?;
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid("Variety", raw));
                }
                self.variety = v;
            }
            "seed" => {
                self.seed = raw.parse().map_err(|_| invalid("Seed", raw))?;
            }
            "interceptbreakthroughs" => {
                self.intercept_breakthroughs = match raw {
                    "" | "true" | "on" | "1" => true,
                    "false" | "off" | "0" => false,
                    _ => return Err(invalid("InterceptBreakthroughs", raw)),
                };
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Option declarations announced during the handshake.
    pub fn declarations() -> [&'static str; 3] {
        [
            "option name Variety type float default 0 min 0",
            "option name Seed type spin default 0",
            "option name InterceptBreakthroughs type check default false",
        ]
    }
}

fn invalid(name: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_deterministic() {
        let opts = EngineOptions::default();
        assert_eq!(opts.variety, 0.0);
        assert_eq!(opts.seed, 0);
        assert!(!opts.intercept_breakthroughs);
    }

    #[test]
    fn json_uses_option_names_and_fills_defaults() {
        let opts = EngineOptions::from_json(r#"{"Variety": 1.5, "InterceptBreakthroughs": true}"#)
            .unwrap();
        assert_eq!(opts.variety, 1.5);
        assert_eq!(opts.seed, 0);
        assert!(opts.intercept_breakthroughs);
    }

    #[test]
    fn json_rejects_unknown_keys() {
        assert!(matches!(
            EngineOptions::from_json(r#"{"Threads": 4}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn json_round_trips() {
        let opts = EngineOptions {
            variety: 2.0,
            seed: 99,
            intercept_breakthroughs: true,
        };
        let text = serde_json::to_string(&opts).unwrap();
        assert!(text.contains("\"Seed\":99"));
        assert_eq!(EngineOptions::from_json(&text).unwrap(), opts);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineOptions::load(Path::new("/nonexistent/tidewatch.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tidewatch.json"));
    }

    #[test]
    fn set_by_name() {
        let mut opts = EngineOptions::default();
        opts.set("variety", Some("0.25")).unwrap();
        opts.set("Seed", Some("17")).unwrap();
        opts.set("InterceptBreakthroughs", None).unwrap();
        assert_eq!(opts.variety, 0.25);
        assert_eq!(opts.seed, 17);
        assert!(opts.intercept_breakthroughs);

        opts.set("InterceptBreakthroughs", Some("false")).unwrap();
        assert!(!opts.intercept_breakthroughs);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut opts = EngineOptions::default();
        assert!(matches!(
            opts.set("Threads", Some("4")),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            opts.set("Variety", Some("-1")),
            Err(ConfigError::InvalidValue { name: "Variety", .. })
        ));
        assert!(matches!(
            opts.set("Seed", None),
            Err(ConfigError::InvalidValue { name: "Seed", .. })
        ));
        assert_eq!(opts, EngineOptions::default());
    }
}
