use crate::route::RouteStyle;
use serde;
use toml;

#[derive(serde::Deserialize, Debug, PartialEq)]
pub struct ApplicationConfig {
    pub feed: FeedConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub route: RouteConfig,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        let config: ApplicationConfig =
            toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
                source: error,
                path: path.clone(),
            })?;
        config.validated(path)
    }

    fn validated(
        self,
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        // a zero tick would stop extrapolation and spin the timer driver
        if self.tracker.tick_interval_ms == 0 {
            return Err(errors::ApplicationConfigError::Invalid {
                reason: String::from("tracker.tick_interval_ms must be greater than zero"),
                path: path.clone(),
            });
        }
        Ok(self)
    }
}

#[derive(serde::Deserialize, Debug, PartialEq)]
pub struct FeedConfig {
    pub host: String,
    pub port: u16,
}

#[derive(serde::Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    pub tick_interval_ms: u64,
    pub stale_after_seconds: u32,
}

impl TrackerConfig {
    #[must_use]
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn stale_after(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(self.stale_after_seconds.into())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            tick_interval_ms: 100,
            stale_after_seconds: 300,
        }
    }
}

#[derive(serde::Deserialize, Debug, PartialEq, Clone)]
#[serde(default)]
pub struct RouteConfig {
    pub origin_opacity: f32,
    pub destination_opacity: f32,
    pub weight: f32,
    pub colour: String,
}

impl RouteConfig {
    #[must_use]
    pub fn origin_style(&self) -> RouteStyle {
        self.style(self.origin_opacity)
    }

    #[must_use]
    pub fn destination_style(&self) -> RouteStyle {
        self.style(self.destination_opacity)
    }

    fn style(&self, opacity: f32) -> RouteStyle {
        let default = RouteStyle::default();
        RouteStyle {
            colour: parse_hex_colour(&self.colour).unwrap_or_else(|| {
                log::warn!("Invalid route colour '{}', using default.", self.colour);
                default.colour
            }),
            weight: self.weight,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            origin_opacity: 1.0,
            destination_opacity: 0.5,
            weight: 2.0,
            colour: String::from("#FF9500"),
        }
    }
}

fn parse_hex_colour(string: &str) -> Option<[u8; 3]> {
    let hex = string.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

pub mod errors {

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
        Invalid {
            reason: String,
            path: std::path::PathBuf,
        },
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Invalid { reason, path } => {
                    write!(f, "Invalid config file '{}': {}", path.display(), reason)
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
                ApplicationConfigError::Invalid { .. } => None,
            }
        }
    }
}
