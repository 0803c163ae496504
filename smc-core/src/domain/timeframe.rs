//! Timeframe identifiers for the entry (base) and higher-timeframe feeds.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Supported bar periods. Ordering follows duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    M15,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub fn duration(&self) -> Duration {
        match self {
            Self::M15 => Duration::minutes(15),
            Self::H1 => Duration::hours(1),
            Self::H4 => Duration::hours(4),
            Self::D1 => Duration::days(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M15 => "15min",
            Self::H1 => "1H",
            Self::H4 => "4H",
            Self::D1 => "1D",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ConfigError::EmptyTimeframe),
            "15min" | "15m" => Ok(Self::M15),
            "1H" | "1h" | "60" => Ok(Self::H1),
            "4H" | "4h" | "240" => Ok(Self::H4),
            "1D" | "1d" | "D" => Ok(Self::D1),
            other => Err(ConfigError::UnknownTimeframe(other.to_string())),
        }
    }
}

impl TryFrom<String> for Timeframe {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_identifiers() {
        assert_eq!("1D".parse::<Timeframe>().unwrap(), Timeframe::D1);
        assert_eq!("4H".parse::<Timeframe>().unwrap(), Timeframe::H4);
        assert_eq!("1H".parse::<Timeframe>().unwrap(), Timeframe::H1);
        assert_eq!("15min".parse::<Timeframe>().unwrap(), Timeframe::M15);
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert_eq!("".parse::<Timeframe>(), Err(ConfigError::EmptyTimeframe));
        assert_eq!(
            "3W".parse::<Timeframe>(),
            Err(ConfigError::UnknownTimeframe("3W".into()))
        );
    }

    #[test]
    fn ordering_follows_duration() {
        assert!(Timeframe::D1 > Timeframe::H4);
        assert!(Timeframe::H4 > Timeframe::H1);
        assert!(Timeframe::H1 > Timeframe::M15);
        assert_eq!(Timeframe::H4.duration(), Duration::hours(4));
    }
}
