use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a configuration string names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportMode {
    #[default]
    Daily,
    Weekly,
}

impl FromStr for ReportMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(ParseEnumError {
                kind: "report mode",
                value: s.to_string(),
                expected: "daily, weekly",
            }),
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

/// Which figure fills the per-position "Fee APR" line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AprSource {
    /// Precomputed by the position API (`performance.hodl.fee_apr`).
    #[default]
    Upstream,
    /// Derived from the position's realized fees in the report window.
    Realized,
}

impl FromStr for AprSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upstream" => Ok(Self::Upstream),
            "realized" => Ok(Self::Realized),
            _ => Err(ParseEnumError {
                kind: "APR source",
                value: s.to_string(),
                expected: "upstream, realized",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    Active,
    OutOfRange,
}

impl PositionStatus {
    /// Only an explicit `in_range: false` marks a position out of range.
    pub fn from_in_range(in_range: Option<bool>) -> Self {
        match in_range {
            Some(false) => Self::OutOfRange,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::OutOfRange => write!(f, "OUT OF RANGE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_mode_parsing() {
        assert_eq!("daily".parse::<ReportMode>(), Ok(ReportMode::Daily));
        assert_eq!(" Weekly ".parse::<ReportMode>(), Ok(ReportMode::Weekly));
        let err = "monthly".parse::<ReportMode>().unwrap_err();
        assert_eq!(err.value, "monthly");
    }

    #[test]
    fn test_status_defaults_to_active() {
        assert_eq!(PositionStatus::from_in_range(None), PositionStatus::Active);
        assert_eq!(
            PositionStatus::from_in_range(Some(true)),
            PositionStatus::Active
        );
        assert_eq!(
            PositionStatus::from_in_range(Some(false)).to_string(),
            "OUT OF RANGE"
        );
    }
}
