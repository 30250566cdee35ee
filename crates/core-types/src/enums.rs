use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a preset measures its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSpan {
    Days(u32),
    Months(u32),
}

/// The named display ranges offered by the dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1m")]
    OneMonth,
    #[default]
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
}

impl RangePreset {
    pub const ALL: [RangePreset; 6] = [
        RangePreset::TwoWeeks,
        RangePreset::OneMonth,
        RangePreset::ThreeMonths,
        RangePreset::SixMonths,
        RangePreset::OneYear,
        RangePreset::ThreeYears,
    ];

    pub fn span(&self) -> PresetSpan {
        match self {
            RangePreset::TwoWeeks => PresetSpan::Days(14),
            RangePreset::OneMonth => PresetSpan::Months(1),
            RangePreset::ThreeMonths => PresetSpan::Months(3),
            RangePreset::SixMonths => PresetSpan::Months(6),
            RangePreset::OneYear => PresetSpan::Months(12),
            RangePreset::ThreeYears => PresetSpan::Months(36),
        }
    }

    /// The short key used on the command line and in `config.toml`.
    pub fn key(&self) -> &'static str {
        match self {
            RangePreset::TwoWeeks => "2w",
            RangePreset::OneMonth => "1m",
            RangePreset::ThreeMonths => "3m",
            RangePreset::SixMonths => "6m",
            RangePreset::OneYear => "1y",
            RangePreset::ThreeYears => "3y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::TwoWeeks => "2 weeks",
            RangePreset::OneMonth => "1 month",
            RangePreset::ThreeMonths => "3 months",
            RangePreset::SixMonths => "6 months",
            RangePreset::OneYear => "1 year",
            RangePreset::ThreeYears => "3 years",
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RangePreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangePreset::ALL
            .into_iter()
            .find(|preset| preset.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::InvalidInput(
                    "range".to_string(),
                    format!("unknown preset '{}', expected one of 2w, 1m, 3m, 6m, 1y, 3y", s),
                )
            })
    }
}

/// Direction of the headline trend indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Classifies an absolute change by its sign.
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            TrendDirection::Up
        } else if change < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_keys_parse_back() {
        for preset in RangePreset::ALL {
            assert_eq!(preset.key().parse::<RangePreset>().unwrap(), preset);
        }
        assert_eq!(" 1Y ".parse::<RangePreset>().unwrap(), RangePreset::OneYear);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = "5d".parse::<RangePreset>().unwrap_err();
        assert!(err.to_string().contains("unknown preset '5d'"));
    }

    #[test]
    fn direction_follows_sign() {
        assert_eq!(TrendDirection::from_change(0.2), TrendDirection::Up);
        assert_eq!(TrendDirection::from_change(-0.0001), TrendDirection::Down);
        assert_eq!(TrendDirection::from_change(0.0), TrendDirection::Flat);
    }
}
