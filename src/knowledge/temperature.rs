use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Inclusive temperature range in °C, written as `"MIN to MAX"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemperatureRange {
    pub min: i32,
    pub max: i32,
}

impl TemperatureRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Smallest range covering both inputs
    pub fn union(&self, other: &TemperatureRange) -> TemperatureRange {
        TemperatureRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains(&self, temperature: f64) -> bool {
        f64::from(self.min) <= temperature && temperature <= f64::from(self.max)
    }
}

impl FromStr for TemperatureRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (min, max) = compact
            .split_once("to")
            .ok_or_else(|| format!("Temperature range '{}' is not 'MIN to MAX'", s))?;

        let parse = |part: &str| {
            part.parse::<i32>()
                .map_err(|e| format!("Temperature range '{}' has bad bound '{}': {}", s, part, e))
        };
        let (min, max) = (parse(min)?, parse(max)?);

        if min > max {
            return Err(format!("Temperature range '{}' has min above max", s));
        }

        Ok(Self { min, max })
    }
}

impl TryFrom<String> for TemperatureRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TemperatureRange> for String {
    fn from(range: TemperatureRange) -> Self {
        range.to_string()
    }
}

impl Display for TemperatureRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}
