use std::str::FromStr;

use fractic_server_error::ServerError;
use serde::Deserialize;

use crate::{entities::Month, errors::InvalidMonth};

/// Month given either as its number (`1`-`12`) or its English name / 3-letter
/// abbreviation, case-insensitive.
#[derive(Debug)]
pub(crate) struct MonthModel(Month);

impl FromStr for MonthModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u32>() {
            return Ok(MonthModel(Month::try_from(n)?));
        }
        let lower = trimmed.to_lowercase();
        Month::all()
            .find(|m| {
                let name = m.name().to_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .map(MonthModel)
            .ok_or_else(|| InvalidMonth::new(s))
    }
}

impl<'de> Deserialize<'de> for MonthModel {
    fn deserialize<D>(deserializer: D) -> Result<MonthModel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MonthModel::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Into<Month> for MonthModel {
    fn into(self) -> Month {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(s: &str) -> Option<Month> {
        MonthModel::from_str(s).ok().map(Into::into)
    }

    #[test]
    fn test_month_model() {
        assert_eq!(month("1"), Some(Month::January));
        assert_eq!(month(" 12 "), Some(Month::December));
        assert_eq!(month("march"), Some(Month::March));
        assert_eq!(month("Sep"), Some(Month::September));
        assert_eq!(month("0"), None);
        assert_eq!(month("13"), None);
        assert_eq!(month("Smarch"), None);
    }
}
