use std::fmt;

use fractic_server_error::ServerError;

use crate::errors::InvalidMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Calendar order, January first.
    pub fn all() -> impl Iterator<Item = Month> {
        Self::ALL.into_iter()
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl TryFrom<u32> for Month {
    type Error = ServerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1..=12 => Ok(Self::ALL[(value - 1) as usize]),
            _ => Err(InvalidMonth::new(&value.to_string())),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Wire format is the month number (1-12).

impl serde::Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.number())
    }
}

impl<'de> serde::Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Month, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let n = u32::deserialize(deserializer)?;
        Month::try_from(n).map_err(|_| serde::de::Error::custom(format!("invalid month: {}", n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_numbering() {
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::December.number(), 12);
        assert_eq!(Month::try_from(7).ok(), Some(Month::July));
        assert!(Month::try_from(0).is_err());
        assert!(Month::try_from(13).is_err());
    }

    #[test]
    fn test_months_in_calendar_order() {
        let months: Vec<Month> = Month::all().collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months.first(), Some(&Month::January));
        assert_eq!(months.last(), Some(&Month::December));
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_month_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Month::March).unwrap(), "3");
        let m: Month = serde_json::from_str("11").unwrap();
        assert_eq!(m, Month::November);
        assert!(serde_json::from_str::<Month>("13").is_err());
    }
}
