#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde_derive::Serialize,
    serde_derive::Deserialize,
)]
#[serde(transparent)]
pub struct PropertyId(pub String);

/// Identifies one property's ledger for one calendar year. Together with a
/// `Month` this is the persistence key of a monthly record.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde_derive::Serialize,
    serde_derive::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct LedgerKey {
    pub property_id: PropertyId,
    pub year: i32,
}

// Shorthand constructors.

pub fn property(id: impl Into<String>) -> PropertyId {
    PropertyId(id.into())
}

impl LedgerKey {
    pub fn new(property_id: PropertyId, year: i32) -> Self {
        Self { property_id, year }
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
