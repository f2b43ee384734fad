use serde::{Deserialize, Serialize};

///
/// RelationHint
///
/// Recorded for every field whose name ends in `Id`; the referenced entity
/// is the name with the suffix stripped. Hints are advisory: resolution is
/// lazy and an unresolvable hint is never an error.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationHint {
    /// Field carrying the foreign key.
    pub field: String,
    /// Referenced entity name, as derived (lookup is case-insensitive).
    pub references: String,
}

impl RelationHint {
    /// Derive a hint from a field name, `None` when the name does not
    /// carry the `Id` suffix.
    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix("Id")?;
        if stem.is_empty() {
            return None;
        }

        Some(Self {
            field: name.to_string(),
            references: stem.to_string(),
        })
    }
}
