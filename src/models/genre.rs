use serde::{Deserialize, Serialize};

/// One row of the genre popularity table. `name` is the key; only `count`
/// ever changes after the catalog is seeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenreRecord {
    pub name: String,
    pub count: u64,
}

impl GenreRecord {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}
