use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{CheckinRecord, GenreRecord};

/// The fixed genre universe with the counts the popularity table opens with.
/// Order here is the tie-break order for the first ranking pass.
pub const GENRE_SEED: [(&str, u64); 12] = [
    ("Deep House", 24),
    ("Tech House", 21),
    ("Progressive House", 18),
    ("EDM Pop", 15),
    ("Future Bass", 14),
    ("Melodic Techno", 12),
    ("Bass House", 11),
    ("Tropical House", 9),
    ("Club Pop", 8),
    ("Drum & Bass", 7),
    ("Electro House", 6),
    ("Afro House", 5),
];

pub const GUEST_NAMES: [&str; 15] = [
    "Jordan P.",
    "Taylor S.",
    "Morgan W.",
    "Casey B.",
    "Riley D.",
    "Quinn H.",
    "Andre S.",
    "Jamie F.",
    "Drew K.",
    "Peyton M.",
    "Skyler R.",
    "Reese T.",
    "Finley C.",
    "Parker J.",
    "Blake W.",
];

/// Showcase arrivals for the demo seed, newest first.
const DEMO_CHECKINS: [(&str, [&str; 3], f64); 4] = [
    ("Alex M.", ["Deep House", "Tech House", "Melodic Techno"], 2.0),
    ("Sarah K.", ["EDM Pop", "Future Bass", "Tropical House"], 5.0),
    ("Mike R.", ["Tech House", "Bass House", "Drum & Bass"], 8.0),
    ("Jessica L.", ["Progressive House", "Deep House", "Club Pop"], 12.0),
];

const DEMO_TOTAL_CHECKINS: u64 = 47;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SeedKind {
    /// Catalog counts plus a handful of showcase check-ins.
    #[default]
    Demo,
    /// Catalog counts, empty activity log, zero total.
    Empty,
}

/// Everything the check-in board starts from.
#[derive(Debug, Clone)]
pub struct CheckinSeed {
    pub genres: Vec<GenreRecord>,
    pub guest_names: Vec<String>,
    /// Newest first.
    pub recent: Vec<CheckinRecord>,
    pub total_checkins: u64,
}

impl CheckinSeed {
    pub fn build(kind: SeedKind) -> Result<Self> {
        let genres = GENRE_SEED
            .iter()
            .map(|(name, count)| GenreRecord::new(*name, *count))
            .collect();
        let guest_names = GUEST_NAMES.iter().map(|name| name.to_string()).collect();

        let (recent, total_checkins) = match kind {
            SeedKind::Demo => {
                let recent = DEMO_CHECKINS
                    .iter()
                    .map(|(guest, genres, age)| {
                        CheckinRecord::with_age(*guest, (*genres).map(String::from), *age)
                    })
                    .collect::<Result<Vec<_>>>()?;
                (recent, DEMO_TOTAL_CHECKINS)
            }
            SeedKind::Empty => (Vec::new(), 0),
        };

        Ok(Self {
            genres,
            guest_names,
            recent,
            total_checkins,
        })
    }
}
