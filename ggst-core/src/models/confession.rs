use serde::{Deserialize, Serialize};

/// Church-tax category used to apportion church tax among co-owners.
///
/// The string forms match the keys used by the commune Steuerfuss data
/// (`evangR`, `roemK`, `christK`, `Andere`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confession {
    EvangelicalReformed,
    RomanCatholic,
    ChristianCatholic,
    Other,
}

impl Confession {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EvangelicalReformed => "evangR",
            Self::RomanCatholic => "roemK",
            Self::ChristianCatholic => "christK",
            Self::Other => "Andere",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "evangR" => Some(Self::EvangelicalReformed),
            "roemK" => Some(Self::RomanCatholic),
            "christK" => Some(Self::ChristianCatholic),
            "Andere" => Some(Self::Other),
            _ => None,
        }
    }
}
