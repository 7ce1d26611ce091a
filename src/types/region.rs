use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A regional focus that steers the assistant toward one part of Indonesia.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Region {
    /// One of the preset regions offered in the UI.
    Known(KnownRegion),

    /// Any other region name the user typed.
    Custom(String),
}

/// Preset regions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownRegion {
    /// Bali
    Bali,
    /// Jawa
    Jawa,
    /// Sumatra
    Sumatra,
    /// Sulawesi
    Sulawesi,
}

impl KnownRegion {
    /// Every preset, in the order they are offered.
    pub const ALL: [KnownRegion; 4] = [
        KnownRegion::Bali,
        KnownRegion::Jawa,
        KnownRegion::Sumatra,
        KnownRegion::Sulawesi,
    ];

    /// Display name of the region.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownRegion::Bali => "Bali",
            KnownRegion::Jawa => "Jawa",
            KnownRegion::Sumatra => "Sumatra",
            KnownRegion::Sulawesi => "Sulawesi",
        }
    }
}

impl Region {
    /// The tag prepended to an outbound user message while this region is active.
    pub fn tag(&self) -> String {
        format!("[Fokus daerah: {self}]")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Known(known) => write!(f, "{}", known.as_str()),
            Region::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl FromStr for Region {
    type Err = String;

    /// Parses a region name. Presets match case-insensitively; any other
    /// non-empty name becomes [`Region::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("region name must not be empty".to_string());
        }
        Ok(KnownRegion::ALL
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(s))
            .map(|known| Region::Known(*known))
            .unwrap_or_else(|| Region::Custom(s.to_string())))
    }
}

impl From<KnownRegion> for Region {
    fn from(region: KnownRegion) -> Self {
        Region::Known(region)
    }
}
