//! Accent colors for log notifications
//!
//! A fixed four-value palette used to visually categorize notifications by
//! severity: state applied (Orange), state lifted (Yellow), destructive
//! action (Red), informational (Blue).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed accent color palette for notification badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Orange,
    Yellow,
    Red,
    Blue,
}

impl AccentColor {
    /// Get the RGB value rendered by clients
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Orange => 0xdda353,
            Self::Yellow => 0xd1dd53,
            Self::Red => 0xdd5e53,
            Self::Blue => 0x4286f4,
        }
    }

    /// Get the name of this color
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
