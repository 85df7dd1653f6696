//! Display identities for entrants
//!
//! Eight of the sixteen identities are drawn, without replacement, for each
//! race. Only the name crosses the wire; peers resolve it back to the full
//! livery through [`find`].

use serde::{Deserialize, Serialize};

/// Eye decoration drawn by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeStyle {
    Dot,
    Dash,
    DotDash,
    Sunglasses,
}

/// Colour scheme of one entrant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Livery {
    /// Primary colour, also used for the saddle and collar
    pub color: &'static str,
    pub body: &'static str,
    pub neck: &'static str,
    pub eyes: EyeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: &'static str,
    pub livery: Livery,
}

const fn identity(
    name: &'static str,
    color: &'static str,
    body: &'static str,
    neck: &'static str,
    eyes: EyeStyle,
) -> Identity {
    Identity {
        name,
        livery: Livery {
            color,
            body,
            neck,
            eyes,
        },
    }
}

const BROWN: &str = "#654321";
const DARK: &str = "#2C1810";
const WHITE: &str = "#F5F5F5";
const BLUSH: &str = "#FFE4E1";
const HOT_PINK: &str = "#FF69B4";
const NEON_PINK: &str = "#FF10F0";

/// Identity pool in draw order
pub const IDENTITY_POOL: [Identity; 16] = [
    identity("Golden Emperor", "#FFD700", DARK, WHITE, EyeStyle::Dot),
    identity("Diamond Sand", "#FF00FF", BROWN, NEON_PINK, EyeStyle::Dash),
    identity("Platinum Pressured", "#00FFFF", DARK, HOT_PINK, EyeStyle::DotDash),
    identity("Royal Fortune", "#8A2BE2", BROWN, WHITE, EyeStyle::Dot),
    identity("Tennis Chain", "#00FF00", DARK, BLUSH, EyeStyle::Dash),
    identity("Ruby Luxurious", "#FF1493", BROWN, NEON_PINK, EyeStyle::DotDash),
    identity("Sapphire Elite", "#00CED1", DARK, HOT_PINK, EyeStyle::Dot),
    identity("Classic Caviar", "#FFA500", BROWN, WHITE, EyeStyle::Sunglasses),
    identity("Crypto Gains", "#F7931A", DARK, BLUSH, EyeStyle::Dash),
    identity("Equity Drip", "#1E90FF", BROWN, NEON_PINK, EyeStyle::DotDash),
    identity("Elite Circle", "#8A2BE2", DARK, HOT_PINK, EyeStyle::Dot),
    identity("Maximum ROI", "#32CD32", BROWN, WHITE, EyeStyle::Sunglasses),
    identity("Hella Pricey", "#FFD700", DARK, BLUSH, EyeStyle::Dash),
    identity("Value Going Up", "#50C878", BROWN, NEON_PINK, EyeStyle::DotDash),
    identity("Big Brain Energy", "#00BFFF", DARK, HOT_PINK, EyeStyle::Sunglasses),
    identity("Gospel Feathers", "#E6E6FA", BROWN, WHITE, EyeStyle::Dot),
];

/// Look up an identity by its exact name
pub fn find(name: &str) -> Option<&'static Identity> {
    IDENTITY_POOL.iter().find(|identity| identity.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pool_names_are_unique() {
        let names: HashSet<_> = IDENTITY_POOL.iter().map(|i| i.name).collect();
        assert_eq!(names.len(), IDENTITY_POOL.len());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("Maximum ROI").map(|i| i.livery.color), Some("#32CD32"));
        assert!(find("maximum roi").is_none());
        assert!(find("Nobody").is_none());
    }
}
