use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn total(&self) -> u16 {
        self.hp as u16
            + self.attack as u16
            + self.defense as u16
            + self.sp_attack as u16
            + self.sp_defense as u16
            + self.speed as u16
    }
}

/// Experience growth curve assigned to a species. The four categories use the
/// standard cubic/quartic forms; experience totals are clamped at zero so the
/// medium-slow polynomial (negative for very low levels) stays representable
/// as an unsigned counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum GrowthRate {
    Fast,
    MediumFast,
    Slow,
    MediumSlow,
}

impl GrowthRate {
    pub const MAX_LEVEL: u8 = 100;

    /// Parse a growth-rate name as found in species records. Unknown names
    /// fall back to medium-slow, the most common category.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fast" => GrowthRate::Fast,
            "medium-fast" | "medium fast" => GrowthRate::MediumFast,
            "slow" => GrowthRate::Slow,
            _ => GrowthRate::MediumSlow,
        }
    }

    /// Total experience required to reach `level`.
    pub fn exp_for_level(self, level: u8) -> u32 {
        let n = i64::from(level.max(1));
        let exp = match self {
            GrowthRate::Fast => 4 * n.pow(3) / 5,
            GrowthRate::MediumFast => n.pow(3),
            GrowthRate::Slow => 5 * n.pow(3) / 4,
            GrowthRate::MediumSlow => 6 * n.pow(3) / 5 - 15 * n.pow(2) + 100 * n - 140,
        };
        exp.max(0) as u32
    }

    /// The level an experience total corresponds to, found by scanning upward
    /// from level 1 and capped at `MAX_LEVEL`.
    pub fn level_for_exp(self, exp: u32) -> u8 {
        let mut level = 1;
        while level < Self::MAX_LEVEL && self.exp_for_level(level + 1) <= exp {
            level += 1;
        }
        level
    }

    pub fn can_level_up(self, level: u8, exp: u32) -> bool {
        level < Self::MAX_LEVEL && exp >= self.exp_for_level(level.saturating_add(1))
    }
}

/// Immutable species record shared by every individual of that species.
/// Loaded once by the data layer and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub pokedex_number: u16,
    pub name: String,
    pub primary_type: PokemonType,
    pub secondary_type: Option<PokemonType>,
    pub base_stats: BaseStats,
    pub catch_rate: u8,
    pub growth_rate: GrowthRate,
}

impl Species {
    pub fn types(&self) -> impl Iterator<Item = PokemonType> + '_ {
        std::iter::once(self.primary_type).chain(self.secondary_type)
    }

    pub fn has_type(&self, type_: PokemonType) -> bool {
        self.primary_type == type_ || self.secondary_type == Some(type_)
    }
}
