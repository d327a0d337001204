use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Status conditions a move can inflict. The battle engine owns the runtime
/// representation (duration counters); this is just the catalog-side tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum StatusKind {
    Burn,
    Poison,
    Paralysis,
    Sleep,
}

impl StatusKind {
    pub fn abbreviation(self) -> &'static str {
        match self {
            StatusKind::Burn => "BRN",
            StatusKind::Poison => "PSN",
            StatusKind::Paralysis => "PAR",
            StatusKind::Sleep => "SLP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub status: StatusKind,
    /// Chance to inflict, in percent (1-100). Rolled independently of damage.
    pub chance: u8,
}

/// Immutable move catalog entry. Accuracy is kept as descriptive data for
/// display; the simplified damage model does not roll to-hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub key: String,
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// Percent, 1-100.
    pub accuracy: u8,
    /// Priority tier; higher tiers act before speed is compared.
    pub priority: i8,
    pub effect: Option<StatusEffect>,
    /// Flat HP restored to the user, clamped to max HP on application.
    pub heal: u16,
}

impl MoveData {
    pub fn new(
        key: &str,
        name: &str,
        move_type: PokemonType,
        category: MoveCategory,
        power: u16,
        accuracy: u8,
    ) -> Self {
        MoveData {
            key: key.to_string(),
            name: name.to_string(),
            move_type,
            category,
            power,
            accuracy,
            priority: 0,
            effect: None,
            heal: 0,
        }
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: StatusKind, chance: u8) -> Self {
        self.effect = Some(StatusEffect { status, chance });
        self
    }

    pub fn with_heal(mut self, heal: u16) -> Self {
        self.heal = heal;
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }
}
