use schema::{MoveCategory, MoveData, PokemonType, Species, StatusKind};
use std::collections::HashMap;

use MoveCategory::{Physical, Special, Status};
use PokemonType::*;

/// Universal fallback attack every species can use.
pub const BASIC_ATTACK: &str = "tackle";
/// Priority attack guaranteed among default moveset candidates.
pub const PRIORITY_ATTACK: &str = "quick_attack";

/// Read-only registry mapping move keys to their combat attributes, plus the
/// per-type signature movesets used to derive default movesets. Built once at
/// startup and passed by shared ownership into each battle; never reloaded.
#[derive(Debug, Clone)]
pub struct MoveCatalog {
    moves: HashMap<String, MoveData>,
    signatures: HashMap<PokemonType, Vec<&'static str>>,
}

impl MoveCatalog {
    /// The standard move table.
    pub fn standard() -> Self {
        let entries = vec![
            MoveData::new("tackle", "Tackle", Normal, Physical, 40, 95),
            MoveData::new("quick_attack", "Quick Attack", Normal, Physical, 40, 100)
                .with_priority(1),
            MoveData::new("vine_whip", "Vine Whip", Grass, Physical, 45, 100),
            MoveData::new("razor_leaf", "Razor Leaf", Grass, Physical, 55, 95),
            MoveData::new("sleep_powder", "Sleep Powder", Grass, Status, 0, 75)
                .with_status(StatusKind::Sleep, 100),
            MoveData::new("ember", "Ember", Fire, Special, 40, 100)
                .with_status(StatusKind::Burn, 10),
            MoveData::new("flame_wheel", "Flame Wheel", Fire, Physical, 60, 100)
                .with_status(StatusKind::Burn, 10),
            MoveData::new("will_o_wisp", "Will-O-Wisp", Fire, Status, 0, 85)
                .with_status(StatusKind::Burn, 100),
            MoveData::new("water_gun", "Water Gun", Water, Special, 40, 100),
            MoveData::new("bubble_beam", "Bubble Beam", Water, Special, 65, 100),
            MoveData::new("aqua_tail", "Aqua Tail", Water, Physical, 90, 90),
            MoveData::new("thunder_shock", "Thunder Shock", Electric, Special, 40, 100)
                .with_status(StatusKind::Paralysis, 10),
            MoveData::new("spark", "Spark", Electric, Physical, 65, 100)
                .with_status(StatusKind::Paralysis, 30),
            MoveData::new("thunder_wave", "Thunder Wave", Electric, Status, 0, 90)
                .with_status(StatusKind::Paralysis, 100),
            MoveData::new("gust", "Gust", Flying, Special, 40, 100),
            MoveData::new("air_slash", "Air Slash", Flying, Special, 75, 95),
            MoveData::new("confusion", "Confusion", Psychic, Special, 50, 100),
            MoveData::new("psybeam", "Psybeam", Psychic, Special, 65, 100),
            MoveData::new("future_sight", "Future Sight", Psychic, Special, 120, 100),
            MoveData::new("karate_chop", "Karate Chop", Fighting, Physical, 50, 100),
            MoveData::new("low_sweep", "Low Sweep", Fighting, Physical, 65, 100),
            MoveData::new("vital_throw", "Vital Throw", Fighting, Physical, 70, 100)
                .with_priority(-1),
            MoveData::new("scratch", "Scratch", Normal, Physical, 40, 100),
            MoveData::new("bite", "Bite", Dark, Physical, 60, 100),
            MoveData::new("slam", "Slam", Normal, Physical, 80, 75),
            MoveData::new("dragon_rage", "Dragon Rage", Dragon, Special, 40, 100),
            MoveData::new("disarming_voice", "Disarming Voice", Fairy, Special, 40, 100),
            MoveData::new("dazzling_gleam", "Dazzling Gleam", Fairy, Special, 80, 100),
            MoveData::new("moonblast", "Moonblast", Fairy, Special, 95, 100),
            MoveData::new("poison_sting", "Poison Sting", Poison, Physical, 30, 100)
                .with_status(StatusKind::Poison, 30),
            MoveData::new("sludge_bomb", "Sludge Bomb", Poison, Special, 90, 100)
                .with_status(StatusKind::Poison, 30),
            MoveData::new("bug_bite", "Bug Bite", Bug, Physical, 60, 100),
            MoveData::new("signal_beam", "Signal Beam", Bug, Special, 75, 100),
        ];

        let moves = entries
            .into_iter()
            .map(|data| (data.key.clone(), data))
            .collect();

        let signatures = HashMap::from([
            (Grass, vec!["tackle", "vine_whip", "razor_leaf", "sleep_powder"]),
            (Fire, vec!["scratch", "ember", "flame_wheel", "will_o_wisp"]),
            (Water, vec!["tackle", "water_gun", "bubble_beam", "aqua_tail"]),
            (Electric, vec!["quick_attack", "thunder_shock", "spark", "thunder_wave"]),
            (Normal, vec!["tackle", "quick_attack", "bite", "slam"]),
            (Flying, vec!["tackle", "gust", "quick_attack", "air_slash"]),
            (Poison, vec!["poison_sting", "tackle", "sludge_bomb"]),
            (Bug, vec!["tackle", "bug_bite", "signal_beam"]),
            (Psychic, vec!["confusion", "psybeam", "future_sight"]),
            (Fighting, vec!["karate_chop", "low_sweep", "vital_throw"]),
            (Fairy, vec!["disarming_voice", "dazzling_gleam", "moonblast"]),
            (Dragon, vec!["dragon_rage", "slam"]),
            (Dark, vec!["bite", "slam"]),
        ]);

        MoveCatalog { moves, signatures }
    }

    pub fn lookup(&self, key: &str) -> Option<&MoveData> {
        self.moves.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.moves.contains_key(key)
    }

    /// Candidate moves for a species' type(s), falling back to the basic
    /// attack when no type has a signature entry. A priority attack is always
    /// among the candidates.
    pub fn signature_candidates(&self, species: &Species) -> Vec<&'static str> {
        let mut candidates: Vec<&'static str> = Vec::new();
        for type_ in species.types() {
            if let Some(list) = self.signatures.get(&type_) {
                candidates.extend_from_slice(list);
            }
        }
        if candidates.is_empty() {
            candidates.push(BASIC_ATTACK);
        }
        if !candidates.contains(&PRIORITY_ATTACK) {
            candidates.push(PRIORITY_ATTACK);
        }
        candidates
    }

    /// Default moveset for an individual with no explicit moves: a slice of
    /// the signature candidates that grows with level, deduplicated and
    /// capped at four moves.
    pub fn default_moveset_for(&self, species: &Species, level: u8) -> Vec<String> {
        let candidates = self.signature_candidates(species);
        let stage = (usize::from(level) + 9) / 10;
        let stage = stage.clamp(1, candidates.len());
        let take = (stage + 1).clamp(2, 4);

        let mut moveset: Vec<String> = Vec::new();
        for key in candidates.into_iter().take(take) {
            if !moveset.iter().any(|known| known == key) {
                moveset.push(key.to_string());
            }
        }
        moveset.truncate(4);
        moveset
    }
}
