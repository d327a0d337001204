use crate::catalog::MoveCatalog;
use crate::errors::{SpeciesError, TrainingError};
use crate::external::SpeciesProvider;
use rand::Rng;
use schema::Species;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STAT_COUNT: usize = 6;
/// Individual-variance ceiling per stat, fixed at creation.
pub const IV_MAX: u8 = 31;
/// Trained-variance ceiling per stat.
pub const EV_STAT_CAP: u8 = 252;
/// Trained-variance ceiling across all stats.
pub const EV_TOTAL_CAP: u16 = 510;
/// Trained-variance points gained per training session.
pub const EV_PER_SESSION: u16 = 4;

const SHINY_ODDS: u32 = 8192;

/// The six battle stats, in canonical order. Doubles as an index into the
/// per-stat variance arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
}

impl StatKind {
    pub const ALL: [StatKind; STAT_COUNT] = [
        StatKind::Hp,
        StatKind::Attack,
        StatKind::Defense,
        StatKind::SpAttack,
        StatKind::SpDefense,
        StatKind::Speed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StatKind::Hp => "HP",
            StatKind::Attack => "Attack",
            StatKind::Defense => "Defense",
            StatKind::SpAttack => "Sp. Attack",
            StatKind::SpDefense => "Sp. Defense",
            StatKind::Speed => "Speed",
        }
    }
}

/// Realized battle stats, derived from base stats, variance values and level.
/// Never stored; recomputed whenever the inputs change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
    pub speed: u16,
}

/// Result of a training operation, for presentation by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingOutcome {
    /// Points actually applied after clamping
    pub gained: u8,
    /// The stat's trained-variance total after the operation
    pub stat_total: u8,
    /// Sessions actually consumed for the clamped gain
    pub sessions_used: u32,
}

/// Serialized form of an [`Individual`] handed to the persistence layer.
/// Carries the species identifier rather than the species data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualRecord {
    pub nickname: Option<String>,
    pub species: u16,
    pub level: u8,
    pub shiny: bool,
    pub uid: String,
    pub ivs: [u8; STAT_COUNT],
    pub evs: [u8; STAT_COUNT],
    pub experience: u32,
    pub moves: Vec<String>,
}

/// One concrete creature owned by a player or spawned wild, as opposed to its
/// shared [`Species`] template. Variance values are clamped at construction;
/// the stat formula never re-validates them.
#[derive(Debug, Clone)]
pub struct Individual {
    pub(crate) species: Arc<Species>,
    nickname: Option<String>,
    pub(crate) level: u8,
    pub(crate) experience: u32,
    ivs: [u8; STAT_COUNT],
    pub(crate) evs: [u8; STAT_COUNT],
    pub(crate) moves: Vec<String>,
    instance_id: String,
    shiny: bool,
}

impl Individual {
    /// Create a fresh individual at the given level with random individual
    /// variance, no training, and the default moveset for its species.
    pub fn new(
        species: Arc<Species>,
        level: u8,
        catalog: &MoveCatalog,
        rng: &mut impl Rng,
    ) -> Self {
        let level = level.clamp(1, schema::GrowthRate::MAX_LEVEL);
        let mut ivs = [0u8; STAT_COUNT];
        for iv in &mut ivs {
            *iv = rng.random_range(0..=IV_MAX);
        }
        let experience = species.growth_rate.exp_for_level(level);
        let moves = catalog.default_moveset_for(&species, level);
        let shiny = rng.random_range(1..=SHINY_ODDS) == SHINY_ODDS;
        let instance_id = format!("{:032x}", rng.random::<u128>());

        Individual {
            species,
            nickname: None,
            level,
            experience,
            ivs,
            evs: [0; STAT_COUNT],
            moves,
            instance_id,
            shiny,
        }
    }

    /// Rebuild an individual from its persisted record, clamping variance
    /// values and reconciling experience with level. The stored experience
    /// counter wins: level is recomputed from it.
    pub fn from_record(
        record: IndividualRecord,
        provider: &dyn SpeciesProvider,
        catalog: &MoveCatalog,
    ) -> Result<Self, SpeciesError> {
        let species = provider
            .load_species(record.species)
            .ok_or(SpeciesError::NotFound(record.species))?;

        let mut ivs = record.ivs;
        for iv in &mut ivs {
            *iv = (*iv).min(IV_MAX);
        }
        let evs = normalise_evs(record.evs);
        let level = species.growth_rate.level_for_exp(record.experience);
        let moves = normalise_moves(record.moves, &species, level, catalog);

        Ok(Individual {
            species,
            nickname: record.nickname,
            level,
            experience: record.experience,
            ivs,
            evs,
            moves,
            instance_id: record.uid,
            shiny: record.shiny,
        })
    }

    pub fn to_record(&self) -> IndividualRecord {
        IndividualRecord {
            nickname: self.nickname.clone(),
            species: self.species.pokedex_number,
            level: self.level,
            shiny: self.shiny,
            uid: self.instance_id.clone(),
            ivs: self.ivs,
            evs: self.evs,
            experience: self.experience,
            moves: self.moves.clone(),
        }
    }

    pub fn species(&self) -> &Arc<Species> {
        &self.species
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn is_shiny(&self) -> bool {
        self.shiny
    }

    pub fn ivs(&self) -> &[u8; STAT_COUNT] {
        &self.ivs
    }

    pub fn evs(&self) -> &[u8; STAT_COUNT] {
        &self.evs
    }

    pub fn move_keys(&self) -> &[String] {
        &self.moves
    }

    pub fn set_nickname(&mut self, nickname: Option<String>) {
        self.nickname = nickname;
    }

    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species.name)
    }

    /// Name with the species spelled out when a nickname obscures it.
    pub fn title(&self) -> String {
        match &self.nickname {
            Some(nickname) if nickname != &self.species.name => {
                format!("{} ({})", nickname, self.species.name)
            }
            _ => self.species.name.clone(),
        }
    }

    /// Realized battle stats:
    /// `floor((2*base + iv + floor(ev/4)) * level / 100)` plus `level + 10`
    /// for HP and `5` for everything else.
    pub fn stats(&self) -> Stats {
        let base = &self.species.base_stats;
        Stats {
            hp: self.stat_value(base.hp, StatKind::Hp),
            attack: self.stat_value(base.attack, StatKind::Attack),
            defense: self.stat_value(base.defense, StatKind::Defense),
            sp_attack: self.stat_value(base.sp_attack, StatKind::SpAttack),
            sp_defense: self.stat_value(base.sp_defense, StatKind::SpDefense),
            speed: self.stat_value(base.speed, StatKind::Speed),
        }
    }

    pub fn max_hp(&self) -> u16 {
        let base = &self.species.base_stats;
        self.stat_value(base.hp, StatKind::Hp)
    }

    fn stat_value(&self, base: u8, stat: StatKind) -> u16 {
        let index = stat.index();
        let core = (2 * u32::from(base) + u32::from(self.ivs[index]) + u32::from(self.evs[index]) / 4)
            * u32::from(self.level)
            / 100;
        let value = if stat == StatKind::Hp {
            core + u32::from(self.level) + 10
        } else {
            core + 5
        };
        value as u16
    }

    pub fn total_evs(&self) -> u16 {
        self.evs.iter().map(|ev| u16::from(*ev)).sum()
    }

    pub fn remaining_ev_capacity(&self) -> u16 {
        EV_TOTAL_CAP.saturating_sub(self.total_evs())
    }

    /// Run training sessions against one stat. The gain is clamped against
    /// both the per-stat and the total cap within this single operation, so
    /// neither limit can be overshot regardless of prior training.
    pub fn train(
        &mut self,
        stat: StatKind,
        sessions: u32,
    ) -> Result<TrainingOutcome, TrainingError> {
        let index = stat.index();
        let current = self.evs[index];
        let remaining_stat = u16::from(EV_STAT_CAP.saturating_sub(current));
        if remaining_stat == 0 {
            return Err(TrainingError::StatMaxed);
        }
        let remaining_total = self.remaining_ev_capacity();
        if remaining_total == 0 {
            return Err(TrainingError::TotalCapReached);
        }

        let sessions = sessions.max(1);
        let requested = u16::try_from(sessions.saturating_mul(u32::from(EV_PER_SESSION)))
            .unwrap_or(u16::MAX);
        let gain = requested.min(remaining_stat).min(remaining_total);
        self.evs[index] = current + gain as u8;

        let sessions_used = (u32::from(gain) + u32::from(EV_PER_SESSION) - 1) / u32::from(EV_PER_SESSION);
        Ok(TrainingOutcome {
            gained: gain as u8,
            stat_total: self.evs[index],
            sessions_used: sessions_used.max(1),
        })
    }

    /// Extend the moveset with default candidates for the current species and
    /// level until it holds four moves or the candidates run out.
    pub(crate) fn top_up_moves(&mut self, catalog: &MoveCatalog) {
        for key in catalog.default_moveset_for(&self.species, self.level) {
            if self.moves.len() >= 4 {
                break;
            }
            if !self.moves.contains(&key) {
                self.moves.push(key);
            }
        }
    }
}

fn normalise_evs(raw: [u8; STAT_COUNT]) -> [u8; STAT_COUNT] {
    let mut evs = raw;
    for ev in &mut evs {
        *ev = (*ev).min(EV_STAT_CAP);
    }
    let total: u32 = evs.iter().map(|ev| u32::from(*ev)).sum();
    if total > u32::from(EV_TOTAL_CAP) {
        // Scale down proportionally to respect the overall cap.
        for ev in &mut evs {
            *ev = (u32::from(*ev) * u32::from(EV_TOTAL_CAP) / total) as u8;
        }
    }
    evs
}

fn normalise_moves(
    raw: Vec<String>,
    species: &Species,
    level: u8,
    catalog: &MoveCatalog,
) -> Vec<String> {
    let mut moves: Vec<String> = Vec::new();
    for key in raw {
        if catalog.contains(&key) && !moves.contains(&key) {
            moves.push(key);
        }
    }
    if moves.is_empty() {
        return catalog.default_moveset_for(species, level);
    }
    moves.truncate(4);
    moves
}
