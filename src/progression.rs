use crate::catalog::MoveCatalog;
use crate::external::SpeciesProvider;
use crate::pokemon::Individual;
use std::collections::HashMap;

/// Something noteworthy that happened while applying experience, in the order
/// it happened. The caller renders these for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressionEvent {
    LeveledUp { level: u8 },
    Evolved { into: String },
}

impl ProgressionEvent {
    pub fn message(&self) -> String {
        match self {
            ProgressionEvent::LeveledUp { level } => format!("Reached level {}!", level),
            ProgressionEvent::Evolved { into } => format!("Evolved into {}!", into),
        }
    }
}

/// Level-triggered evolution chains, keyed by pokedex number. Built once and
/// shared read-only, like the move catalog.
#[derive(Debug, Clone)]
pub struct EvolutionTable {
    map: HashMap<u16, (u8, u16)>,
}

impl EvolutionTable {
    pub fn standard() -> Self {
        let map = HashMap::from([
            (1, (16, 2)),
            (2, (32, 3)),
            (4, (16, 5)),
            (5, (36, 6)),
            (7, (16, 8)),
            (8, (36, 9)),
            (10, (7, 11)),
            (11, (10, 12)),
            (13, (7, 14)),
            (14, (10, 15)),
            (16, (18, 17)),
            (17, (36, 18)),
            (19, (20, 20)),
            (25, (30, 26)),
            (35, (35, 36)),
            (39, (30, 40)),
            (52, (28, 53)),
            (58, (35, 59)),
            (63, (16, 64)),
            (64, (36, 65)),
            (66, (28, 67)),
            (67, (40, 68)),
        ]);
        EvolutionTable { map }
    }

    pub fn empty() -> Self {
        EvolutionTable { map: HashMap::new() }
    }

    /// The species this one evolves into at the given level, if any.
    pub fn next_evolution(&self, pokedex_number: u16, level: u8) -> Option<u16> {
        self.map
            .get(&pokedex_number)
            .filter(|(trigger_level, _)| level >= *trigger_level)
            .map(|(_, target)| *target)
    }
}

/// Apply an experience gain to an individual: recompute the level, top up the
/// moveset on level-up, and evolve if the new level crosses an evolution
/// trigger. Returns the events in the order they occurred.
///
/// Evolution is checked even without a level-up, so an individual loaded
/// above its trigger level still evolves on its next gain. An unresolvable
/// evolution target is skipped rather than treated as an error.
pub fn gain_experience(
    individual: &mut Individual,
    amount: u32,
    catalog: &MoveCatalog,
    evolutions: &EvolutionTable,
    provider: &dyn SpeciesProvider,
) -> Vec<ProgressionEvent> {
    let mut events = Vec::new();

    individual.experience = individual.experience.saturating_add(amount);
    let rate = individual.species.growth_rate;
    let new_level = rate.level_for_exp(individual.experience);

    while individual.level < new_level {
        individual.level += 1;
        events.push(ProgressionEvent::LeveledUp {
            level: individual.level,
        });
        if individual.moves.len() < 4 {
            individual.top_up_moves(catalog);
        }
    }

    if let Some(target) = evolutions.next_evolution(individual.species.pokedex_number, individual.level)
    {
        if let Some(species) = provider.load_species(target) {
            individual.species = species;
            individual.top_up_moves(catalog);
            events.push(ProgressionEvent::Evolved {
                into: individual.species.name.clone(),
            });
        }
    }

    events
}
