use crate::battle::engine::EngineContext;
use crate::catalog::MoveCatalog;
use crate::external::{AccountId, ItemEffect, Ledger, Outcome, OutcomeContext, SpeciesProvider};
use crate::pokemon::{Individual, IndividualRecord};
use crate::progression::EvolutionTable;
use schema::{BaseStats, GrowthRate, PokemonType, Species};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub(crate) fn species(pokedex_number: u16, name: &str, speed: u8) -> Arc<Species> {
    species_of_type(pokedex_number, name, PokemonType::Normal, speed)
}

pub(crate) fn species_of_type(
    pokedex_number: u16,
    name: &str,
    primary_type: PokemonType,
    speed: u8,
) -> Arc<Species> {
    Arc::new(Species {
        pokedex_number,
        name: name.to_string(),
        primary_type,
        secondary_type: None,
        base_stats: BaseStats {
            hp: 50,
            attack: 50,
            defense: 50,
            sp_attack: 50,
            sp_defense: 50,
            speed,
        },
        catch_rate: 100,
        growth_rate: GrowthRate::MediumFast,
    })
}

/// An individual with zeroed variance so its stats are exactly predictable
/// from the species and level.
pub(crate) fn individual_with_moves(
    species: Arc<Species>,
    level: u8,
    moves: &[&str],
) -> Individual {
    let record = IndividualRecord {
        nickname: None,
        species: species.pokedex_number,
        level,
        shiny: false,
        uid: format!("test-{}-{}", species.pokedex_number, level),
        ivs: [0; 6],
        evs: [0; 6],
        experience: species.growth_rate.exp_for_level(level),
        moves: moves.iter().map(|key| key.to_string()).collect(),
    };
    let provider = MapProvider::new(vec![Arc::clone(&species)]);
    let catalog = MoveCatalog::standard();
    Individual::from_record(record, &provider, &catalog).unwrap()
}

pub(crate) struct MapProvider {
    map: HashMap<u16, Arc<Species>>,
}

impl MapProvider {
    pub(crate) fn new(entries: Vec<Arc<Species>>) -> Self {
        MapProvider {
            map: entries
                .into_iter()
                .map(|species| (species.pokedex_number, species))
                .collect(),
        }
    }
}

impl SpeciesProvider for MapProvider {
    fn load_species(&self, pokedex_number: u16) -> Option<Arc<Species>> {
        self.map.get(&pokedex_number).cloned()
    }
}

/// Ledger double that records every call for assertions. Inventory is a
/// simple key count; everything else is append-only.
#[derive(Default)]
pub(crate) struct RecordingLedger {
    pub(crate) inventory: Mutex<HashMap<(AccountId, String), u32>>,
    pub(crate) items: Mutex<HashMap<String, ItemEffect>>,
    pub(crate) credits: Mutex<Vec<(AccountId, u32)>>,
    pub(crate) persisted: Mutex<Vec<(AccountId, IndividualRecord)>>,
    pub(crate) outcomes: Mutex<Vec<(AccountId, Outcome, OutcomeContext)>>,
}

impl RecordingLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stock(&self, account: AccountId, key: &str, count: u32, effect: ItemEffect) {
        self.inventory
            .lock()
            .unwrap()
            .insert((account, key.to_string()), count);
        self.items.lock().unwrap().insert(key.to_string(), effect);
    }

    pub(crate) fn define_item(&self, key: &str, effect: ItemEffect) {
        self.items.lock().unwrap().insert(key.to_string(), effect);
    }

    pub(crate) fn credited(&self, account: AccountId) -> u32 {
        self.credits
            .lock()
            .unwrap()
            .iter()
            .filter(|(who, _)| *who == account)
            .map(|(_, amount)| amount)
            .sum()
    }
}

impl Ledger for RecordingLedger {
    fn spend_item(&self, account: AccountId, item_key: &str, count: u32) -> bool {
        let mut inventory = self.inventory.lock().unwrap();
        match inventory.get_mut(&(account, item_key.to_string())) {
            Some(held) if *held >= count => {
                *held -= count;
                true
            }
            _ => false,
        }
    }

    fn item_effect(&self, item_key: &str) -> Option<ItemEffect> {
        self.items.lock().unwrap().get(item_key).cloned()
    }

    fn credit_currency(&self, account: AccountId, amount: u32) {
        self.credits.lock().unwrap().push((account, amount));
    }

    fn persist_roster_entry(&self, account: AccountId, record: IndividualRecord) {
        self.persisted.lock().unwrap().push((account, record));
    }

    fn record_outcome(&self, account: AccountId, outcome: Outcome, context: OutcomeContext) {
        self.outcomes.lock().unwrap().push((account, outcome, context));
    }
}

pub(crate) fn context_with(
    provider: MapProvider,
    ledger: Arc<RecordingLedger>,
) -> EngineContext {
    EngineContext {
        catalog: Arc::new(MoveCatalog::standard()),
        evolutions: Arc::new(EvolutionTable::standard()),
        species: Arc::new(provider),
        ledger,
    }
}

pub(crate) const RED: AccountId = 1;
pub(crate) const BLUE: AccountId = 2;

pub(crate) fn trainer_battle(
    roster_a: Vec<Individual>,
    roster_b: Vec<Individual>,
    rng: crate::battle::state::TurnRng,
    ledger: Arc<RecordingLedger>,
) -> crate::battle::engine::Battle {
    use crate::battle::side::SideSetup;
    use crate::battle::state::BattleKind;
    crate::battle::engine::Battle::start(
        SideSetup::human(RED, "Red", roster_a),
        SideSetup::human(BLUE, "Blue", roster_b),
        BattleKind::Trainer,
        context_with(MapProvider::new(vec![]), ledger),
        rng,
    )
    .unwrap()
}

pub(crate) fn wild_battle(
    roster: Vec<Individual>,
    wild: Individual,
    rng: crate::battle::state::TurnRng,
    ledger: Arc<RecordingLedger>,
) -> crate::battle::engine::Battle {
    use crate::battle::side::SideSetup;
    use crate::battle::state::BattleKind;
    crate::battle::engine::Battle::start(
        SideSetup::human(RED, "Red", roster),
        SideSetup::wild(wild),
        BattleKind::Wild,
        context_with(MapProvider::new(vec![]), ledger),
        rng,
    )
    .unwrap()
}

/// Submit one action per player side and return the resolved turn. Panics if
/// resolution did not run, which means a test queued an incomplete turn.
pub(crate) fn resolve_turn(
    battle: &mut crate::battle::engine::Battle,
    actions: &[(usize, crate::battle::state::QueuedAction)],
) -> crate::battle::engine::TurnLog {
    let mut last = None;
    for (side, action) in actions {
        last = Some(battle.submit_action(*side, action.clone()).unwrap());
    }
    match last {
        Some(crate::battle::engine::SubmitOutcome::Resolved(log)) => log,
        _ => panic!("turn did not resolve"),
    }
}

pub(crate) fn attack(key: &str) -> crate::battle::state::QueuedAction {
    crate::battle::state::QueuedAction::Move {
        key: key.to_string(),
    }
}

