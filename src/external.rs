use crate::battle::state::BattleKind;
use crate::pokemon::IndividualRecord;
use schema::Species;
use std::sync::Arc;

/// Opaque identifier for a player account on the host platform.
pub type AccountId = u64;

/// Per-account result of a concluded battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// What a recorded outcome was against, for the host's match history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeContext {
    pub kind: BattleKind,
    /// The opposing account in a trainer battle.
    pub opponent: Option<AccountId>,
    /// Pokedex number and display name of the wild encounter.
    pub wild_species: Option<(u16, String)>,
}

/// Consumable item attributes the battle engine needs. Anything beyond
/// in-battle healing stays on the host side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEffect {
    pub name: String,
    pub battle_heal: u16,
}

/// Read-only source of species records, implemented by the host's data layer.
pub trait SpeciesProvider: Send + Sync {
    fn load_species(&self, pokedex_number: u16) -> Option<Arc<Species>>;
}

/// Host-side persistence and economy hooks. The engine calls these at item
/// use and at battle conclusion; it never reads them back, so implementations
/// are free to apply them asynchronously.
pub trait Ledger: Send + Sync {
    /// Deduct `count` of an item from the account's inventory. Returns false
    /// when the account doesn't hold enough, in which case nothing is spent.
    fn spend_item(&self, account: AccountId, item_key: &str, count: u32) -> bool;

    fn item_effect(&self, item_key: &str) -> Option<ItemEffect>;

    fn credit_currency(&self, account: AccountId, amount: u32);

    fn persist_roster_entry(&self, account: AccountId, record: IndividualRecord);

    fn record_outcome(&self, account: AccountId, outcome: Outcome, context: OutcomeContext);
}
