//! Core battle resolution and combatant model for a chat-platform collection
//! game. The host platform owns presentation, persistence and the economy;
//! this crate owns the rules: stats, experience, movesets, evolution, and the
//! turn-based battle state machine.
//!
//! A battle is driven entirely through action submission. Each player side
//! queues one action per turn; once every player side has queued, the turn
//! resolves in a single step against an injectable random source and produces
//! an ordered event log.

pub mod battle;
pub mod catalog;
pub mod errors;
pub mod external;
pub mod pokemon;
pub mod progression;

pub use battle::engine::{Battle, BattleSummary, EngineContext, SubmitOutcome, TurnLog};
pub use battle::side::{BattlePokemonState, BattleSide, Controller, SideSetup, StatusCondition};
pub use battle::state::{
    BattleEvent, BattleKind, EventBus, MenuAction, QueuedAction, SelectionMode, TurnRng,
};
pub use catalog::MoveCatalog;
pub use errors::{ActionError, SetupError, SpeciesError, TrainingError};
pub use external::{AccountId, ItemEffect, Ledger, Outcome, OutcomeContext, SpeciesProvider};
pub use pokemon::{Individual, IndividualRecord, StatKind, Stats, TrainingOutcome};
pub use progression::{gain_experience, EvolutionTable, ProgressionEvent};
