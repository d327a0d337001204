use std::fmt;

/// Errors that make battle construction impossible. These are fatal: a battle
/// is never created in a broken state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// A side was given an empty roster
    EmptyRoster { side: usize },
    /// A side's roster contains no healthy member
    NoHealthyMember { side: usize },
}

/// Recoverable per-action errors. They leave the side's selection state
/// unchanged so the same side can retry; battle state is never corrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The battle has concluded and accepts no further actions
    BattleConcluded,
    /// The side index is not 0 or 1
    InvalidSide(usize),
    /// Actions on this side are controlled by the engine, not a player
    NotPlayerControlled,
    /// A menu selection arrived while a concrete choice was still pending
    SelectionPending,
    /// The side's active member fainted; only a switch is accepted
    ReplacementRequired,
    /// No healthy roster member is available to switch to
    NoSwitchAvailable,
    /// Fleeing is only permitted in wild battles
    CannotFleeTrainerBattle,
    /// No concrete choice is expected in the side's current selection state
    NoChoicePending,
    /// The chosen move slot is empty
    EmptyMoveSlot(usize),
    /// The active member does not know the submitted move
    UnknownMove(String),
    /// The chosen roster slot does not exist
    InvalidSlot(usize),
    /// The chosen roster member has fainted and cannot battle
    FaintedMember(usize),
    /// The chosen roster member is already in battle
    AlreadyActive(usize),
}

/// Errors from stat training. The training operation is atomic: either the
/// full clamped gain applies or nothing does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingError {
    /// The chosen stat already carries the per-stat maximum
    StatMaxed,
    /// The individual has reached the overall trained-variance limit
    TotalCapReached,
}

/// Errors from resolving species identifiers through the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesError {
    NotFound(u16),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::EmptyRoster { side } => {
                write!(f, "side {} cannot battle with an empty roster", side)
            }
            SetupError::NoHealthyMember { side } => {
                write!(f, "side {} has no healthy roster member", side)
            }
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::BattleConcluded => write!(f, "the battle is already over"),
            ActionError::InvalidSide(side) => write!(f, "invalid side index: {}", side),
            ActionError::NotPlayerControlled => write!(f, "that side acts on its own"),
            ActionError::SelectionPending => write!(f, "finish your current selection first"),
            ActionError::ReplacementRequired => write!(f, "choose your next member first"),
            ActionError::NoSwitchAvailable => {
                write!(f, "there are no healthy members to switch to")
            }
            ActionError::CannotFleeTrainerBattle => {
                write!(f, "you can't run from a trainer battle")
            }
            ActionError::NoChoicePending => write!(f, "no selection is in progress"),
            ActionError::EmptyMoveSlot(index) => write!(f, "move slot {} is empty", index + 1),
            ActionError::UnknownMove(key) => {
                write!(f, "your active member doesn't know {}", key)
            }
            ActionError::InvalidSlot(slot) => {
                write!(f, "party slot {} doesn't exist", slot + 1)
            }
            ActionError::FaintedMember(slot) => {
                write!(f, "the member in slot {} has fainted and can't battle", slot + 1)
            }
            ActionError::AlreadyActive(slot) => {
                write!(f, "the member in slot {} is already in battle", slot + 1)
            }
        }
    }
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingError::StatMaxed => write!(f, "that stat is already fully trained"),
            TrainingError::TotalCapReached => {
                write!(f, "the overall training limit has been reached")
            }
        }
    }
}

impl fmt::Display for SpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeciesError::NotFound(id) => write!(f, "species not found: #{}", id),
        }
    }
}

impl std::error::Error for SetupError {}
impl std::error::Error for ActionError {}
impl std::error::Error for TrainingError {}
impl std::error::Error for SpeciesError {}

/// Type alias for Results using SetupError
pub type SetupResult<T> = Result<T, SetupError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;
