use crate::battle::state::{QueuedAction, SelectionMode, TurnRng};
use crate::external::AccountId;
use crate::pokemon::Individual;
use schema::StatusKind;

/// Runtime status condition on a battling member. Sleep carries its remaining
/// duration; the others tick until the battle ends or the member faints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCondition {
    Burn,
    Poison,
    Paralysis,
    Sleep { turns: u8 },
}

impl StatusCondition {
    pub fn from_kind(kind: StatusKind, rng: &mut TurnRng) -> Self {
        match kind {
            StatusKind::Burn => StatusCondition::Burn,
            StatusKind::Poison => StatusCondition::Poison,
            StatusKind::Paralysis => StatusCondition::Paralysis,
            StatusKind::Sleep => StatusCondition::Sleep {
                turns: rng.sleep_turns(),
            },
        }
    }

    pub fn kind(self) -> StatusKind {
        match self {
            StatusCondition::Burn => StatusKind::Burn,
            StatusCondition::Poison => StatusKind::Poison,
            StatusCondition::Paralysis => StatusKind::Paralysis,
            StatusCondition::Sleep { .. } => StatusKind::Sleep,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        self.kind().abbreviation()
    }
}

/// Who decides this side's actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Human(AccountId),
    Wild,
}

impl Controller {
    pub fn account(self) -> Option<AccountId> {
        match self {
            Controller::Human(account) => Some(account),
            Controller::Wild => None,
        }
    }

    pub fn is_ai(self) -> bool {
        matches!(self, Controller::Wild)
    }
}

/// One roster member's in-battle state, wrapping the persistent individual
/// with the HP, status and participation tracking that only exist during
/// battle.
#[derive(Debug, Clone)]
pub struct BattlePokemonState {
    pub individual: Individual,
    pub current_hp: u16,
    pub status: Option<StatusCondition>,
    /// Fought at least one turn; earns experience at conclusion.
    pub participated: bool,
}

impl BattlePokemonState {
    pub fn new(individual: Individual) -> Self {
        let current_hp = individual.max_hp();
        BattlePokemonState {
            individual,
            current_hp,
            status: None,
            participated: false,
        }
    }

    pub fn max_hp(&self) -> u16 {
        self.individual.max_hp()
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, saturating at zero. Returns the damage actually dealt.
    pub fn apply_damage(&mut self, damage: u16) -> u16 {
        let dealt = damage.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restore HP, clamped to the maximum. Returns the amount restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let restored = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += restored;
        restored
    }

    pub fn title(&self) -> String {
        self.individual.title()
    }
}

/// One of the two sides of a battle: its controller, roster, active member
/// and per-turn selection state.
#[derive(Debug)]
pub struct BattleSide {
    pub controller: Controller,
    /// Display name used in event lines.
    pub name: String,
    pub team: Vec<BattlePokemonState>,
    pub active_index: usize,
    pub selection: SelectionMode,
    pub queued: Option<QueuedAction>,
}

impl BattleSide {
    pub fn active(&self) -> &BattlePokemonState {
        &self.team[self.active_index]
    }

    pub fn active_mut(&mut self) -> &mut BattlePokemonState {
        &mut self.team[self.active_index]
    }

    pub fn first_healthy(&self) -> Option<usize> {
        self.team.iter().position(|member| !member.is_fainted())
    }

    /// Whether any benched member could still come in.
    pub fn has_available_switch(&self) -> bool {
        self.team
            .iter()
            .enumerate()
            .any(|(index, member)| index != self.active_index && !member.is_fainted())
    }

    /// Move the first healthy benched member into the active slot. Used for
    /// engine-controlled sides, which never wait on a menu.
    pub fn force_next_available(&mut self) -> Option<usize> {
        let next = self
            .team
            .iter()
            .enumerate()
            .position(|(index, member)| index != self.active_index && !member.is_fainted())?;
        self.active_index = next;
        Some(next)
    }
}

/// Inputs for one side of a new battle.
#[derive(Debug)]
pub struct SideSetup {
    pub controller: Controller,
    pub name: String,
    pub roster: Vec<Individual>,
}

impl SideSetup {
    pub fn human(account: AccountId, name: impl Into<String>, roster: Vec<Individual>) -> Self {
        SideSetup {
            controller: Controller::Human(account),
            name: name.into(),
            roster,
        }
    }

    pub fn wild(individual: Individual) -> Self {
        let name = format!("Wild {}", individual.species().name);
        SideSetup {
            controller: Controller::Wild,
            name,
            roster: vec![individual],
        }
    }
}
