use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleKind {
    /// Two player-owned rosters. Fleeing is not permitted.
    Trainer,
    /// A player roster against an engine-controlled wild encounter.
    Wild,
}

/// Coarse battle lifecycle. `Resolving` only exists inside a turn resolution
/// call; callers observe `AwaitingActions` or `Concluded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    AwaitingActions,
    Resolving,
    Concluded,
}

/// Where a player-controlled side is in its per-turn menu flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// No selection started this turn
    Idle,
    ChoosingMove,
    ChoosingSwitch,
    ChoosingItem,
    /// An action has been queued for this turn
    Ready,
}

/// Top-level menu choices available to a player each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Attack,
    Switch,
    Item,
    Run,
}

/// A fully specified action queued for turn resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueuedAction {
    Move { key: String },
    Switch { slot: usize },
    Item { key: String },
    Flee,
}

impl QueuedAction {
    /// Action-class priority used as the leading key when ordering a turn.
    /// Moves add their own priority tier on top of the base class.
    pub fn class_priority(&self, move_priority: i8) -> i16 {
        match self {
            QueuedAction::Flee => 6,
            QueuedAction::Switch { .. } => 5,
            QueuedAction::Item { .. } => 4,
            QueuedAction::Move { .. } => 3 + i16::from(move_priority),
        }
    }
}

/// Everything observable that happens during battle setup and turn
/// resolution, in order. `format()` renders the player-facing line;
/// variants that only matter to the host return `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    TurnStarted {
        turn: u32,
    },
    MoveUsed {
        attacker: String,
        move_name: String,
    },
    DamageDealt {
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        target: String,
        amount: u16,
    },
    StatusApplied {
        target: String,
        status: String,
    },
    StatusDamage {
        target: String,
        status: String,
        damage: u16,
    },
    WokeUp {
        name: String,
    },
    FastAsleep {
        name: String,
    },
    FullyParalyzed {
        name: String,
    },
    PokemonFainted {
        name: String,
    },
    PokemonSwitched {
        side: String,
        name: String,
    },
    ItemUsed {
        side: String,
        item: String,
        target: String,
        restored: u16,
    },
    ItemMissing {
        side: String,
        item: String,
    },
    UnknownItem {
        side: String,
        item: String,
    },
    UnknownMove {
        attacker: String,
        key: String,
    },
    Fled {
        side: String,
    },
    ReplacementRequired {
        side: String,
    },
    BattleEnded {
        winner: Option<String>,
    },
}

impl BattleEvent {
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { .. } => None,
            BattleEvent::MoveUsed { attacker, move_name } => {
                Some(format!("{} used {}!", attacker, move_name))
            }
            BattleEvent::DamageDealt {
                target,
                damage,
                remaining_hp,
            } => Some(format!(
                "{} took {} damage! ({} HP left)",
                target, damage, remaining_hp
            )),
            BattleEvent::PokemonHealed { target, amount } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::StatusApplied { target, status } => {
                Some(format!("{} was afflicted with {}!", target, status))
            }
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
            } => Some(format!("{} took {} damage from {}!", target, damage, status)),
            BattleEvent::WokeUp { name } => Some(format!("{} woke up!", name)),
            BattleEvent::FastAsleep { name } => Some(format!("{} is fast asleep.", name)),
            BattleEvent::FullyParalyzed { name } => {
                Some(format!("{} is paralyzed and can't move!", name))
            }
            BattleEvent::PokemonFainted { name } => Some(format!("{} fainted!", name)),
            BattleEvent::PokemonSwitched { side, name } => {
                Some(format!("{} sent out {}!", side, name))
            }
            BattleEvent::ItemUsed {
                side,
                item,
                target,
                restored,
            } => Some(format!(
                "{} used a {}! {} recovered {} HP.",
                side, item, target, restored
            )),
            BattleEvent::ItemMissing { side, item } => {
                Some(format!("{} doesn't have a {}!", side, item))
            }
            BattleEvent::UnknownItem { side, item } => {
                Some(format!("{} tried to use an unknown item: {}.", side, item))
            }
            BattleEvent::UnknownMove { attacker, key } => {
                Some(format!("{} tried to use {}, but it failed!", attacker, key))
            }
            BattleEvent::Fled { side } => Some(format!("{} fled from battle!", side)),
            BattleEvent::ReplacementRequired { side } => {
                Some(format!("{} must choose the next member!", side))
            }
            BattleEvent::BattleEnded { winner } => match winner {
                Some(name) => Some(format!("{} won the battle!", name)),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }
}

/// Ordered sink for battle events. Turn resolution pushes here; callers read
/// the events back or render them as lines.
#[derive(Debug, Default, Clone)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

/// Source of every random outcome a turn needs. `Scripted` replaces the
/// generator with a fixed outcome sequence so tests can pin down exact turn
/// results.
#[derive(Debug)]
pub enum TurnRng {
    Seeded(StdRng),
    Scripted { outcomes: Vec<u8>, index: usize },
}

impl TurnRng {
    pub fn seeded(seed: u64) -> Self {
        TurnRng::Seeded(StdRng::seed_from_u64(seed))
    }

    pub fn new_random() -> Self {
        TurnRng::Seeded(StdRng::from_os_rng())
    }

    pub fn scripted(outcomes: Vec<u8>) -> Self {
        TurnRng::Scripted { outcomes, index: 0 }
    }

    /// Next outcome in 1..=100. Scripted rngs panic when they run out, which
    /// means a test script didn't account for every roll the turn makes.
    fn next(&mut self, reason: &str) -> u8 {
        match self {
            TurnRng::Seeded(rng) => rng.random_range(1..=100),
            TurnRng::Scripted { outcomes, index } => {
                let value = *outcomes
                    .get(*index)
                    .unwrap_or_else(|| panic!("scripted rng exhausted at: {}", reason));
                *index += 1;
                value.clamp(1, 100)
            }
        }
    }

    /// Percent roll for chance checks, 1..=100.
    pub fn percent(&mut self, reason: &str) -> u8 {
        self.next(reason)
    }

    /// Damage variance factor in [0.85, 1.0].
    pub fn damage_jitter(&mut self) -> f64 {
        let roll = self.next("damage jitter");
        0.85 + 0.15 * f64::from(roll - 1) / 99.0
    }

    /// Tiebreak value for ordering actions with equal priority and speed.
    pub fn tiebreak(&mut self) -> u8 {
        self.next("turn order tiebreak")
    }

    /// Sleep duration in turns, 1..=3.
    pub fn sleep_turns(&mut self) -> u8 {
        1 + (self.next("sleep duration") - 1) % 3
    }
}
