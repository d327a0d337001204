use crate::battle::side::{BattlePokemonState, BattleSide, SideSetup, StatusCondition};
use crate::battle::state::{
    BattleEvent, BattleKind, BattlePhase, EventBus, MenuAction, QueuedAction, SelectionMode,
    TurnRng,
};
use crate::catalog::{MoveCatalog, BASIC_ATTACK};
use crate::errors::{ActionError, ActionResult, SetupError, SetupResult};
use crate::external::{AccountId, Ledger, SpeciesProvider};
use crate::progression::EvolutionTable;
use schema::{MoveCategory, MoveData};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Paralysis cancels the paralyzed member's move this often, in percent.
const PARALYSIS_CHANCE: u8 = 25;

/// Shared read-only services a battle resolves against. Built once by the
/// host and cloned cheaply into each battle.
#[derive(Clone)]
pub struct EngineContext {
    pub catalog: Arc<MoveCatalog>,
    pub evolutions: Arc<EvolutionTable>,
    pub species: Arc<dyn SpeciesProvider>,
    pub ledger: Arc<dyn Ledger>,
}

/// Everything that happened in one resolution step, for the caller to render.
#[derive(Debug, Clone)]
pub struct TurnLog {
    pub events: Vec<BattleEvent>,
    pub lines: Vec<String>,
    pub concluded: bool,
}

impl TurnLog {
    fn from_bus(bus: EventBus, concluded: bool) -> Self {
        TurnLog {
            lines: bus.lines(),
            events: bus.events().to_vec(),
            concluded,
        }
    }
}

/// What a submitted choice led to: either the battle is still waiting on the
/// other side, or a resolution step ran and produced a log.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Pending,
    Resolved(TurnLog),
}

/// Final report of a concluded battle.
#[derive(Debug, Clone)]
pub struct BattleSummary {
    /// Winning side index, or `None` for a draw.
    pub winner: Option<usize>,
    pub rounds: u32,
    pub log: Vec<String>,
    pub rewards: HashMap<AccountId, u32>,
    pub experience_events: HashMap<AccountId, Vec<String>>,
}

/// A running battle between two sides. All mutation goes through the action
/// submission methods; a resolution step runs only once every player-side
/// action for the turn is in.
pub struct Battle {
    pub(crate) kind: BattleKind,
    pub(crate) sides: [BattleSide; 2],
    turn: u32,
    phase: BattlePhase,
    pub(crate) winner: Option<usize>,
    log: Vec<String>,
    rng: TurnRng,
    pub(crate) ctx: EngineContext,
    pub(crate) rewards: HashMap<AccountId, u32>,
    pub(crate) experience_events: HashMap<AccountId, Vec<String>>,
}

// The shared services in `ctx` are trait objects, so Debug is written out by
// hand over the battle's own state.
impl fmt::Debug for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battle")
            .field("kind", &self.kind)
            .field("turn", &self.turn)
            .field("phase", &self.phase)
            .field("winner", &self.winner)
            .field("sides", &self.sides)
            .finish_non_exhaustive()
    }
}

impl Battle {
    pub fn start(
        challenger: SideSetup,
        opponent: SideSetup,
        kind: BattleKind,
        ctx: EngineContext,
        rng: TurnRng,
    ) -> SetupResult<Battle> {
        let sides = [
            Self::build_side(challenger, 0)?,
            Self::build_side(opponent, 1)?,
        ];
        Ok(Battle {
            kind,
            sides,
            turn: 0,
            phase: BattlePhase::AwaitingActions,
            winner: None,
            log: Vec::new(),
            rng,
            ctx,
            rewards: HashMap::new(),
            experience_events: HashMap::new(),
        })
    }

    fn build_side(setup: SideSetup, index: usize) -> SetupResult<BattleSide> {
        if setup.roster.is_empty() {
            return Err(SetupError::EmptyRoster { side: index });
        }
        let team: Vec<BattlePokemonState> = setup
            .roster
            .into_iter()
            .map(BattlePokemonState::new)
            .collect();
        let mut side = BattleSide {
            controller: setup.controller,
            name: setup.name,
            team,
            active_index: 0,
            selection: SelectionMode::Idle,
            queued: None,
        };
        side.active_index = side
            .first_healthy()
            .ok_or(SetupError::NoHealthyMember { side: index })?;
        Ok(side)
    }

    pub fn kind(&self) -> BattleKind {
        self.kind
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side(&self, index: usize) -> &BattleSide {
        &self.sides[index]
    }

    pub fn is_concluded(&self) -> bool {
        self.phase == BattlePhase::Concluded
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The forced-replacement wait state: the side's active member fainted
    /// and a healthy benched member exists, so only a switch is accepted and
    /// the next turn cannot begin.
    pub fn awaiting_replacement(&self, side: usize) -> bool {
        !self.is_concluded()
            && !self.sides[side].controller.is_ai()
            && self.sides[side].active().is_fainted()
    }

    /// Open one of the top-level menus, or queue the whole action for `Run`.
    /// Re-selecting from `Ready` overwrites the previously queued action.
    pub fn select_menu(&mut self, side: usize, action: MenuAction) -> ActionResult<SubmitOutcome> {
        self.check_side(side)?;
        if self.awaiting_replacement(side) {
            if action != MenuAction::Switch {
                return Err(ActionError::ReplacementRequired);
            }
            self.sides[side].selection = SelectionMode::ChoosingSwitch;
            return Ok(SubmitOutcome::Pending);
        }
        match self.sides[side].selection {
            SelectionMode::Idle | SelectionMode::Ready => {}
            _ => return Err(ActionError::SelectionPending),
        }
        let side_state = &mut self.sides[side];
        match action {
            MenuAction::Attack => {
                side_state.queued = None;
                side_state.selection = SelectionMode::ChoosingMove;
                Ok(SubmitOutcome::Pending)
            }
            MenuAction::Switch => {
                if !side_state.has_available_switch() {
                    return Err(ActionError::NoSwitchAvailable);
                }
                side_state.queued = None;
                side_state.selection = SelectionMode::ChoosingSwitch;
                Ok(SubmitOutcome::Pending)
            }
            MenuAction::Item => {
                side_state.queued = None;
                side_state.selection = SelectionMode::ChoosingItem;
                Ok(SubmitOutcome::Pending)
            }
            MenuAction::Run => {
                if self.kind == BattleKind::Trainer {
                    return Err(ActionError::CannotFleeTrainerBattle);
                }
                side_state.queued = Some(QueuedAction::Flee);
                side_state.selection = SelectionMode::Ready;
                Ok(self.maybe_resolve())
            }
        }
    }

    /// Pick a move slot after opening the attack menu.
    pub fn choose_move(&mut self, side: usize, slot: usize) -> ActionResult<SubmitOutcome> {
        self.check_side(side)?;
        if self.awaiting_replacement(side) {
            return Err(ActionError::ReplacementRequired);
        }
        if self.sides[side].selection != SelectionMode::ChoosingMove {
            return Err(ActionError::NoChoicePending);
        }
        if slot >= 4 {
            return Err(ActionError::EmptyMoveSlot(slot));
        }
        let key = self.sides[side]
            .active()
            .individual
            .move_keys()
            .get(slot)
            .cloned()
            .ok_or(ActionError::EmptyMoveSlot(slot))?;
        let side_state = &mut self.sides[side];
        side_state.active_mut().participated = true;
        side_state.queued = Some(QueuedAction::Move { key });
        side_state.selection = SelectionMode::Ready;
        Ok(self.maybe_resolve())
    }

    /// Pick a roster slot after opening the switch menu, or as the forced
    /// replacement for a fainted active member. The forced case applies
    /// immediately instead of queueing.
    pub fn choose_switch(&mut self, side: usize, slot: usize) -> ActionResult<SubmitOutcome> {
        self.check_side(side)?;
        let forced = self.awaiting_replacement(side);
        if self.sides[side].selection != SelectionMode::ChoosingSwitch && !forced {
            return Err(ActionError::NoChoicePending);
        }
        self.validate_switch_target(side, slot)?;

        if forced {
            let mut events = EventBus::new();
            self.perform_switch(side, slot, &mut events);
            self.sides[side].selection = SelectionMode::Idle;
            self.append_log(&events);
            return Ok(SubmitOutcome::Resolved(TurnLog::from_bus(events, false)));
        }

        let side_state = &mut self.sides[side];
        side_state.queued = Some(QueuedAction::Switch { slot });
        side_state.selection = SelectionMode::Ready;
        Ok(self.maybe_resolve())
    }

    /// Pick a consumable after opening the item menu. Inventory and item
    /// lookup are deferred to execution so the turn order still charges the
    /// item action's priority.
    pub fn choose_item(&mut self, side: usize, key: &str) -> ActionResult<SubmitOutcome> {
        self.check_side(side)?;
        if self.awaiting_replacement(side) {
            return Err(ActionError::ReplacementRequired);
        }
        if self.sides[side].selection != SelectionMode::ChoosingItem {
            return Err(ActionError::NoChoicePending);
        }
        let side_state = &mut self.sides[side];
        side_state.queued = Some(QueuedAction::Item {
            key: key.to_string(),
        });
        side_state.selection = SelectionMode::Ready;
        Ok(self.maybe_resolve())
    }

    /// Queue a fully specified action directly, bypassing the menu flow.
    /// A later submission for the same turn overwrites the earlier one.
    pub fn submit_action(
        &mut self,
        side: usize,
        action: QueuedAction,
    ) -> ActionResult<SubmitOutcome> {
        self.check_side(side)?;
        if self.awaiting_replacement(side) {
            return match action {
                QueuedAction::Switch { slot } => {
                    self.validate_switch_target(side, slot)?;
                    let mut events = EventBus::new();
                    self.perform_switch(side, slot, &mut events);
                    self.sides[side].selection = SelectionMode::Idle;
                    self.append_log(&events);
                    Ok(SubmitOutcome::Resolved(TurnLog::from_bus(events, false)))
                }
                _ => Err(ActionError::ReplacementRequired),
            };
        }
        match &action {
            QueuedAction::Move { key } => {
                if !self.sides[side]
                    .active()
                    .individual
                    .move_keys()
                    .iter()
                    .any(|known| known == key)
                {
                    return Err(ActionError::UnknownMove(key.clone()));
                }
                // Queueing a move while active is what counts as battle
                // participation for experience eligibility.
                self.sides[side].active_mut().participated = true;
            }
            QueuedAction::Switch { slot } => self.validate_switch_target(side, *slot)?,
            QueuedAction::Item { .. } => {}
            QueuedAction::Flee => {
                if self.kind == BattleKind::Trainer {
                    return Err(ActionError::CannotFleeTrainerBattle);
                }
            }
        }
        let side_state = &mut self.sides[side];
        side_state.queued = Some(action);
        side_state.selection = SelectionMode::Ready;
        Ok(self.maybe_resolve())
    }

    fn check_side(&self, side: usize) -> ActionResult<()> {
        if self.is_concluded() {
            return Err(ActionError::BattleConcluded);
        }
        if side >= 2 {
            return Err(ActionError::InvalidSide(side));
        }
        if self.sides[side].controller.is_ai() {
            return Err(ActionError::NotPlayerControlled);
        }
        Ok(())
    }

    fn validate_switch_target(&self, side: usize, slot: usize) -> ActionResult<()> {
        let side_state = &self.sides[side];
        let member = side_state
            .team
            .get(slot)
            .ok_or(ActionError::InvalidSlot(slot))?;
        if member.is_fainted() {
            return Err(ActionError::FaintedMember(slot));
        }
        if slot == side_state.active_index && !side_state.active().is_fainted() {
            return Err(ActionError::AlreadyActive(slot));
        }
        Ok(())
    }

    /// Resolve the turn if every player side has an action queued and no side
    /// is waiting on a forced replacement.
    fn maybe_resolve(&mut self) -> SubmitOutcome {
        let ready = (0..2).all(|index| {
            let side = &self.sides[index];
            side.controller.is_ai() || (side.queued.is_some() && !side.active().is_fainted())
        });
        if !ready {
            return SubmitOutcome::Pending;
        }
        let log = self.resolve_turn();
        SubmitOutcome::Resolved(log)
    }

    fn resolve_turn(&mut self) -> TurnLog {
        self.phase = BattlePhase::Resolving;
        let mut events = EventBus::new();
        events.push(BattleEvent::TurnStarted {
            turn: self.turn + 1,
        });

        self.ensure_ai_actions();
        let order = self.action_order();

        for side_index in order {
            if self.phase == BattlePhase::Concluded {
                break;
            }
            let Some(action) = self.sides[side_index].queued.take() else {
                continue;
            };
            match action {
                QueuedAction::Move { key } => self.execute_move(side_index, &key, &mut events),
                QueuedAction::Switch { slot } => {
                    self.perform_switch(side_index, slot, &mut events)
                }
                QueuedAction::Item { key } => self.execute_item(side_index, &key, &mut events),
                QueuedAction::Flee => self.execute_flee(side_index, &mut events),
            }
        }

        self.turn += 1;
        self.end_of_turn_status(&mut events);

        for side in &mut self.sides {
            side.queued = None;
        }
        if self.phase != BattlePhase::Concluded {
            self.phase = BattlePhase::AwaitingActions;
            for index in 0..2 {
                if !self.awaiting_replacement(index) {
                    self.sides[index].selection = SelectionMode::Idle;
                }
            }
        }

        if self.phase == BattlePhase::Concluded {
            self.settle();
        }

        self.append_log(&events);
        TurnLog::from_bus(events, self.is_concluded())
    }

    /// Engine-controlled sides pick their strongest known move, preferring
    /// the earliest slot on a power tie.
    fn ensure_ai_actions(&mut self) {
        let catalog = Arc::clone(&self.ctx.catalog);
        for side in &mut self.sides {
            if !side.controller.is_ai() || side.queued.is_some() {
                continue;
            }
            let active = side.active();
            let mut best: Option<(&str, u16)> = None;
            for key in active.individual.move_keys() {
                if let Some(data) = catalog.lookup(key) {
                    if best.map_or(true, |(_, power)| data.power > power) {
                        best = Some((key, data.power));
                    }
                }
            }
            let key = best.map_or(BASIC_ATTACK, |(key, _)| key).to_string();
            side.active_mut().participated = true;
            side.queued = Some(QueuedAction::Move { key });
        }
    }

    /// Action order for the turn, decided up front from the queued actions:
    /// descending action-class priority, then active member speed, then a
    /// random tiebreak.
    fn action_order(&mut self) -> Vec<usize> {
        let mut keyed: Vec<(i16, u16, u8, usize)> = Vec::new();
        for index in 0..2 {
            let side = &self.sides[index];
            let Some(action) = &side.queued else { continue };
            let move_priority = match action {
                QueuedAction::Move { key } => self
                    .ctx
                    .catalog
                    .lookup(key)
                    .map_or(0, |data| data.priority),
                _ => 0,
            };
            let class = action.class_priority(move_priority);
            let speed = side.active().individual.stats().speed;
            keyed.push((class, speed, self.rng.tiebreak(), index));
        }
        keyed.sort_by(|a, b| b.cmp(a));
        keyed.into_iter().map(|(_, _, _, index)| index).collect()
    }

    fn execute_move(&mut self, attacker_index: usize, key: &str, events: &mut EventBus) {
        if self.sides[attacker_index].active().is_fainted() {
            return;
        }
        let attacker_title = self.sides[attacker_index].active().title();

        // Sleep is decremented when the sleeper would act; the turn it wakes
        // on is still spent waking, not attacking.
        match self.sides[attacker_index].active().status {
            Some(StatusCondition::Sleep { turns }) => {
                if turns <= 1 {
                    self.sides[attacker_index].active_mut().status = None;
                    events.push(BattleEvent::WokeUp {
                        name: attacker_title,
                    });
                    return;
                } else {
                    self.sides[attacker_index].active_mut().status =
                        Some(StatusCondition::Sleep { turns: turns - 1 });
                    events.push(BattleEvent::FastAsleep {
                        name: attacker_title,
                    });
                    return;
                }
            }
            Some(StatusCondition::Paralysis) => {
                if self.rng.percent("paralysis check") <= PARALYSIS_CHANCE {
                    events.push(BattleEvent::FullyParalyzed {
                        name: attacker_title,
                    });
                    return;
                }
            }
            _ => {}
        }

        let catalog = Arc::clone(&self.ctx.catalog);
        let Some(data) = catalog.lookup(key) else {
            events.push(BattleEvent::UnknownMove {
                attacker: attacker_title,
                key: key.to_string(),
            });
            return;
        };

        events.push(BattleEvent::MoveUsed {
            attacker: attacker_title.clone(),
            move_name: data.name.clone(),
        });

        let defender_index = 1 - attacker_index;
        let mut defender_fainted = false;
        {
            let (attacker, defender) = split_sides(&mut self.sides, attacker_index);

            if data.is_damaging() {
                let damage = compute_damage(
                    attacker.active(),
                    defender.active(),
                    data,
                    self.rng.damage_jitter(),
                );
                let target = defender.active_mut();
                target.apply_damage(damage);
                events.push(BattleEvent::DamageDealt {
                    target: target.title(),
                    damage,
                    remaining_hp: target.current_hp,
                });
                defender_fainted = target.is_fainted();
            }

            if data.heal > 0 {
                let user = attacker.active_mut();
                let restored = user.heal(data.heal);
                if restored > 0 {
                    events.push(BattleEvent::PokemonHealed {
                        target: user.title(),
                        amount: restored,
                    });
                }
            }

            if let Some(effect) = data.effect {
                let target = defender.active_mut();
                if !target.is_fainted() && target.status.is_none() {
                    let roll = self.rng.percent("status chance");
                    if roll <= effect.chance {
                        let condition = StatusCondition::from_kind(effect.status, &mut self.rng);
                        target.status = Some(condition);
                        events.push(BattleEvent::StatusApplied {
                            target: target.title(),
                            status: condition.abbreviation().to_string(),
                        });
                    }
                }
            }
        }

        if defender_fainted {
            events.push(BattleEvent::PokemonFainted {
                name: self.sides[defender_index].active().title(),
            });
            self.handle_faint(defender_index, events);
        }
    }

    fn perform_switch(&mut self, side_index: usize, slot: usize, events: &mut EventBus) {
        let side = &mut self.sides[side_index];
        if slot >= side.team.len() || side.team[slot].is_fainted() {
            return;
        }
        side.active_index = slot;
        events.push(BattleEvent::PokemonSwitched {
            side: side.name.clone(),
            name: side.active().title(),
        });
    }

    fn execute_item(&mut self, side_index: usize, key: &str, events: &mut EventBus) {
        if self.sides[side_index].active().is_fainted() {
            return;
        }
        let Some(account) = self.sides[side_index].controller.account() else {
            return;
        };
        let side_name = self.sides[side_index].name.clone();
        let Some(effect) = self.ctx.ledger.item_effect(key) else {
            events.push(BattleEvent::UnknownItem {
                side: side_name,
                item: key.to_string(),
            });
            return;
        };
        if !self.ctx.ledger.spend_item(account, key, 1) {
            events.push(BattleEvent::ItemMissing {
                side: side_name,
                item: effect.name,
            });
            return;
        }
        let target = self.sides[side_index].active_mut();
        let restored = target.heal(effect.battle_heal);
        events.push(BattleEvent::ItemUsed {
            side: side_name,
            item: effect.name,
            target: target.title(),
            restored,
        });
    }

    fn execute_flee(&mut self, side_index: usize, events: &mut EventBus) {
        events.push(BattleEvent::Fled {
            side: self.sides[side_index].name.clone(),
        });
        self.conclude(Some(1 - side_index), events);
    }

    fn handle_faint(&mut self, side_index: usize, events: &mut EventBus) {
        self.sides[side_index].queued = None;
        if self.sides[side_index].controller.is_ai() {
            if self.sides[side_index].force_next_available().is_some() {
                let side = &self.sides[side_index];
                events.push(BattleEvent::PokemonSwitched {
                    side: side.name.clone(),
                    name: side.active().title(),
                });
            } else {
                self.conclude(Some(1 - side_index), events);
            }
            return;
        }
        if self.sides[side_index].has_available_switch() {
            self.sides[side_index].selection = SelectionMode::ChoosingSwitch;
            events.push(BattleEvent::ReplacementRequired {
                side: self.sides[side_index].name.clone(),
            });
        } else {
            self.conclude(Some(1 - side_index), events);
        }
    }

    /// Burn then poison chip damage on each side's active member, in side
    /// order. A conclusion mid-way stops further ticks.
    fn end_of_turn_status(&mut self, events: &mut EventBus) {
        for side_index in 0..2 {
            if self.phase == BattlePhase::Concluded {
                return;
            }
            let active = self.sides[side_index].active();
            if active.is_fainted() {
                continue;
            }
            let max_hp = active.max_hp();
            let (damage, label) = match active.status {
                Some(StatusCondition::Burn) => ((max_hp / 16).max(1), "BRN"),
                Some(StatusCondition::Poison) => ((max_hp / 8).max(1), "PSN"),
                _ => continue,
            };
            let target = self.sides[side_index].active_mut();
            target.apply_damage(damage);
            events.push(BattleEvent::StatusDamage {
                target: target.title(),
                status: label.to_string(),
                damage,
            });
            if target.is_fainted() {
                events.push(BattleEvent::PokemonFainted {
                    name: target.title(),
                });
                self.handle_faint(side_index, events);
            }
        }
    }

    fn conclude(&mut self, winner: Option<usize>, events: &mut EventBus) {
        self.winner = winner;
        self.phase = BattlePhase::Concluded;
        events.push(BattleEvent::BattleEnded {
            winner: winner.map(|index| self.sides[index].name.clone()),
        });
    }

    fn append_log(&mut self, events: &EventBus) {
        self.log.extend(events.lines());
    }

    /// Final report, available once the battle has concluded.
    pub fn result(&self) -> Option<BattleSummary> {
        if !self.is_concluded() {
            return None;
        }
        Some(BattleSummary {
            winner: self.winner,
            rounds: self.turn,
            log: self.log.clone(),
            rewards: self.rewards.clone(),
            experience_events: self.experience_events.clone(),
        })
    }
}

fn split_sides(sides: &mut [BattleSide; 2], first: usize) -> (&mut BattleSide, &mut BattleSide) {
    let (left, right) = sides.split_at_mut(1);
    if first == 0 {
        (&mut left[0], &mut right[0])
    } else {
        (&mut right[0], &mut left[0])
    }
}

/// Damage for one hit: scaled base power against the relevant attack and
/// defense stats, a burn penalty on physical attacks, random variance in
/// [0.85, 1.0] and a 1.5x same-type bonus, floored, with a one point floor
/// for any damaging move.
fn compute_damage(
    attacker: &BattlePokemonState,
    defender: &BattlePokemonState,
    data: &MoveData,
    jitter: f64,
) -> u16 {
    let attacker_stats = attacker.individual.stats();
    let defender_stats = defender.individual.stats();
    let (mut attack, defense) = match data.category {
        MoveCategory::Special => (
            f64::from(attacker_stats.sp_attack),
            f64::from(defender_stats.sp_defense),
        ),
        _ => (
            f64::from(attacker_stats.attack),
            f64::from(defender_stats.defense),
        ),
    };
    if data.category == MoveCategory::Physical
        && matches!(attacker.status, Some(StatusCondition::Burn))
    {
        attack = (attack * 0.8).floor().max(1.0);
    }
    let level = f64::from(attacker.individual.level());
    let power = f64::from(data.power);
    let base = ((2.0 * level / 5.0 + 2.0) * power * attack / defense.max(1.0)) / 50.0 + 2.0;
    let mut damage = (base * jitter * stab_multiplier(attacker, data)).floor();
    if data.power > 0 && damage < 1.0 {
        damage = 1.0;
    }
    damage as u16
}

fn stab_multiplier(attacker: &BattlePokemonState, data: &MoveData) -> f64 {
    if attacker.individual.species().has_type(data.move_type) {
        1.5
    } else {
        1.0
    }
}
