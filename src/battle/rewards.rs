use crate::battle::engine::Battle;
use crate::battle::state::BattleKind;
use crate::external::{Outcome, OutcomeContext};
use crate::progression::gain_experience;
use std::sync::Arc;

/// Currency paid to the winner of a trainer battle.
const TRAINER_WIN_REWARD: u32 = 5;
/// Consolation paid to the loser of a trainer battle.
const TRAINER_LOSS_REWARD: u32 = 1;
/// Paid to both trainers when a trainer battle draws.
const TRAINER_DRAW_REWARD: u32 = 2;
/// Paid to a player who defeats a wild encounter.
const WILD_WIN_REWARD: u32 = 3;
/// Floor on the experience a side earns from its defeated opponents.
const MIN_EXPERIENCE: u32 = 10;

impl Battle {
    /// Run the conclusion hooks exactly once, in order: currency, then
    /// experience and persistence, then match history.
    pub(crate) fn settle(&mut self) {
        self.distribute_rewards();
        self.award_experience();
        self.record_outcomes();
    }

    fn distribute_rewards(&mut self) {
        let amounts: [u32; 2] = match self.kind {
            BattleKind::Trainer => match self.winner {
                Some(0) => [TRAINER_WIN_REWARD, TRAINER_LOSS_REWARD],
                Some(_) => [TRAINER_LOSS_REWARD, TRAINER_WIN_REWARD],
                None => [TRAINER_DRAW_REWARD, TRAINER_DRAW_REWARD],
            },
            BattleKind::Wild => {
                let mut amounts = [0, 0];
                if let Some(winner) = self.winner {
                    if !self.sides[winner].controller.is_ai() {
                        amounts[winner] = WILD_WIN_REWARD;
                    }
                }
                amounts
            }
        };
        for (index, amount) in amounts.into_iter().enumerate() {
            if amount == 0 {
                continue;
            }
            if let Some(account) = self.sides[index].controller.account() {
                self.ctx.ledger.credit_currency(account, amount);
                *self.rewards.entry(account).or_insert(0) += amount;
            }
        }
    }

    /// Experience for each player side from the opposing members it
    /// defeated, split evenly in full to every member that participated.
    /// Participated members are persisted afterward so level, moveset and
    /// evolution changes stick.
    fn award_experience(&mut self) {
        let catalog = Arc::clone(&self.ctx.catalog);
        let evolutions = Arc::clone(&self.ctx.evolutions);
        let provider = Arc::clone(&self.ctx.species);
        let ledger = Arc::clone(&self.ctx.ledger);

        for side_index in 0..2 {
            let Some(account) = self.sides[side_index].controller.account() else {
                continue;
            };

            let defeated: Vec<u8> = self.sides[1 - side_index]
                .team
                .iter()
                .filter(|member| member.is_fainted())
                .map(|member| member.individual.level())
                .collect();
            let experience = if defeated.is_empty() {
                0
            } else {
                let average =
                    defeated.iter().map(|level| u32::from(*level)).sum::<u32>()
                        / defeated.len() as u32;
                (average * 5).max(MIN_EXPERIENCE)
            };

            for member in &mut self.sides[side_index].team {
                if !member.participated {
                    continue;
                }
                if experience > 0 {
                    let title = member.individual.title();
                    let events = gain_experience(
                        &mut member.individual,
                        experience,
                        &catalog,
                        &evolutions,
                        provider.as_ref(),
                    );
                    let entry = self.experience_events.entry(account).or_default();
                    entry.push(format!("{} gained {} experience!", title, experience));
                    for event in events {
                        entry.push(format!("{}: {}", title, event.message()));
                    }
                }
                ledger.persist_roster_entry(account, member.individual.to_record());
            }
        }
    }

    fn record_outcomes(&mut self) {
        for side_index in 0..2 {
            let Some(account) = self.sides[side_index].controller.account() else {
                continue;
            };
            let outcome = match self.winner {
                None => Outcome::Draw,
                Some(winner) if winner == side_index => Outcome::Win,
                Some(_) => Outcome::Loss,
            };
            let opposing = &self.sides[1 - side_index];
            let context = OutcomeContext {
                kind: self.kind,
                opponent: opposing.controller.account(),
                wild_species: if opposing.controller.is_ai() {
                    opposing.team.first().map(|member| {
                        let species = member.individual.species();
                        (species.pokedex_number, species.name.clone())
                    })
                } else {
                    None
                },
            };
            self.ctx.ledger.record_outcome(account, outcome, context);
        }
    }
}
