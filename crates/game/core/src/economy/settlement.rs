//! Battle settlement: entry costs, rewards, rating and win streaks.

use crate::battle::{
    BattleResult, BattleSetup, BattleStrategy, BattleType, Deck, Eligibility, Participant,
    Resolution, Side, ai_deck,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::ids::{AccountId, CardId, TransactionId};
use crate::rating::apply_rating;
use crate::rng::RandomSource;

use super::account::Resource;
use super::ledger::LedgerTx;
use super::store::EconomyStore;

/// Who the initiator fights.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Opponent {
    Player { account: AccountId, deck: Vec<CardId> },
    /// A generated deck mirroring the initiator's rarities.
    Ai,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRequest {
    pub kind: BattleType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resolution: Resolution,
    pub initiator: AccountId,
    pub deck: Vec<CardId>,
    pub opponent: Opponent,
}

impl<S: EconomyStore + ?Sized> LedgerTx<'_, S> {
    /// Build a deck from stored cards owned by `account`.
    pub fn load_deck(&mut self, account: AccountId, cards: &[CardId]) -> Result<Deck> {
        let mut loaded = Vec::with_capacity(cards.len());
        for &id in cards {
            loaded.push(self.owned_card(account, id)?.clone());
        }
        Deck::new(loaded)
    }

    /// Fight a battle and stage its settlement.
    ///
    /// Draws from `rng` in order: AI deck (if any), then the battle itself.
    pub fn fight(
        &mut self,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
        request: &BattleRequest,
    ) -> Result<BattleResult> {
        let now = self.now();
        let initiator = self.account(request.initiator)?.clone();
        let initiator_deck = self.load_deck(request.initiator, &request.deck)?;

        let (opponent, opponent_deck) = match &request.opponent {
            Opponent::Player { account, .. } if *account == request.initiator => {
                return Err(EngineError::invalid("an account cannot battle itself"));
            }
            Opponent::Player { account, deck } => {
                let context = self.account(*account)?.player_context(now);
                (Some(context), self.load_deck(*account, deck)?)
            }
            Opponent::Ai => (None, ai_deck(config, rng, &initiator_deck)?),
        };

        let setup = BattleSetup {
            kind: request.kind,
            initiator: request.initiator,
            eligibility: Eligibility::new(initiator.energy, initiator.tickets),
            initiator_deck,
            opponent_deck,
        };
        let outcome = request.resolution.resolve(setup, config, rng)?;
        let result = BattleResult::compose(
            outcome,
            &initiator.player_context(now),
            opponent.as_ref(),
            config,
        );

        self.settle_battle(config, &result)?;
        Ok(result)
    }

    /// Apply a composed battle result: charge the initiator's entry cost,
    /// pay both players, move ratings and update win streaks.
    pub fn settle_battle(
        &mut self,
        config: &EngineConfig,
        result: &BattleResult,
    ) -> Result<Vec<TransactionId>> {
        let rules = config.battle_rules(result.kind);
        let Participant::Player(initiator) = result.initiator.participant else {
            return Err(EngineError::invalid("battle initiator must be a player"));
        };
        self.consume(initiator, Resource::Energy, rules.energy_cost)?;
        self.consume(initiator, Resource::Tickets, rules.ticket_cost)?;

        let mut transactions = Vec::new();
        for side in [Side::Initiator, Side::Opponent] {
            let snapshot = result.side(side);
            let Participant::Player(account) = snapshot.participant else {
                continue;
            };
            transactions.extend(self.grant(account, snapshot.reward.bundle())?);

            let record = self.account_mut(account)?;
            record.rating = apply_rating(record.rating, snapshot.reward.rating_delta);
            record.win_streak = if side == result.winning_side {
                record.win_streak.saturating_add(1)
            } else {
                0
            };
        }
        Ok(transactions)
    }
}
