//! Turn-based battle state machine.
//!
//! ```text
//! Setup ──start()──▶ InProgress ──step()/resolve_quick()/forfeit()──▶ Resolved
//! ```
//!
//! `start` checks entry costs; a failed check leaves the battle in `Setup`
//! and nothing else changes. Every `step` resolves exactly one attack, so a
//! battle resolves within `max_turns` steps.

use crate::card::TypeAdvantageTable;
use crate::combat::{apply_damage, resolve_damage};
use crate::config::{BattleRules, DamageParams, EngineConfig};
use crate::economy::Resource;
use crate::error::{EngineError, Result};
use crate::ids::AccountId;
use crate::rng::RandomSource;

use super::log::{BattleEvent, EndReason, TurnEvent};
use super::types::{BattleType, Deck, Eligibility, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattlePhase {
    Setup,
    InProgress,
    Resolved,
}

/// Per-side figures captured for the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideSummary {
    /// Deck power before the battle.
    pub power: u64,
    pub starting_health: u64,
    pub remaining_health: u64,
}

/// Final state of a resolved battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub kind: BattleType,
    pub winner: Side,
    pub reason: EndReason,
    pub turns: u32,
    pub initiator: SideSummary,
    pub opponent: SideSummary,
    pub log: Vec<BattleEvent>,
}

impl BattleOutcome {
    pub fn side(&self, side: Side) -> &SideSummary {
        match side {
            Side::Initiator => &self.initiator,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn loser(&self) -> Side {
        self.winner.other()
    }
}

#[derive(Clone, Debug)]
pub struct BattleSimulator {
    kind: BattleType,
    rules: BattleRules,
    damage: DamageParams,
    advantage: TypeAdvantageTable,
    max_turns: u32,
    quick_variance: u32,
    decks: [Deck; 2],
    power: [u64; 2],
    starting_health: [u64; 2],
    health: [u64; 2],
    phase: BattlePhase,
    turn: u32,
    active: Side,
    winner: Option<(Side, EndReason)>,
    log: Vec<BattleEvent>,
}

impl BattleSimulator {
    /// Prepare a battle between two decks.
    ///
    /// Both decks must hold at least `min_deck_size` cards and some health.
    pub fn setup(
        kind: BattleType,
        initiator: Deck,
        opponent: Deck,
        config: &EngineConfig,
    ) -> Result<Self> {
        let min = config.battle.min_deck_size;
        if initiator.len() < min || opponent.len() < min {
            return Err(EngineError::invalid("deck has fewer cards than required"));
        }
        if initiator.pooled_health() == 0 || opponent.pooled_health() == 0 {
            return Err(EngineError::invalid("deck has no health"));
        }

        let power = [
            initiator.power(&config.rarities),
            opponent.power(&config.rarities),
        ];
        let starting_health = [initiator.pooled_health(), opponent.pooled_health()];

        Ok(Self {
            kind,
            rules: *config.battle_rules(kind),
            damage: config.damage,
            advantage: config.advantage,
            max_turns: config.battle.max_turns,
            quick_variance: config.battle.quick_variance,
            decks: [initiator, opponent],
            power,
            starting_health,
            health: starting_health,
            phase: BattlePhase::Setup,
            turn: 0,
            active: Side::Initiator,
            winner: None,
            log: Vec::new(),
        })
    }

    pub fn kind(&self) -> BattleType {
        self.kind
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn health(&self, side: Side) -> u64 {
        self.health[side.index()]
    }

    pub fn power(&self, side: Side) -> u64 {
        self.power[side.index()]
    }

    pub fn log(&self) -> &[BattleEvent] {
        &self.log
    }

    /// Check the initiator can pay the entry cost and begin the battle.
    ///
    /// `account` is only used to label the error.
    pub fn start(&mut self, account: AccountId, eligibility: Eligibility) -> Result<()> {
        if self.phase != BattlePhase::Setup {
            return Err(EngineError::invalid("battle has already started"));
        }
        if eligibility.energy < self.rules.energy_cost {
            return Err(EngineError::InsufficientResource {
                account,
                resource: Resource::Energy,
                required: self.rules.energy_cost,
                available: eligibility.energy,
            });
        }
        if eligibility.tickets < self.rules.ticket_cost {
            return Err(EngineError::InsufficientResource {
                account,
                resource: Resource::Tickets,
                required: self.rules.ticket_cost,
                available: eligibility.tickets,
            });
        }

        self.phase = BattlePhase::InProgress;
        if self.max_turns == 0 {
            self.finish_at_turn_limit();
        }
        Ok(())
    }

    /// Resolve one attack by the active side.
    pub fn step(&mut self, rng: &mut dyn RandomSource) -> Result<TurnEvent> {
        self.require(BattlePhase::InProgress)?;

        let side = self.active;
        let target = side.other();
        let attackers = self.decks[side.index()].cards();
        let defenders = self.decks[target.index()].cards();
        let attacker = &attackers[rng.below(attackers.len() as u32) as usize];
        let defender = &defenders[rng.below(defenders.len() as u32) as usize];

        let roll = resolve_damage(attacker, defender, &self.advantage, &self.damage, rng);
        let remaining = apply_damage(self.health[target.index()], roll.damage);
        self.health[target.index()] = remaining;
        self.turn += 1;

        let event = TurnEvent {
            turn: self.turn,
            side,
            attacker: attacker.id,
            defender: defender.id,
            damage: roll.damage,
            critical: roll.critical,
            remaining_health: remaining,
        };
        self.log.push(BattleEvent::Turn(event));

        if remaining == 0 {
            self.finish(side, EndReason::Knockout);
        } else if self.turn >= self.max_turns {
            self.finish_at_turn_limit();
        } else {
            self.active = target;
        }

        Ok(event)
    }

    /// Play turns until the battle resolves.
    pub fn run(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        self.require(BattlePhase::InProgress)?;
        while self.phase == BattlePhase::InProgress {
            self.step(rng)?;
        }
        Ok(())
    }

    /// Skip the turn loop and decide the winner from deck power.
    ///
    /// The initiator's win chance is `power / (power + opponent power)`,
    /// shifted by a uniform draw in `±quick_variance` and clamped to
    /// `[0, 1000]` per-mille. A variance above 1000 behaves like 1000.
    pub fn resolve_quick(&mut self, rng: &mut dyn RandomSource) -> Result<()> {
        self.require(BattlePhase::InProgress)?;

        let [mine, theirs] = self.power;
        let total = u128::from(mine) + u128::from(theirs);
        let base = if total == 0 {
            500
        } else {
            (u128::from(mine) * 1000 / total) as i64
        };
        let spread = self.quick_variance.min(1000);
        let shift = i64::from(rng.range(0, spread * 2)) - i64::from(spread);
        let win_chance = (base + shift).clamp(0, 1000) as u32;
        let roll = rng.roll_per_mille();

        self.log.push(BattleEvent::QuickRoll { win_chance, roll });

        let winner = if roll < win_chance {
            Side::Initiator
        } else {
            Side::Opponent
        };
        self.health[winner.other().index()] = 0;
        self.finish(winner, EndReason::Quick);
        Ok(())
    }

    /// End an in-progress battle in favour of the other side.
    pub fn forfeit(&mut self, side: Side) -> Result<()> {
        self.require(BattlePhase::InProgress)?;
        self.log.push(BattleEvent::Forfeit { side });
        self.finish(side.other(), EndReason::Forfeit);
        Ok(())
    }

    /// Consume a resolved battle into its outcome.
    pub fn into_outcome(self) -> Result<BattleOutcome> {
        self.require(BattlePhase::Resolved)?;
        let (winner, reason) = self
            .winner
            .ok_or_else(|| EngineError::Corrupted("resolved battle without a winner".into()))?;

        let summary = |side: Side| SideSummary {
            power: self.power[side.index()],
            starting_health: self.starting_health[side.index()],
            remaining_health: self.health[side.index()],
        };

        Ok(BattleOutcome {
            kind: self.kind,
            winner,
            reason,
            turns: self.turn,
            initiator: summary(Side::Initiator),
            opponent: summary(Side::Opponent),
            log: self.log,
        })
    }

    fn require(&self, phase: BattlePhase) -> Result<()> {
        if self.phase == phase {
            return Ok(());
        }
        Err(EngineError::invalid(match phase {
            BattlePhase::Setup => "battle is not in setup",
            BattlePhase::InProgress => "battle is not in progress",
            BattlePhase::Resolved => "battle is not resolved",
        }))
    }

    /// Higher remaining health wins; ties go to higher starting power, then
    /// to the initiator.
    fn finish_at_turn_limit(&mut self) {
        let [mine, theirs] = self.health;
        let winner = if mine != theirs {
            if mine > theirs { Side::Initiator } else { Side::Opponent }
        } else if self.power[1] > self.power[0] {
            Side::Opponent
        } else {
            Side::Initiator
        };
        self.finish(winner, EndReason::TurnLimit);
    }

    fn finish(&mut self, winner: Side, reason: EndReason) {
        self.phase = BattlePhase::Resolved;
        self.winner = Some((winner, reason));
        self.log.push(BattleEvent::Finished { winner, reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Archetype, Card, CardStats, Rarity};
    use crate::ids::CardId;
    use crate::rng::{PcgRng, ScriptedRng};
    use proptest::prelude::*;

    fn deck(first_id: u64, attack: u32, defense: u32, health: u32) -> Deck {
        Deck::new((0..5).map(|i| {
            Card::new(
                CardId(first_id + i),
                1,
                Archetype::Warrior,
                Rarity::Common,
                CardStats::new(attack, defense, health),
                AccountId(first_id),
            )
        }))
        .expect("valid deck")
    }

    fn started(initiator: Deck, opponent: Deck, config: &EngineConfig) -> BattleSimulator {
        let mut battle = BattleSimulator::setup(BattleType::Practice, initiator, opponent, config)
            .expect("setup");
        battle
            .start(AccountId(1), Eligibility::default())
            .expect("start");
        battle
    }

    #[test]
    fn rejects_small_decks_during_setup() {
        let small = Deck::new(deck(1, 10, 10, 10).cards()[..4].to_vec()).expect("deck");
        let err = BattleSimulator::setup(
            BattleType::Quick,
            small,
            deck(100, 10, 10, 10),
            &EngineConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::invalid("deck has fewer cards than required"));
    }

    #[test]
    fn missing_energy_keeps_setup_phase() {
        let config = EngineConfig::default();
        let mut battle = BattleSimulator::setup(
            BattleType::Ranked,
            deck(1, 10, 10, 10),
            deck(100, 10, 10, 10),
            &config,
        )
        .expect("setup");

        let err = battle.start(AccountId(1), Eligibility::new(3, 0)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientResource {
                resource: Resource::Energy,
                required: 10,
                available: 3,
                ..
            }
        ));
        assert_eq!(battle.phase(), BattlePhase::Setup);
        assert!(battle.log().is_empty());
    }

    #[test]
    fn tournament_requires_a_ticket() {
        let mut battle = BattleSimulator::setup(
            BattleType::Tournament,
            deck(1, 10, 10, 10),
            deck(100, 10, 10, 10),
            &EngineConfig::default(),
        )
        .expect("setup");
        assert!(battle.start(AccountId(1), Eligibility::new(100, 0)).is_err());
        assert!(battle.start(AccountId(1), Eligibility::new(0, 1)).is_ok());
        assert_eq!(battle.phase(), BattlePhase::InProgress);
    }

    #[test]
    fn stepping_before_start_is_invalid() {
        let mut battle = BattleSimulator::setup(
            BattleType::Practice,
            deck(1, 10, 10, 10),
            deck(100, 10, 10, 10),
            &EngineConfig::default(),
        )
        .expect("setup");
        assert_eq!(
            battle.step(&mut PcgRng::new(1)).unwrap_err(),
            EngineError::invalid("battle is not in progress")
        );
        assert!(battle.clone().into_outcome().is_err());
        assert!(battle.forfeit(Side::Initiator).is_err());
    }

    #[test]
    fn sides_alternate_starting_with_initiator() {
        let config = EngineConfig::default();
        let mut battle = started(deck(1, 10, 0, 1000), deck(100, 10, 0, 1000), &config);
        let mut rng = PcgRng::new(3);
        let first = battle.step(&mut rng).expect("turn 1");
        let second = battle.step(&mut rng).expect("turn 2");
        assert_eq!(first.side, Side::Initiator);
        assert_eq!(second.side, Side::Opponent);
        assert_eq!(first.remaining_health, battle.health(Side::Opponent));
    }

    #[test]
    fn knockout_resolves_for_attacker() {
        let config = EngineConfig::default();
        // 5 × 1 health against 5 × 100 attack: the first hit ends it.
        let mut battle = started(deck(1, 100, 0, 100), deck(100, 1, 0, 1), &config);
        battle.run(&mut ScriptedRng::new([0, 0, 0, 999])).expect("run");
        let outcome = battle.into_outcome().expect("outcome");
        assert_eq!(outcome.winner, Side::Initiator);
        assert_eq!(outcome.reason, EndReason::Knockout);
        assert_eq!(outcome.turns, 1);
        assert_eq!(outcome.opponent.remaining_health, 0);
        assert!(matches!(
            outcome.log.last(),
            Some(BattleEvent::Finished {
                winner: Side::Initiator,
                reason: EndReason::Knockout
            })
        ));
    }

    #[test]
    fn turn_limit_prefers_remaining_health_then_power() {
        let mut config = EngineConfig::default();
        config.battle.max_turns = 4;

        // Nobody deals damage: equal health, opponent has more defense → power.
        let mut battle = started(deck(1, 0, 0, 100), deck(100, 0, 10, 100), &config);
        battle.run(&mut PcgRng::new(9)).expect("run");
        let outcome = battle.into_outcome().expect("outcome");
        assert_eq!(outcome.turns, 4);
        assert_eq!(outcome.reason, EndReason::TurnLimit);
        assert_eq!(outcome.winner, Side::Opponent);

        // Initiator hits, opponent does not.
        let mut battle = started(deck(1, 10, 0, 100), deck(100, 0, 50, 100), &config);
        battle.run(&mut PcgRng::new(9)).expect("run");
        assert_eq!(battle.into_outcome().expect("outcome").winner, Side::Initiator);
    }

    #[test]
    fn zero_turn_cap_resolves_on_start() {
        let mut config = EngineConfig::default();
        config.battle.max_turns = 0;
        let battle = started(deck(1, 10, 0, 100), deck(100, 10, 0, 100), &config);
        assert_eq!(battle.phase(), BattlePhase::Resolved);
        assert_eq!(battle.into_outcome().expect("outcome").winner, Side::Initiator);
    }

    #[test]
    fn forfeit_hands_victory_to_other_side() {
        let config = EngineConfig::default();
        let mut battle = started(deck(1, 10, 0, 100), deck(100, 10, 0, 100), &config);
        battle.forfeit(Side::Initiator).expect("forfeit");
        assert_eq!(
            battle.forfeit(Side::Opponent).unwrap_err(),
            EngineError::invalid("battle is not in progress")
        );
        let outcome = battle.into_outcome().expect("outcome");
        assert_eq!(outcome.winner, Side::Opponent);
        assert_eq!(outcome.reason, EndReason::Forfeit);
    }

    #[test]
    fn quick_resolution_follows_roll() {
        let config = EngineConfig::default();
        // Equal decks: base chance 500, shift drawn as 100 → 0, roll 499 → initiator.
        let mut battle = started(deck(1, 10, 0, 100), deck(100, 10, 0, 100), &config);
        battle
            .resolve_quick(&mut ScriptedRng::new([100, 499]))
            .expect("quick");
        let outcome = battle.into_outcome().expect("outcome");
        assert_eq!(outcome.winner, Side::Initiator);
        assert_eq!(outcome.turns, 0);
        assert_eq!(outcome.opponent.remaining_health, 0);
        assert_eq!(
            outcome.log.first(),
            Some(&BattleEvent::QuickRoll {
                win_chance: 500,
                roll: 499
            })
        );

        let mut battle = started(deck(1, 10, 0, 100), deck(100, 10, 0, 100), &config);
        battle
            .resolve_quick(&mut ScriptedRng::new([100, 500]))
            .expect("quick");
        assert_eq!(battle.into_outcome().expect("outcome").winner, Side::Opponent);
    }

    #[test]
    fn oversized_quick_variance_is_capped() {
        let mut config = EngineConfig::default();
        config.battle.quick_variance = u32::MAX;
        // Lowest shift of -1000 drives the chance to 0: the opponent wins.
        let mut battle = started(deck(1, 10, 0, 100), deck(100, 10, 0, 100), &config);
        battle
            .resolve_quick(&mut ScriptedRng::new([0, 0]))
            .expect("quick");
        let outcome = battle.into_outcome().expect("outcome");
        assert_eq!(outcome.winner, Side::Opponent);
        assert_eq!(
            outcome.log.first(),
            Some(&BattleEvent::QuickRoll {
                win_chance: 0,
                roll: 0
            })
        );
    }

    proptest! {
        #[test]
        fn always_resolves_within_turn_cap(
            seed in any::<u64>(),
            attack in 0u32..200,
            defense in 0u32..200,
            health in 1u32..500,
            cap in 1u32..200,
        ) {
            let mut config = EngineConfig::default();
            config.battle.max_turns = cap;
            let mut battle = started(deck(1, attack, defense, health), deck(100, attack, defense, health), &config);
            battle.run(&mut PcgRng::new(seed)).expect("run");
            prop_assert_eq!(battle.phase(), BattlePhase::Resolved);
            prop_assert!(battle.turn() <= cap);
        }

        #[test]
        fn same_seed_same_battle(seed in any::<u64>()) {
            let config = EngineConfig::default();
            let play = || {
                let mut battle = started(deck(1, 30, 10, 80), deck(100, 25, 20, 90), &config);
                battle.run(&mut PcgRng::new(seed)).expect("run");
                battle.into_outcome().expect("outcome")
            };
            prop_assert_eq!(play(), play());
        }
    }
}
