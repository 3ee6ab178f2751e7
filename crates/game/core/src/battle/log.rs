//! Battle log for UI replay.
//!
//! The log is append-only and never read back by the resolution logic.

use crate::ids::CardId;

use super::types::Side;

/// Why a battle reached `Resolved`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// The loser's pooled health reached 0.
    Knockout,
    /// The turn cap was reached; decided on remaining health, then power.
    TurnLimit,
    /// Resolved by the quick win-probability roll.
    Quick,
    Forfeit,
}

/// One attack in a turn-based battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnEvent {
    pub turn: u32,
    pub side: Side,
    pub attacker: CardId,
    pub defender: CardId,
    pub damage: u64,
    pub critical: bool,
    /// Defending side's pooled health after the hit.
    pub remaining_health: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    Turn(TurnEvent),
    QuickRoll {
        /// Initiator win chance after perturbation, per-mille.
        win_chance: u32,
        roll: u32,
    },
    Forfeit {
        side: Side,
    },
    Finished {
        winner: Side,
        reason: EndReason,
    },
}

/// Hash a battle log into a 32-byte root.
///
/// Clients replaying a battle can compare roots instead of whole logs.
/// bincode encoding is deterministic, so equal logs give equal roots. An
/// event that fails to encode fails the whole root.
#[cfg(feature = "serde")]
pub fn compute_log_root(events: &[BattleEvent]) -> Result<[u8; 32], bincode::Error> {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for event in events {
        hasher.update(bincode::serialize(event)?);
    }

    Ok(hasher.finalize().into())
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    fn hit(turn: u32, damage: u64) -> BattleEvent {
        BattleEvent::Turn(TurnEvent {
            turn,
            side: Side::Initiator,
            attacker: CardId(1),
            defender: CardId(2),
            damage,
            critical: false,
            remaining_health: 100 - damage,
        })
    }

    #[test]
    fn root_commits_to_every_event() {
        let log = vec![hit(1, 10), hit(2, 20)];
        let root = compute_log_root(&log).expect("root");
        assert_eq!(compute_log_root(&log.clone()).expect("root"), root);

        let mut extended = log.clone();
        extended.push(BattleEvent::Finished {
            winner: Side::Initiator,
            reason: EndReason::Knockout,
        });
        assert_ne!(compute_log_root(&extended).expect("root"), root);

        let tampered = vec![hit(1, 10), hit(2, 21)];
        assert_ne!(compute_log_root(&tampered).expect("root"), root);
    }
}
