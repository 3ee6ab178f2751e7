//! Generated opponents for battles without a second player.

use crate::card::mint_card;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::ids::{AccountId, CardId};
use crate::rng::RandomSource;

use super::types::Deck;

/// Owner recorded on AI cards. No stored account has this id.
pub const AI_ACCOUNT: AccountId = AccountId(0);

/// Build an AI deck that mirrors the rarity spread of `against`.
///
/// Card `i` takes the rarity of the opposing card at `i mod len`. AI cards
/// are never stored; their ids count down from `u64::MAX`.
pub fn ai_deck(config: &EngineConfig, rng: &mut dyn RandomSource, against: &Deck) -> Result<Deck> {
    if against.is_empty() {
        return Err(EngineError::invalid("cannot mirror an empty deck"));
    }
    let size = config.battle.ai_deck_size;
    let cards = (0..size).map(|i| {
        let rarity = against.cards()[i % against.len()].rarity;
        mint_card(
            &config.minting,
            &config.rarities,
            rng,
            CardId(u64::MAX - i as u64),
            rarity,
            AI_ACCOUNT,
        )
    });
    Deck::new(cards.collect::<Vec<_>>())
}
