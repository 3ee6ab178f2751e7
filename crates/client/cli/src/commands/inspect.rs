//! Print card and deck power for a deck file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Show card and deck power for a deck file
#[derive(Parser)]
pub struct Inspect {
    /// Deck name under `decks/` (e.g., starter, rival)
    #[arg(value_name = "DECK")]
    deck: String,

    /// Content directory (defaults to the bundled content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let factory = super::factory(self.data_dir);
        let config = factory.load_config()?;
        let spec = factory.load_deck(&self.deck)?;
        let deck = spec.deck()?;

        println!("{} (owner {})", spec.name, spec.owner());
        for card in deck.cards() {
            println!(
                "  {:>6}  {:<9} {:<9} lvl {:>3}  atk {:>4} def {:>4} hp {:>5}  power {:>6}",
                card.id.0,
                card.archetype.to_string(),
                card.rarity.to_string(),
                card.level,
                card.stats.attack,
                card.stats.defense,
                card.stats.health,
                card.power(&config.rarities),
            );
        }
        println!("deck power {}", deck.power(&config.rarities));
        Ok(())
    }
}
