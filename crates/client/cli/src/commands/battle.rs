//! Fight one battle between two decks against a fresh in-memory store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use arena_content::DeckSpec;
use arena_core::{
    Account, AccountId, BattleRequest, BattleResult, BattleType, Opponent, Resolution,
};
use arena_runtime::{ArenaService, InMemoryEconomyStore};
use clap::Parser;
use serde::Serialize;

/// Fight and settle one battle
#[derive(Parser)]
pub struct Battle {
    /// Initiator's deck name under `decks/`
    #[arg(long, default_value = "starter")]
    deck: String,

    /// Opponent's deck name; fights a generated AI deck when omitted
    #[arg(long)]
    opponent: Option<String>,

    /// Battle type
    #[arg(short, long, value_enum, default_value = "quick")]
    kind: KindArg,

    /// Resolution strategy
    #[arg(short, long, value_enum, default_value = "turn-based")]
    strategy: StrategyArg,

    /// Base random seed (overrides ARENA_RNG_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Content directory (defaults to the bundled content)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Balance sheet TOML (overrides ARENA_CONFIG_PATH)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Full JSON report
    Json,
    /// One-line summary per side
    Summary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum KindArg {
    Quick,
    Ranked,
    Tournament,
    Clan,
    Practice,
}

impl From<KindArg> for BattleType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Quick => Self::Quick,
            KindArg::Ranked => Self::Ranked,
            KindArg::Tournament => Self::Tournament,
            KindArg::Clan => Self::Clan,
            KindArg::Practice => Self::Practice,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum StrategyArg {
    /// Alternate attacks until one deck falls or the turn cap hits
    TurnBased,
    /// Compare deck power with one variance roll
    Quick,
}

impl From<StrategyArg> for Resolution {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::TurnBased => Self::TurnBased,
            StrategyArg::Quick => Self::Quick,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    result: &'a BattleResult,
    log_root: String,
    accounts: Vec<Account>,
}

/// Entry resources large enough for every battle type.
const SIM_ENERGY: u32 = 100;
const SIM_TICKETS: u32 = 10;

fn seed_deck(store: &InMemoryEconomyStore, spec: &DeckSpec, rating: u32) -> Result<()> {
    store.insert_account(Account::new(spec.owner(), rating).with_energy(SIM_ENERGY, SIM_TICKETS))?;
    for card in spec.cards() {
        store.insert_card(card)?;
    }
    Ok(())
}

impl Battle {
    pub fn execute(self) -> Result<()> {
        let factory = super::factory(self.data_dir);
        let mut config = super::runtime_config(&factory, self.config)?;
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        let rating = config.engine.rating.initial;

        let store = InMemoryEconomyStore::new();
        let initiator = factory.load_deck(&self.deck)?;
        seed_deck(&store, &initiator, rating)?;

        let opponent = match &self.opponent {
            Some(name) => {
                let spec = factory.load_deck(name)?;
                anyhow::ensure!(
                    spec.owner() != initiator.owner(),
                    "decks '{}' and '{}' belong to the same account",
                    initiator.name,
                    spec.name
                );
                seed_deck(&store, &spec, rating)?;
                Opponent::Player {
                    account: spec.owner(),
                    deck: spec.cards().iter().map(|card| card.id).collect(),
                }
            }
            None => Opponent::Ai,
        };

        let request = BattleRequest {
            kind: self.kind.into(),
            resolution: self.strategy.into(),
            initiator: initiator.owner(),
            deck: initiator.cards().iter().map(|card| card.id).collect(),
            opponent,
        };
        tracing::debug!(?request, seed = config.rng_seed, "simulating battle");

        let service = ArenaService::new(store, config);
        let receipt = service.battle(&request).context("battle failed")?;
        let result = &receipt.value;

        match self.format {
            OutputFormat::Json => {
                let mut accounts = Vec::new();
                for id in [Some(request.initiator), result.opponent.participant.account()]
                    .into_iter()
                    .flatten()
                {
                    accounts.extend(service.account(id)?);
                }
                let report = Report {
                    result,
                    log_root: hex::encode(result.log_root()?),
                    accounts,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Summary => {
                for snapshot in [&result.initiator, &result.opponent] {
                    println!(
                        "{:<16} power {:>6}  health {:>6}/{:<6}  reward {:?}",
                        label(snapshot.participant.account()),
                        snapshot.power,
                        snapshot.remaining_health,
                        snapshot.starting_health,
                        snapshot.reward.bundle(),
                    );
                }
                println!(
                    "winner {} after {} turns ({:?}), log root {}",
                    label(result.winner),
                    result.turns,
                    result.reason,
                    hex::encode(result.log_root()?),
                );
            }
        }
        Ok(())
    }
}

fn label(account: Option<AccountId>) -> String {
    account.map_or_else(|| "ai".to_string(), |id| id.to_string())
}
