//! Engine configuration: every balance table in one place.
//!
//! Components receive the part of [`EngineConfig`] they need instead of
//! carrying their own copies of rarity multipliers or reward values.
//! `Default` reproduces the production balance sheet.

use crate::battle::BattleType;
use crate::card::{Rarity, RarityTable, TypeAdvantageTable};
use crate::economy::Currency;
use crate::economy::PackKind;
use crate::reward::{AchievementTier, QuestDifficulty, RewardBundle};

/// Root configuration shared by every engine component.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub rarities: RarityTable,
    pub advantage: TypeAdvantageTable,
    pub damage: DamageParams,
    pub battle: BattleParams,
    pub battle_types: BattleTypeTable,
    pub rating: RatingParams,
    pub rewards: RewardParams,
    pub daily: DailyRewardTable,
    pub quests: QuestRewardTable,
    pub achievements: AchievementRewardTable,
    pub referrals: Vec<ReferralMilestone>,
    pub tournament: Vec<TournamentPrize>,
    pub market: MarketParams,
    pub shop: ShopParams,
    pub upgrade: UpgradeParams,
    pub minting: MintParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rarities: RarityTable::default(),
            advantage: TypeAdvantageTable::default(),
            damage: DamageParams::default(),
            battle: BattleParams::default(),
            battle_types: BattleTypeTable::default(),
            rating: RatingParams::default(),
            rewards: RewardParams::default(),
            daily: DailyRewardTable::default(),
            quests: QuestRewardTable::default(),
            achievements: AchievementRewardTable::default(),
            referrals: default_referrals(),
            tournament: default_tournament(),
            market: MarketParams::default(),
            shop: ShopParams::default(),
            upgrade: UpgradeParams::default(),
            minting: MintParams::default(),
        }
    }
}

impl EngineConfig {
    /// Largest deck a side may bring into battle.
    pub const MAX_DECK_SIZE: usize = 30;

    pub fn battle_rules(&self, kind: BattleType) -> &BattleRules {
        self.battle_types.get(kind)
    }
}

/// Damage formula constants, all in per-mille.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Share of defense that mitigates damage (0.4).
    pub defense_factor: u32,
    /// Cap on mitigation as a share of attack (0.6).
    pub mitigation_cap: u32,
    /// Damage floor as a share of attack (0.25).
    pub minimum_share: u32,
    pub variance_min: u32,
    pub variance_max: u32,
    pub crit_chance: u32,
    pub crit_multiplier: u32,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            defense_factor: 400,
            mitigation_cap: 600,
            minimum_share: 250,
            variance_min: 850,
            variance_max: 1150,
            crit_chance: 150,
            crit_multiplier: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleParams {
    pub min_deck_size: usize,
    /// Turn cap for the turn-based strategy.
    pub max_turns: u32,
    /// Quick-battle perturbation of the win probability, per-mille.
    pub quick_variance: u32,
    pub ai_deck_size: usize,
}

impl Default for BattleParams {
    fn default() -> Self {
        Self {
            min_deck_size: 5,
            max_turns: 100,
            quick_variance: 100,
            ai_deck_size: 5,
        }
    }
}

/// Per-battle-type rewards, rating deltas and entry costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleRules {
    pub winner_gold: u64,
    pub winner_tokens: u64,
    pub loser_gold: u64,
    pub loser_tokens: u64,
    pub rating_win: i64,
    pub rating_loss: i64,
    pub energy_cost: u32,
    pub ticket_cost: u32,
}

impl BattleRules {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        winner_gold: u64,
        winner_tokens: u64,
        loser_gold: u64,
        loser_tokens: u64,
        rating_win: i64,
        rating_loss: i64,
        energy_cost: u32,
        ticket_cost: u32,
    ) -> Self {
        Self {
            winner_gold,
            winner_tokens,
            loser_gold,
            loser_tokens,
            rating_win,
            rating_loss,
            energy_cost,
            ticket_cost,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleTypeTable {
    pub quick: BattleRules,
    pub ranked: BattleRules,
    pub tournament: BattleRules,
    pub clan: BattleRules,
    pub practice: BattleRules,
}

impl BattleTypeTable {
    pub const fn get(&self, kind: BattleType) -> &BattleRules {
        match kind {
            BattleType::Quick => &self.quick,
            BattleType::Ranked => &self.ranked,
            BattleType::Tournament => &self.tournament,
            BattleType::Clan => &self.clan,
            BattleType::Practice => &self.practice,
        }
    }
}

impl Default for BattleTypeTable {
    fn default() -> Self {
        Self {
            quick: BattleRules::new(100, 50, 25, 10, 15, 10, 5, 0),
            ranked: BattleRules::new(200, 100, 50, 20, 25, 20, 10, 0),
            tournament: BattleRules::new(500, 250, 100, 50, 40, 30, 0, 1),
            clan: BattleRules::new(300, 150, 75, 30, 20, 15, 10, 0),
            practice: BattleRules::new(20, 5, 10, 0, 0, 0, 0, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RatingParams {
    pub initial: u32,
    /// Rating gap beyond which the winner's gain is scaled.
    pub gap_threshold: i64,
    /// Gain multiplier (percent) when the favourite wins.
    pub expected_percent: i64,
    /// Gain multiplier (percent) when the underdog wins.
    pub upset_percent: i64,
}

impl Default for RatingParams {
    fn default() -> Self {
        Self {
            initial: 1000,
            gap_threshold: 200,
            expected_percent: 50,
            upset_percent: 150,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardParams {
    pub streak_cap: u32,
    pub streak_tokens: u64,
    /// Gold bonus per streak step, as a multiple of the token bonus.
    pub streak_gold_factor: u64,
    /// Reward growth per account level, per-mille.
    pub level_bonus: u64,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            streak_cap: 10,
            streak_tokens: 5,
            streak_gold_factor: 10,
            level_bonus: 50,
        }
    }
}

/// Login rewards indexed by day in the cycle (index 0 is day 1).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyRewardTable {
    pub days: Vec<RewardBundle>,
}

impl Default for DailyRewardTable {
    fn default() -> Self {
        Self {
            days: vec![
                RewardBundle::gold(100),
                RewardBundle::gold(150),
                RewardBundle::gold(200).with_gems(5),
                RewardBundle::gold(250),
                RewardBundle::gold(300).with_gems(10),
                RewardBundle::gold(400),
                RewardBundle::gold(500).with_gems(25).with_tokens(50),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuestRewardTable {
    pub easy: RewardBundle,
    pub medium: RewardBundle,
    pub hard: RewardBundle,
    pub legendary: RewardBundle,
}

impl QuestRewardTable {
    pub const fn get(&self, difficulty: QuestDifficulty) -> RewardBundle {
        match difficulty {
            QuestDifficulty::Easy => self.easy,
            QuestDifficulty::Medium => self.medium,
            QuestDifficulty::Hard => self.hard,
            QuestDifficulty::Legendary => self.legendary,
        }
    }
}

impl Default for QuestRewardTable {
    fn default() -> Self {
        Self {
            easy: RewardBundle::gold(100).with_tokens(10),
            medium: RewardBundle::gold(250).with_tokens(25),
            hard: RewardBundle::gold(500).with_tokens(50).with_gems(5),
            legendary: RewardBundle::gold(1000).with_tokens(100).with_gems(20),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AchievementRewardTable {
    pub bronze: RewardBundle,
    pub silver: RewardBundle,
    pub gold: RewardBundle,
    pub platinum: RewardBundle,
    pub diamond: RewardBundle,
}

impl AchievementRewardTable {
    pub const fn get(&self, tier: AchievementTier) -> RewardBundle {
        match tier {
            AchievementTier::Bronze => self.bronze,
            AchievementTier::Silver => self.silver,
            AchievementTier::Gold => self.gold,
            AchievementTier::Platinum => self.platinum,
            AchievementTier::Diamond => self.diamond,
        }
    }
}

impl Default for AchievementRewardTable {
    fn default() -> Self {
        Self {
            bronze: RewardBundle::gold(50),
            silver: RewardBundle::gold(150).with_tokens(10),
            gold: RewardBundle::gold(400).with_tokens(30),
            platinum: RewardBundle::gold(1000).with_tokens(75).with_gems(10),
            diamond: RewardBundle::gold(2500).with_tokens(200).with_gems(50),
        }
    }
}

/// Reward granted when an account reaches `referrals` successful referrals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferralMilestone {
    pub referrals: u32,
    pub reward: RewardBundle,
}

fn default_referrals() -> Vec<ReferralMilestone> {
    vec![
        ReferralMilestone {
            referrals: 1,
            reward: RewardBundle::gold(200),
        },
        ReferralMilestone {
            referrals: 5,
            reward: RewardBundle::gold(1000).with_gems(10),
        },
        ReferralMilestone {
            referrals: 10,
            reward: RewardBundle::gold(2500).with_gems(25),
        },
        ReferralMilestone {
            referrals: 25,
            reward: RewardBundle::gold(7500).with_gems(100).with_tokens(250),
        },
    ]
}

/// Weekly tournament prize for final ranks `first..=last`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentPrize {
    pub first: u32,
    pub last: u32,
    pub reward: RewardBundle,
}

fn default_tournament() -> Vec<TournamentPrize> {
    vec![
        TournamentPrize {
            first: 1,
            last: 1,
            reward: RewardBundle::gold(10_000).with_tokens(1_000).with_gems(100),
        },
        TournamentPrize {
            first: 2,
            last: 2,
            reward: RewardBundle::gold(5_000).with_tokens(500).with_gems(50),
        },
        TournamentPrize {
            first: 3,
            last: 3,
            reward: RewardBundle::gold(2_500).with_tokens(250).with_gems(25),
        },
        TournamentPrize {
            first: 4,
            last: 10,
            reward: RewardBundle::gold(1_000).with_tokens(100),
        },
        TournamentPrize {
            first: 11,
            last: 50,
            reward: RewardBundle::gold(250).with_tokens(25),
        },
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MarketParams {
    /// Platform fee in basis points of the sale price.
    pub fee_bps: u32,
    pub tax_bps: u32,
    /// Platform-funded bonus for sellers with an active VIP status, in
    /// basis points of the sale price.
    pub vip_seller_bonus_bps: u32,
    pub min_price: u64,
    pub max_price: u64,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            fee_bps: 500,
            tax_bps: 0,
            vip_seller_bonus_bps: 100,
            min_price: 10,
            max_price: 10_000_000,
        }
    }
}

/// Price, size and odds of one pack type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackRules {
    pub currency: Currency,
    pub price: u64,
    pub cards: u32,
    /// Total packs that may ever be sold; `None` is unlimited.
    pub supply: Option<u64>,
    /// Relative weights in [`Rarity`] declaration order.
    pub rarity_weights: [u32; 5],
}

impl PackRules {
    /// Pick a rarity from the weight table with one draw.
    pub fn roll_rarity(&self, roll: u32) -> Rarity {
        use strum::IntoEnumIterator;

        let total = self.total_weight();
        if total == 0 {
            return Rarity::Common;
        }
        let mut point = u64::from(roll) % total;
        for (rarity, weight) in Rarity::iter().zip(self.rarity_weights.map(u64::from)) {
            if point < weight {
                return rarity;
            }
            point -= weight;
        }
        Rarity::Common
    }

    /// Sum of the weights, widened so five `u32` weights cannot overflow.
    pub fn total_weight(&self) -> u64 {
        self.rarity_weights.iter().copied().map(u64::from).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PackCatalogue {
    pub basic: PackRules,
    pub premium: PackRules,
    pub legendary: PackRules,
}

impl PackCatalogue {
    pub const fn get(&self, kind: PackKind) -> &PackRules {
        match kind {
            PackKind::Basic => &self.basic,
            PackKind::Premium => &self.premium,
            PackKind::Legendary => &self.legendary,
        }
    }
}

impl Default for PackCatalogue {
    fn default() -> Self {
        Self {
            basic: PackRules {
                currency: Currency::Gold,
                price: 500,
                cards: 3,
                supply: None,
                rarity_weights: [700, 220, 60, 18, 2],
            },
            premium: PackRules {
                currency: Currency::Gems,
                price: 50,
                cards: 5,
                supply: None,
                rarity_weights: [0, 600, 280, 100, 20],
            },
            legendary: PackRules {
                currency: Currency::Gems,
                price: 200,
                cards: 5,
                supply: Some(1_000),
                rarity_weights: [0, 0, 500, 400, 100],
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShopParams {
    pub daily_purchase_limit: u32,
    pub vip_daily_purchase_limit: u32,
    pub packs: PackCatalogue,
}

impl Default for ShopParams {
    fn default() -> Self {
        Self {
            daily_purchase_limit: 10,
            vip_daily_purchase_limit: 20,
            packs: PackCatalogue::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UpgradeParams {
    pub success_chance: u32,
    pub max_level: u32,
    /// Stat growth on success, percent (at least +1 per stat).
    pub stat_growth_percent: u32,
    /// Gold cost per level, indexed by rarity.
    pub cost_per_level: [u64; 5],
}

impl UpgradeParams {
    pub fn cost(&self, rarity: Rarity, level: u32) -> u64 {
        self.cost_per_level[rarity as usize].saturating_mul(u64::from(level.max(1)))
    }
}

impl Default for UpgradeParams {
    fn default() -> Self {
        Self {
            success_chance: 300,
            max_level: 100,
            stat_growth_percent: 10,
            cost_per_level: [100, 250, 500, 1_000, 2_500],
        }
    }
}

/// Inclusive stat range used when minting cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBand {
    pub min: u32,
    pub max: u32,
}

/// Stat bands for newly minted Common cards; higher rarities scale them by
/// their rarity multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MintParams {
    pub attack: StatBand,
    pub defense: StatBand,
    pub health: StatBand,
    /// Distinct card designs per archetype.
    pub templates_per_archetype: u32,
}

impl Default for MintParams {
    fn default() -> Self {
        Self {
            attack: StatBand { min: 20, max: 50 },
            defense: StatBand { min: 10, max: 40 },
            health: StatBand { min: 60, max: 120 },
            templates_per_archetype: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_balance_sheet() {
        let config = EngineConfig::default();
        let ranked = config.battle_rules(BattleType::Ranked);
        assert_eq!((ranked.rating_win, ranked.rating_loss), (25, 20));
        assert_eq!(config.battle_rules(BattleType::Quick).winner_tokens, 50);
        assert_eq!(config.rarities.tenths(Rarity::Mythic), 50);
        assert_eq!(config.daily.days.len(), 7);
        assert_eq!(config.referrals.len(), 4);
    }

    #[test]
    fn rarity_roll_walks_weights() {
        let rules = ShopParams::default().packs.basic;
        assert_eq!(rules.roll_rarity(0), Rarity::Common);
        assert_eq!(rules.roll_rarity(699), Rarity::Common);
        assert_eq!(rules.roll_rarity(700), Rarity::Rare);
        assert_eq!(rules.roll_rarity(999), Rarity::Mythic);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let rules = PackRules {
            rarity_weights: [u32::MAX, u32::MAX, 0, 0, 1],
            ..ShopParams::default().packs.basic
        };
        assert_eq!(rules.total_weight(), 2 * u64::from(u32::MAX) + 1);
        assert_eq!(rules.roll_rarity(u32::MAX - 1), Rarity::Common);
        assert_eq!(rules.roll_rarity(u32::MAX), Rarity::Rare);
    }

    #[test]
    fn upgrade_cost_scales_with_level() {
        let params = UpgradeParams::default();
        assert_eq!(params.cost(Rarity::Epic, 3), 1_500);
        assert_eq!(params.cost(Rarity::Common, 0), 100);
    }
}
