//! Economy-relevant account state.

use crate::ids::{AccountId, Timestamp, Version, next_day_start};
use crate::reward::{DailyLogin, PlayerContext};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Currency {
    Gold,
    Gems,
    Tokens,
}

/// Non-currency battle entry resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Energy,
    Tickets,
}

/// Currency balances. Unsigned, so a negative balance cannot be represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Balances {
    pub gold: u64,
    pub gems: u64,
    pub tokens: u64,
}

impl Balances {
    pub const fn new(gold: u64, gems: u64, tokens: u64) -> Self {
        Self { gold, gems, tokens }
    }

    pub const fn get(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Gold => self.gold,
            Currency::Gems => self.gems,
            Currency::Tokens => self.tokens,
        }
    }

    pub fn get_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::Gold => &mut self.gold,
            Currency::Gems => &mut self.gems,
            Currency::Tokens => &mut self.tokens,
        }
    }
}

/// Active VIP membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VipStatus {
    /// Discount on shop prices, percent.
    pub shop_discount: u32,
    /// Boost on battle rewards, percent.
    pub reward_boost: u32,
    pub expires_at: Timestamp,
}

impl VipStatus {
    pub const fn is_active(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// Shop purchases made since `reset_at - 1 day`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyPurchases {
    pub count: u32,
    /// First second at which `count` starts over.
    pub reset_at: Timestamp,
}

impl DailyPurchases {
    /// Counter as seen at `now`, rolled over if the reset time has passed.
    pub fn current(&self, now: Timestamp) -> Self {
        if now >= self.reset_at {
            Self {
                count: 0,
                reset_at: next_day_start(now),
            }
        } else {
            *self
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Account {
    pub id: AccountId,
    pub balances: Balances,
    pub rating: u32,
    pub level: u32,
    pub win_streak: u32,
    pub energy: u32,
    pub tickets: u32,
    pub vip: Option<VipStatus>,
    /// Reward boost from the account's clan, percent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub clan_boost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub daily_purchases: DailyPurchases,
    #[cfg_attr(feature = "serde", serde(default))]
    pub daily_login: DailyLogin,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Version,
}

impl Account {
    /// A fresh account: empty balances, level 1, starting rating.
    pub fn new(id: AccountId, starting_rating: u32) -> Self {
        Self {
            id,
            balances: Balances::default(),
            rating: starting_rating,
            level: 1,
            win_streak: 0,
            energy: 0,
            tickets: 0,
            vip: None,
            clan_boost: 0,
            daily_purchases: DailyPurchases::default(),
            daily_login: DailyLogin::default(),
            version: Version::NEW,
        }
    }

    #[must_use]
    pub fn with_balances(mut self, balances: Balances) -> Self {
        self.balances = balances;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: u32, tickets: u32) -> Self {
        self.energy = energy;
        self.tickets = tickets;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_vip(mut self, vip: VipStatus) -> Self {
        self.vip = Some(vip);
        self
    }

    pub fn balance(&self, currency: Currency) -> u64 {
        self.balances.get(currency)
    }

    pub fn active_vip(&self, now: Timestamp) -> Option<&VipStatus> {
        self.vip.as_ref().filter(|vip| vip.is_active(now))
    }

    /// VIP plus clan reward boost, percent.
    pub fn reward_boost(&self, now: Timestamp) -> u32 {
        self.active_vip(now)
            .map_or(0, |vip| vip.reward_boost)
            .saturating_add(self.clan_boost)
    }

    /// Reward and rating inputs for a battle fought at `now`.
    pub fn player_context(&self, now: Timestamp) -> PlayerContext {
        PlayerContext {
            account: self.id,
            level: self.level,
            rating: self.rating,
            win_streak: self.win_streak,
            reward_boost: self.reward_boost(now),
        }
    }

    pub fn resource(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Energy => self.energy,
            Resource::Tickets => self.tickets,
        }
    }

    pub(crate) fn resource_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Energy => &mut self.energy,
            Resource::Tickets => &mut self.tickets,
        }
    }
}
