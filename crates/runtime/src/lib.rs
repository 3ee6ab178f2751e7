//! Runtime orchestration for the card arena economy.
//!
//! This crate wires the pure rules of `arena-core` to storage, time and
//! randomness. Consumers build an [`ArenaService`] over an
//! [`EconomyStore`](arena_core::EconomyStore) and call its flows; each flow is
//! one atomic unit of work retried on commit conflicts.
//!
//! Modules are organized by responsibility:
//! - [`service`] runs engine flows with the commit-retry loop
//! - [`store`] provides the in-memory versioned store
//! - [`clock`] and [`random`] supply time and randomness capabilities
//! - [`config`] and [`error`] cover configuration and failures
pub mod clock;
pub mod config;
pub mod error;
pub mod random;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use random::{RandAdapter, SeedPlan, StreamTag};
pub use service::ArenaService;
pub use store::InMemoryEconomyStore;
