//! Combat resolution.
//!
//! Pure functions: given two cards, the balance tables and a random source,
//! produce the damage of a single hit. The battle loop in
//! [`crate::battle`] is the only caller that mutates health.

pub mod damage;

pub use damage::{DamageRoll, apply_damage, base_damage, resolve_damage};
