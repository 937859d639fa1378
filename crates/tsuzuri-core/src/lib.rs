//! Data model and collaborator contracts for the tsuzuri composition engine.
//!
//! This crate holds everything below the input state machine: input pieces,
//! the composing buffer, candidate types, the traits that abstract the
//! kana-kanji conversion backend and the host editing surface, plus small
//! leaf utilities (diacritic composition, script/width transforms).

pub mod candidate;
pub mod composing;
pub mod config;
pub mod diacritic;
pub mod host;
pub mod piece;
pub mod provider;
pub mod transform;
pub mod unicode;
