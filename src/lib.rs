//! Progress scoring engine for multi-section personal planning vaults.
//!
//! Tracks how completely a user has filled in each section of their vault
//! (legal, financial, medical, wedding logistics, and more), converts that
//! into per-section scores and a single weighted readiness score, and keeps
//! the scores synchronized across both storage generations on every save.

pub mod config;
pub mod progress;
pub mod telemetry;
