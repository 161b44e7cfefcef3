//! # Sync Orchestrator
//! Consumes sync requests one at a time and drives each through
//! authentication and its stage plan.
//!
//! ## Request lifecycle
//! 1. Idle
//! 2. Authenticating
//! 3. AuthFailed (terminal for the request) or StageRunning, once per planned stage
//! 4. Done
//!
//! ## Published events
//! One event per planned stage, or a single event when authentication fails.
pub mod commands;
pub mod orchestrator;
