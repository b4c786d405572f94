//! Headless driver for the page enhancer.
//!
//! Loads a page, plays a scripted scenario of user and layout events through the enhancer,
//! carries out its effects (timers on a manual clock, fetches on the engine) and records
//! what happened.
pub mod cli;
pub mod logging;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod settings;
