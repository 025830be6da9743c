//! Headless host for Star Catch: replays a TOML scenario of input, contact,
//! resize, and clock events against [`starcatch_core::headless::HeadlessEngine`].

pub mod error;
pub mod runner;
pub mod scenario;

pub use error::ScenarioError;
pub use runner::{Outcome, Runner};
pub use scenario::{Expectation, Scenario, Step, Variant};
