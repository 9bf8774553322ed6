//! Hospital-proposing deferred acceptance for the hospitals/residents
//! problem.

pub mod engine;
pub mod error;
pub mod loader;
pub mod matching;
pub mod preferences;

#[cfg(test)]
mod testing;

pub type HospitalId = usize;
pub type StudentId = usize;

pub use engine::{stable_matching, Engine, ExhaustionPolicy, MatchConfig, Step, UnlistedPolicy};
pub use error::{LoadError, MatchError, PreferenceError};
pub use matching::Matching;
pub use preferences::{Preferences, Rank};
