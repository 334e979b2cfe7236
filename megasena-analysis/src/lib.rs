//! Statistics and combination generation over a Mega-Sena draw history.
//!
//! Every function here is pure: it reads the draws it is given and returns
//! fresh values. The only source of nondeterminism is the random generator
//! passed to the [`generator`] strategies.

pub mod config;
pub mod distribution;
pub mod frequency;
pub mod gaps;
pub mod generator;
pub mod metrics;
pub mod summary;

pub use config::{GeneratorConfig, Strategy};
pub use generator::{Combination, Metadata, Method};
pub use summary::{StatisticsSummary, summarize};
