pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::HackathonConfig};
pub use crate::core::{
    loader::{infer_attribute, CategoryAttribute, DataLoader, LoadSummary},
    manager::{HackathonManager, Overview, RankedTeam},
    report::ReportGenerator,
    repository::TeamRepository,
};
pub use crate::domain::scoring::{CategoryScoring, ScoringRegistry, ScoringStrategy, ScoringVariant};
pub use crate::utils::error::{HackathonError, Result};
