pub mod loader;
pub mod manager;
pub mod report;
pub mod repository;

pub use crate::domain::model::{Team, TeamId};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
