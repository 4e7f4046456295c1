pub mod assessment;
pub mod compliance;
pub mod config;
pub mod error;
pub mod health;
pub mod knowledge_area;
pub mod lookup;
pub mod metrics;
pub mod process_group;
pub mod project;

pub use error::{PmpError, Result};
pub use project::ProjectState;
