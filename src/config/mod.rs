pub mod models;

pub use models::{load_config, LogRotation, ProvisionConfig};
