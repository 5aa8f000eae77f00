//! Workspace configuration.
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE;
pub use manager::ConfigManager;
pub use types::{
    BatchConfig,
    ConfigError,
    EditorSettings,
    ScanConfig,
    ValidationError,
};
