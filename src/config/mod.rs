//! Root directory layout and persisted settings.
pub mod root;
pub mod settings;
pub mod toml_loader;

pub use root::RootDir;
pub use settings::Settings;
