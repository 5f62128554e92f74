// Engine configuration
pub mod settings;
