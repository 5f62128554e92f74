// Engine library root
// Number formatting for .docx documents: scanning, grouping, run reconciliation and the
// service that ties them to a file on disk.

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod numbers;
pub mod services;

pub use error::EngineError;
pub use services::FormattingService;
