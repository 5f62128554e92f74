// Engine-side views over the document model.
// The result type handed back to callers lives in `shared::models`.
pub mod paragraph;

pub use paragraph::RunSequence;
