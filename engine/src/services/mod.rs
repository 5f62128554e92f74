// Services exposed by the engine to its front ends
pub mod formatting_service;

pub use formatting_service::FormattingService;
