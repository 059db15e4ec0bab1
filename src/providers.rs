//! Service client implementations.

pub mod video_agent;

// Re-export for convenience
pub use video_agent::VideoAgentClient;
