pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod posts;
pub mod research;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use generator::IdeaPipeline;
pub use types::idea::IdeaRecord;
