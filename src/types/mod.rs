pub mod idea;
pub mod post;

pub use idea::{CategoryCounts, ContentCategory, IdeaRecord};
pub use post::{Post, PostStatus, PostUpdate};
