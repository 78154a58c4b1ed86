//! SeaORM entities for the content schema.

pub mod comment;
pub mod live_comment;
pub mod media;
pub mod post;
