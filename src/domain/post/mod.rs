pub mod commands;
pub mod entity;
pub mod events;

pub use entity::{LikeState, Post, PostCard, Profile};
