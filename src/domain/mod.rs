pub mod feed;
pub mod post;
pub mod timeline;
