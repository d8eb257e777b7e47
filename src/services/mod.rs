pub mod handlers;
pub mod posts;
pub mod response;
