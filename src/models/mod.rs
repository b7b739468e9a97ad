//! Data models shared between the repository, service and API layers

pub mod booking;
pub mod comment;
pub mod item;
pub mod request;
pub mod user;
