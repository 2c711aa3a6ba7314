//! Data models handled by the sample endpoints

pub mod user;

pub use user::*;
