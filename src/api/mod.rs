//! API module
//!
//! Contains HTTP request handlers for the session, message, and upload
//! endpoints

pub mod messages;
pub mod sessions;
pub mod upload;
pub mod utils;
