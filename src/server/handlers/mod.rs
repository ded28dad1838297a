//! HTTP handlers for the server.

pub mod feedback;
pub mod frames;
