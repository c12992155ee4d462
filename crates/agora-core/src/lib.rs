//! Agora Core — domain models, error types and repository traits for
//! the group membership component.

pub mod error;
pub mod models;
pub mod repository;
