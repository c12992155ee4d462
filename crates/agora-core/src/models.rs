//! Domain models for Agora.
//!
//! Plain data structs; persistence lives behind the traits in
//! [`crate::repository`].

pub mod group;
pub mod group_membership;
pub mod notification;
pub mod user;
