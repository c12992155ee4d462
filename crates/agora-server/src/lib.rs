//! Agora Server — configuration and service wiring for the binary.

pub mod config;
pub mod services;
