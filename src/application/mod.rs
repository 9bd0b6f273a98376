//! Shared application services and error types

pub mod errors;
