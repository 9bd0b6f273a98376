//! API client implementations

pub mod crpt;

pub use crpt::CrptClient;
