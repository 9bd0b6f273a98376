//! External integrations: rate limiting and API clients

pub mod api_clients;
pub mod rate_limiter;
