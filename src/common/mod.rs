//! Shared infrastructure for the provider client and pipeline
//!
//! - Cancellation token checked between simulation batches
//! - Token-bucket rate limiter for provider requests
//! - Circuit breaker for provider fault tolerance

pub mod cancel;
pub mod circuit_breaker;
pub mod rate_limiter;

pub use cancel::CancelToken;
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use rate_limiter::RateLimiter;
