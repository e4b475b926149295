//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Rate limiter — reject early, save resources
//! 2. Auth validator — session token to user

pub mod auth;
pub mod rate;
