//! Booking API.
//!
//! Exposes the scheduling core as HTTP endpoints for the citizen portal.
//! Routes are nested under `/api/` and protected by a middleware stack:
//! Rate Limit → Auth → Handler.
//!
//! The router is composable — `booking_api_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::booking_api_router;
pub use server::{serve, start_api_server, ApiServer};
pub use types::ApiContext;
