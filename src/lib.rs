//! Authentication boundary of the API gateway.
//!
//! Every routed request passes through [`middleware::auth::AuthenticationGate`]:
//! public paths are forwarded unchanged, everything else needs a valid
//! `Authorization: Bearer <jwt>` and is forwarded with trusted `X-User-*` headers.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
