//! service-core: shared HTTP infrastructure for the tour services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
