//! HTTP API: authentication/authorization middleware and the routes that
//! exercise it.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
