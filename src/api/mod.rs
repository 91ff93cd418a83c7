//! HTTP API module - routes, handlers and wire models

pub mod handlers;
pub mod models;
pub mod routes;
