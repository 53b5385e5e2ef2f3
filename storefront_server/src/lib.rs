//! # Storefront payment gateway server
//! This crate hosts the HTTP layer of the storefront. It is responsible for:
//! * the catalog, cart and order REST endpoints,
//! * sending customers to the payment gateway with a signed redirect URL, and
//! * receiving and verifying the gateway's return callback.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Authentication
//! Session handling is deliberately absent: the server sits behind a reverse proxy that authenticates requests
//! and rewrites the `{user_id}` path segment, so user ids arrive here as opaque, already-verified strings.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
