//! # RentEase API Library
//!
//! This library provides the core functionality for the RentEase property
//! management service: authentication, the relational data model, role
//! permissions, shared domain helpers, and the HTTP server.

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod permissions;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod two_factor;
pub mod utils;
pub use migration;
