//! # ZYCLE API Library
//!
//! Multi-tenant management backend for recycling companies: inventory,
//! invoicing, collections, staff loans and the ZIA assistant.

pub mod assistant;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod pqs;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
