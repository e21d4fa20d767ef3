//! # Platform API Library
//!
//! This library provides the core functionality for the multi-tenant Platform
//! API service, including tenant resolution and isolation, handlers, models,
//! and server configuration.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
pub mod tenant;
pub use migration;
