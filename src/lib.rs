//! Choral Marketplace - composition catalog, purchases and personalized
//! recommendations.
//!
//! The crate is laid out hexagonally: `domain` holds pure types and the
//! ranking pipeline, `ports` the storage traits, `application` the
//! command/query handlers, and `adapters` the HTTP, in-memory and PostgreSQL
//! implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
