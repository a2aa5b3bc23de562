//! Ignite Certificates Core - Shared types library.
//!
//! This crate provides the domain types used across all Ignite Certificates
//! components:
//! - `issuer` - Certificate issuing HTTP service
//! - `cli` - Command-line tools for migrations and local issuing
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Certificate ids, inbound requests and persisted records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
