//! Ignite certificate issuer library.
//!
//! Registers certificate holders, renders their certificate to PDF and
//! publishes it to object storage. The binary in `main.rs` serves this over
//! HTTP; the CLI drives the same pipeline from the command line.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod testing;
