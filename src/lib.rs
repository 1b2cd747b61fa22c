//! taskdeck library
//!
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod query;
pub mod sort;
pub mod storage;
pub mod store;
pub mod types;
