//! Core types and utilities for parley
//!
//! This crate provides the configuration, error, logging, and session
//! management foundations used by the other parley components.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
