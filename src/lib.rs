//! recurd - a recurring-obligation worker
//!
//! Polls the obligation store for due items on a fixed interval and
//! materializes one transaction per due obligation, advancing each
//! obligation's schedule atomically. Runs until SIGINT/SIGTERM, exiting
//! cleanly between passes.

pub mod config;
pub mod domain;
pub mod error;
pub mod store;
pub mod worker;

pub use error::{RecurdError, Result};
