//! Shared utilities for the Sanmoku workspace.

pub mod logger;
pub mod time;
