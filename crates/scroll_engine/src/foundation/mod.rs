//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Handle-based collections
//! - Tick clock and stopwatch
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
