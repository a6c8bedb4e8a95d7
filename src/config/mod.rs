//! Configuration constants
//!
//! - [`defaults`] - Default values for every setting
//! - [`urls`] - Remote endpoints

pub mod defaults;
pub mod urls;
