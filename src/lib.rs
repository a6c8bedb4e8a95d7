//! rust-toolchain-setup - Provision a local Rust toolchain directory
//!
//! Populates a toolchain directory for a build either by symlinking an
//! installed system toolchain (Linux/arm64) or by downloading a prebuilt
//! `.tar.xz` archive selected from a deps manifest.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Platform, manifest and settings logic, plus the two strategies
//! - [`infra`] - Infrastructure layer (network, filesystem, processes)
//! - [`provision`] - Entry procedure selecting and running a strategy
//! - [`config`] - Constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod provision;
