//! Core logic module
//!
//! Decisions (platform normalization, condition evaluation, archive
//! selection, settings resolution) and the strategy procedures. Side
//! effects go through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`platform`] - Host OS/CPU normalization
//! - [`condition`] - Manifest condition expressions
//! - [`deps`] - Deps manifest and archive selection
//! - [`settings`] - Layered run settings
//! - [`strategy`] - Strategy selection
//! - [`link_system`] - System toolchain linking
//! - [`prebuilt`] - Prebuilt archive download
//! - [`status`] - Read-only status report
//! - [`clean`] - Toolchain removal

pub mod clean;
pub mod condition;
pub mod deps;
pub mod link_system;
pub mod platform;
pub mod prebuilt;
pub mod settings;
pub mod status;
pub mod strategy;
