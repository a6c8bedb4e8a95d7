//! Download URLs

/// Google Cloud Storage public endpoint serving prebuilt toolchains
pub const STORAGE_BASE: &str = "https://storage.googleapis.com";
