//! Host platform identification
//!
//! Normalizes the operating system and CPU names reported by the host into
//! the short names used by toolchain manifests (`mac`, `win`, `x64`,
//! `arm64`). Names outside the renaming table pass through unchanged.

use std::fmt;

/// Normalized operating system name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostOs {
    /// Linux
    Linux,
    /// macOS (reported as `darwin`)
    Mac,
    /// Windows
    Win,
    /// Anything else, lower-cased
    Other(String),
}

impl HostOs {
    /// Normalize a raw OS name
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "linux" => Self::Linux,
            "darwin" | "mac" => Self::Mac,
            "windows" | "win" => Self::Win,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name as used in manifest conditions
    pub fn as_str(&self) -> &str {
        match self {
            Self::Linux => "linux",
            Self::Mac => "mac",
            Self::Win => "win",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized CPU architecture name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostCpu {
    /// x86_64
    X64,
    /// aarch64
    Arm64,
    /// Anything else, lower-cased
    Other(String),
}

impl HostCpu {
    /// Normalize a raw CPU architecture name
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "x86_64" | "x64" => Self::X64,
            "aarch64" | "arm64" => Self::Arm64,
            other => Self::Other(other.to_string()),
        }
    }

    /// Name as used in manifest conditions
    pub fn as_str(&self) -> &str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for HostCpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized (OS, CPU) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformId {
    /// Operating system
    pub os: HostOs,
    /// CPU architecture
    pub cpu: HostCpu,
}

impl PlatformId {
    /// Build from already-normalized parts
    pub fn new(os: HostOs, cpu: HostCpu) -> Self {
        Self { os, cpu }
    }

    /// Normalize raw OS and CPU names. Never fails.
    pub fn normalize(raw_os: &str, raw_cpu: &str) -> Self {
        Self::new(HostOs::normalize(raw_os), HostCpu::normalize(raw_cpu))
    }

    /// Detect the current host platform
    pub fn detect() -> Self {
        let (os, cpu) = raw_host_names();
        Self::normalize(os, cpu)
    }

    /// Detect the host platform, replacing either half with an override
    pub fn detect_with_overrides(os: Option<&str>, cpu: Option<&str>) -> Self {
        let (host_os, host_cpu) = raw_host_names();
        Self::normalize(os.unwrap_or(host_os), cpu.unwrap_or(host_cpu))
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.cpu)
    }
}

/// Raw names for the running host, spelled the way the kernel reports them
fn raw_host_names() -> (&'static str, &'static str) {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };
    (os, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalization_table() {
        let cases = [
            ("darwin", "x86_64", "mac", "x64"),
            ("darwin", "aarch64", "mac", "arm64"),
            ("darwin", "ppc", "mac", "ppc"),
            ("windows", "x86_64", "win", "x64"),
            ("windows", "aarch64", "win", "arm64"),
            ("windows", "i686", "win", "i686"),
            ("linux", "x86_64", "linux", "x64"),
            ("linux", "aarch64", "linux", "arm64"),
            ("linux", "riscv64", "linux", "riscv64"),
        ];

        for (raw_os, raw_cpu, os, cpu) in cases {
            let platform = PlatformId::normalize(raw_os, raw_cpu);
            assert_eq!(platform.os.as_str(), os, "os for {raw_os}");
            assert_eq!(platform.cpu.as_str(), cpu, "cpu for {raw_cpu}");
        }
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        let platform = PlatformId::normalize("Darwin", "X86_64");
        assert_eq!(platform, PlatformId::new(HostOs::Mac, HostCpu::X64));
    }

    #[test]
    fn test_normalized_names_are_stable() {
        assert_eq!(HostOs::normalize("mac"), HostOs::Mac);
        assert_eq!(HostOs::normalize("win"), HostOs::Win);
        assert_eq!(HostCpu::normalize("arm64"), HostCpu::Arm64);
        assert_eq!(HostCpu::normalize("x64"), HostCpu::X64);
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(
            PlatformId::new(HostOs::Linux, HostCpu::Arm64).to_string(),
            "linux-arm64"
        );
        assert_eq!(
            PlatformId::normalize("freebsd", "x86_64").to_string(),
            "freebsd-x64"
        );
    }

    #[test]
    fn test_detect_matches_compile_target() {
        let platform = PlatformId::detect();
        #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
        assert_eq!(platform, PlatformId::new(HostOs::Linux, HostCpu::X64));
        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        assert_eq!(platform, PlatformId::new(HostOs::Mac, HostCpu::Arm64));
        assert!(!platform.to_string().is_empty());
    }

    #[test]
    fn test_detect_with_overrides() {
        let platform = PlatformId::detect_with_overrides(Some("darwin"), Some("x86_64"));
        assert_eq!(platform, PlatformId::new(HostOs::Mac, HostCpu::X64));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Names outside the renaming table come back unchanged
        #[test]
        fn prop_unknown_names_pass_through(
            os in "[a-z][a-z0-9_]{0,11}",
            cpu in "[a-z][a-z0-9_]{0,11}",
        ) {
            let known_os = ["linux", "darwin", "mac", "windows", "win"];
            let known_cpu = ["x86_64", "x64", "aarch64", "arm64"];
            prop_assume!(!known_os.contains(&os.as_str()));
            prop_assume!(!known_cpu.contains(&cpu.as_str()));

            let platform = PlatformId::normalize(&os, &cpu);
            prop_assert_eq!(platform.os.as_str(), os.as_str());
            prop_assert_eq!(platform.cpu.as_str(), cpu.as_str());
        }
    }
}
