//! Host platform detection.
//!
//! Release artifacts are named after Rust target triples, so the lookup table
//! below must match the release workflow of the Bismuth CLI.

use std::fmt;

use crate::error::{InstallError, Result};

/// `(os, arch, triple)` for every platform a binary is published for.
const SUPPORTED: &[(&str, &str, &str)] = &[
    ("macos", "aarch64", "aarch64-apple-darwin"),
    ("macos", "x86_64", "x86_64-apple-darwin"),
    ("linux", "aarch64", "aarch64-unknown-linux-gnu"),
    ("linux", "x86_64", "x86_64-unknown-linux-gnu"),
];

/// The operating system and CPU architecture pair of a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformKey {
    pub os: String,
    pub arch: String,
}

impl PlatformKey {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self { os: os.into(), arch: arch.into() }
    }

    /// The platform this process is running on.
    pub fn host() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }
}

/// Target triple identifying one published binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTriple(&'static str);

impl BuildTriple {
    pub fn for_key(key: &PlatformKey) -> Result<Self> {
        SUPPORTED
            .iter()
            .find(|(os, arch, _)| *os == key.os && *arch == key.arch)
            .map(|&(_, _, triple)| BuildTriple(triple))
            .ok_or_else(|| InstallError::UnsupportedPlatform {
                os: key.os.clone(),
                arch: key.arch.clone(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for BuildTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Resolve the build triple of the running host.
pub fn resolve_platform() -> Result<BuildTriple> {
    let key = PlatformKey::host();
    tracing::debug!(os = %key.os, arch = %key.arch, "detected host platform");
    BuildTriple::for_key(&key)
}
