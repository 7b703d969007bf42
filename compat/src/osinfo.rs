//! Host operating system identification.

use core::fmt;

/// An operation the board has no way of carrying out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported;

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported operation")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Unsupported {}

/// Version of the host operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsVersion {
    /// Kernel name.
    pub sysname: alloc::string::String,
    /// Kernel release.
    pub release: alloc::string::String,
}

/// Failure to identify the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionError(pub Unsupported);

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to determine OS version: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for VersionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Returns the version of the host operating system. There is none.
pub fn version() -> Result<OsVersion, VersionError> {
    Err(VersionError(Unsupported))
}
