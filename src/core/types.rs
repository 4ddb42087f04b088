/*!
 * Core Types
 * Common scalar types used across the kernel
 */

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;

/// Discrete execution turn granted by the host
pub type Cycle = u64;

/// Compute units as reported by the host meter
pub type Compute = f64;

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;

/// Caller-supplied process identifier
///
/// Short ids (≤23 bytes) are stored inline without heap allocation, which
/// covers nearly every id a domain subsystem registers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(SmartString);

impl ProcessId {
    #[inline]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmartString::from(id.as_ref()))
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ProcessId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmartString::from(s))
    }
}

impl From<String> for ProcessId {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmartString::from(s))
    }
}

impl From<&String> for ProcessId {
    #[inline]
    fn from(s: &String) -> Self {
        Self(SmartString::from(s.as_str()))
    }
}

impl AsRef<str> for ProcessId {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::borrow::Borrow<str> for ProcessId {
    #[inline(always)]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
