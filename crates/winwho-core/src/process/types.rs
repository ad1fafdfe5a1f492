use serde::{Deserialize, Serialize};
use sysinfo::Pid as SysinfoPid;

/// Platform-safe process ID wrapper.
///
/// Only transiently meaningful: the owning process may exit between focus
/// detection and name lookup, which callers must treat as a normal race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(u32);

impl Pid {
    /// Wrap a raw pid. Zero is never a valid process id.
    pub fn new(pid: u32) -> Option<Self> {
        if pid == 0 { None } else { Some(Self(pid)) }
    }

    /// Wrap a pid parsed from external data (JSON integers are i64).
    ///
    /// Compositors report the absence of a focused window as 0 or -1.
    pub fn from_external(pid: i64) -> Option<Self> {
        u32::try_from(pid).ok().and_then(Self::new)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn to_sysinfo_pid(&self) -> SysinfoPid {
        SysinfoPid::from_u32(self.0)
    }
}

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_new_rejects_zero() {
        assert!(Pid::new(0).is_none());
        assert_eq!(Pid::new(1234).map(|p| p.as_u32()), Some(1234));
    }

    #[test]
    fn test_pid_from_external() {
        assert_eq!(Pid::from_external(42).map(|p| p.as_u32()), Some(42));
        assert!(Pid::from_external(0).is_none());
        assert!(Pid::from_external(-1).is_none());
        assert!(Pid::from_external(i64::from(u32::MAX) + 1).is_none());
    }
}
