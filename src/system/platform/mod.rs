use super::{CoreTicks, SourceError};

pub trait PlatformTicks {
    fn read_core_ticks() -> Result<Vec<CoreTicks>, SourceError>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use unsupported as platform_impl;

/// Per-core cumulative tick counters for every online core.
pub fn read_core_ticks() -> Result<Vec<CoreTicks>, SourceError> {
    platform_impl::Platform::read_core_ticks()
}
