use super::PlatformTicks;
use crate::system::{CoreTicks, SourceError};

pub struct Platform;

impl PlatformTicks for Platform {
    fn read_core_ticks() -> Result<Vec<CoreTicks>, SourceError> {
        // Non-Linux builds wire up the mock source instead; this path only
        // runs if a host source is constructed anyway.
        Err(SourceError::new(
            "cpu_ticks",
            "per-core tick counters are not available on this platform",
        ))
    }
}
