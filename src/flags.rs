// This module encapsulates the bitflags API
// so that we don't leak details that may
// affect semver later on.

use bitflags::bitflags;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    struct GenerationBitFlags: u32 {
        const EMPTY = 0;
        const FAIL_ON_EXTINCTION = 1 << 1;
    }
}

/// Options changing how a generation run ends.
///
/// The default treats population extinction as a normal,
/// reportable end of the run.
#[repr(transparent)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct GenerationOptions(GenerationBitFlags);

impl GenerationOptions {
    pub fn with_fail_on_extinction(self) -> Self {
        Self(self.0 | GenerationBitFlags::FAIL_ON_EXTINCTION)
    }

    pub fn fail_on_extinction(&self) -> bool {
        self.0.contains(GenerationBitFlags::FAIL_ON_EXTINCTION)
    }
}
