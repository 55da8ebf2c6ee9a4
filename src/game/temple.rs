//! Temples: fixed structures that host upgrades and spawn soldiers.

use serde::Serialize;

use crate::game::{RegionId, Upgrade};

/// A temple standing on a region.
///
/// Temples are placed once at setup; afterwards only the upgrade and its
/// level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Temple {
    /// Region the temple stands on.
    pub region: RegionId,
    /// Current upgrade, if any.
    pub upgrade: Option<Upgrade>,
    /// Level of the current upgrade (0 is the first level).
    pub level: u32,
}

impl Temple {
    /// A bare temple without upgrades.
    #[must_use]
    pub const fn new(region: RegionId) -> Self {
        Self {
            region,
            upgrade: None,
            level: 0,
        }
    }

    /// Effect magnitude this temple provides for `kind`, or 0.
    #[must_use]
    pub fn effect(&self, kind: Upgrade) -> u32 {
        match self.upgrade {
            Some(upgrade) if upgrade == kind => upgrade.effect(self.level),
            _ => 0,
        }
    }

    /// Level of `kind` counted from 1, or 0 if the temple carries something else.
    #[must_use]
    pub fn raw_level(&self, kind: Upgrade) -> u32 {
        match self.upgrade {
            Some(upgrade) if upgrade == kind => self.level + 1,
            _ => 0,
        }
    }

    /// Remove the upgrade, as on conquest or rebirth.
    pub fn clear(&mut self) {
        self.upgrade = None;
        self.level = 0;
    }
}
