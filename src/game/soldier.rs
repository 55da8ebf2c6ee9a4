//! Soldiers and their identities.

use serde::Serialize;

/// Identity of a soldier, unique within one game lineage.
pub type SoldierId = u64;

/// A single soldier standing in a region's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Soldier {
    /// Monotonically increasing identity.
    pub id: SoldierId,
}

/// Hands out soldier identities for one game.
///
/// The allocator lives inside the game state, so every branch of a
/// lineage continues the same sequence and two games never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SoldierIds {
    next: SoldierId,
}

impl SoldierIds {
    /// Start a fresh sequence at 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocate the next soldier.
    pub fn spawn(&mut self) -> Soldier {
        let soldier = Soldier { id: self.next };
        self.next += 1;
        soldier
    }

    /// The identity the next soldier will get.
    #[must_use]
    pub const fn peek(&self) -> SoldierId {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = SoldierIds::new();
        let a = ids.spawn();
        let b = ids.spawn();
        assert_eq!(a.id, 0);
        assert_eq!(b.id, 1);
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn test_copies_continue_independently() {
        let mut ids = SoldierIds::new();
        ids.spawn();
        let mut branch = ids;
        assert_eq!(branch.spawn().id, 1);
        assert_eq!(ids.spawn().id, 1);
    }
}
