//! The upgrade catalogue: what temples can be improved with and what it costs.
//!
//! | Upgrade  | Effect                               | Cost by level | Effect by level |
//! |----------|--------------------------------------|---------------|-----------------|
//! | Soldier  | one extra soldier                    | 8 + 4n / turn | -               |
//! | Water    | +X% income                           | 15, 25        | 20, 40          |
//! | Fire     | +X% attack strength, invincibility   | 20, 30        | 25, 50          |
//! | Air      | +X moves per turn                    | 25, 35        | 1, 2            |
//! | Earth    | kills X invaders, +X% defense        | 30, 45        | 1, 2            |
//! | Rebirth  | removes the temple's upgrade         | 0             | -               |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base price of the first soldier bought in a turn.
const SOLDIER_BASE_COST: u32 = 8;

/// Price increase for every further soldier bought in the same turn.
const SOLDIER_COST_STEP: u32 = 4;

/// An upgrade a temple can host, or one of the two pseudo-upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Upgrade {
    /// Buy one soldier at the temple. Price escalates within a turn.
    Soldier,
    /// Resource multiplier: more faith per turn.
    Water,
    /// Offense: stronger attacks and a few absorbed losses per attack.
    Fire,
    /// Extra moves per turn, the first one granted on purchase.
    Air,
    /// Defense: kills invaders before the fight and hardens defenders.
    Earth,
    /// Respec: strip the temple's upgrade for free.
    Rebirth,
}

impl Upgrade {
    /// Every upgrade, in display order.
    pub const ALL: [Upgrade; 6] = [
        Upgrade::Soldier,
        Upgrade::Water,
        Upgrade::Fire,
        Upgrade::Air,
        Upgrade::Earth,
        Upgrade::Rebirth,
    ];

    /// Upgrades that persist on a temple and have levels.
    pub const LEVELED: [Upgrade; 4] = [Upgrade::Water, Upgrade::Fire, Upgrade::Air, Upgrade::Earth];

    /// Cost to reach each level (index 0 is the first purchase).
    ///
    /// Empty for the pseudo-upgrades.
    #[must_use]
    pub const fn costs(self) -> &'static [u32] {
        match self {
            Upgrade::Water => &[15, 25],
            Upgrade::Fire => &[20, 30],
            Upgrade::Air => &[25, 35],
            Upgrade::Earth => &[30, 45],
            Upgrade::Soldier | Upgrade::Rebirth => &[],
        }
    }

    /// Effect magnitude at each level.
    #[must_use]
    pub const fn effects(self) -> &'static [u32] {
        match self {
            Upgrade::Water => &[20, 40],
            Upgrade::Fire => &[25, 50],
            Upgrade::Air | Upgrade::Earth => &[1, 2],
            Upgrade::Soldier | Upgrade::Rebirth => &[],
        }
    }

    /// Cost of the given level, if the level exists.
    #[must_use]
    pub fn cost(self, level: u32) -> Option<u32> {
        self.costs().get(level as usize).copied()
    }

    /// Effect of the given level, or 0 if the level does not exist.
    #[must_use]
    pub fn effect(self, level: u32) -> u32 {
        self.effects().get(level as usize).copied().unwrap_or(0)
    }

    /// Number of levels this upgrade has.
    #[must_use]
    pub fn max_levels(self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let levels = self.costs().len() as u32;
        levels
    }

    /// Whether this upgrade persists on the temple.
    #[must_use]
    pub const fn is_leveled(self) -> bool {
        !matches!(self, Upgrade::Soldier | Upgrade::Rebirth)
    }

    /// Color used for floating text about this upgrade.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Upgrade::Soldier => "#690",
            Upgrade::Water => "#66f",
            Upgrade::Fire => "#f88",
            Upgrade::Air => "#ffa",
            Upgrade::Earth => "#696",
            Upgrade::Rebirth => "#888",
        }
    }

    /// Price of a soldier when `bought` soldiers were already bought this turn.
    #[must_use]
    pub const fn soldier_cost(bought: u32) -> u32 {
        SOLDIER_BASE_COST.saturating_add(bought.saturating_mul(SOLDIER_COST_STEP))
    }
}

impl fmt::Display for Upgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Upgrade::Soldier => "Extra soldier",
            Upgrade::Water => "Water",
            Upgrade::Fire => "Fire",
            Upgrade::Air => "Air",
            Upgrade::Earth => "Earth",
            Upgrade::Rebirth => "Rebirth",
        };
        f.write_str(name)
    }
}
