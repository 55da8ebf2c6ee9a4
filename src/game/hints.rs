//! Presentation hints: what a renderer may want to show about a move.
//!
//! Hints are returned next to the new state and never stored in it. States
//! flagged for simulation produce none.

use serde::Serialize;

use crate::game::{PlayerId, RegionId, SoldierId};

/// Sound cues, drawn from a small fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// Generic interface click.
    Click,
    /// One of the attacker's soldiers died.
    OursDead,
    /// One of the defender's soldiers died.
    EnemyDead,
    /// A defended region was conquered.
    Victory,
    /// The attack was repelled.
    Defeat,
    /// An undefended region was taken.
    TakeOver,
    /// A player was eliminated.
    Elimination,
}

/// What a floating text is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    /// The center of a region.
    Region(RegionId),
    /// A particular soldier.
    Soldier(SoldierId),
}

/// A short text floating over the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloatingText {
    /// Where the text appears.
    pub anchor: TextAnchor,
    /// Display text.
    pub text: String,
    /// CSS-style color.
    pub color: String,
    /// Width in map units.
    pub width: u32,
}

impl FloatingText {
    /// Create a floating text.
    #[must_use]
    pub fn new(anchor: TextAnchor, text: impl Into<String>, color: impl Into<String>, width: u32) -> Self {
        Self {
            anchor,
            text: text.into(),
            color: color.into(),
            width,
        }
    }
}

/// One presentation hint, in the order things happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Hint {
    /// Play a sound.
    Sound {
        /// Which sound.
        cue: SoundCue,
    },
    /// Show a floating text.
    Text(FloatingText),
    /// Soldiers are charging at a region; draw them half way.
    Charge {
        /// Attacking soldiers, front of the queue first.
        soldiers: Vec<SoldierId>,
        /// Region under attack.
        target: RegionId,
    },
    /// Charging soldiers return to their queues.
    ChargeOver,
    /// Launch upgrade particles at a temple.
    Particles {
        /// Temple region.
        region: RegionId,
    },
    /// A player lost its last soldier and left the game.
    Eliminated {
        /// The eliminated player.
        player: PlayerId,
    },
    /// A new turn started.
    TurnStarted {
        /// The newly active player.
        player: PlayerId,
        /// Turn number.
        turn_index: u32,
    },
}

/// Collects hints while a move is applied.
///
/// A disabled sink drops everything, which is how simulation suppresses
/// presentation output.
#[derive(Debug, Clone, Default)]
pub struct HintSink {
    enabled: bool,
    hints: Vec<Hint>,
}

impl HintSink {
    /// A sink that records hints when `enabled`.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            hints: Vec::new(),
        }
    }

    /// Whether hints are being recorded.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a hint.
    pub fn push(&mut self, hint: Hint) {
        if self.enabled {
            self.hints.push(hint);
        }
    }

    /// Record a sound cue.
    pub fn sound(&mut self, cue: SoundCue) {
        self.push(Hint::Sound { cue });
    }

    /// Record a floating text.
    pub fn text(&mut self, text: FloatingText) {
        self.push(Hint::Text(text));
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn into_hints(self) -> Vec<Hint> {
        self.hints
    }
}
