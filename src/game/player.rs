//! Players and who controls them.

use serde::{Deserialize, Serialize};

/// Index of a player in turn order.
pub type PlayerId = usize;

/// Who drives a player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// A person at the keyboard.
    Human,
    /// An automated decision-maker.
    #[default]
    Ai,
    /// The slot does not take part in the game.
    Off,
}

/// Difficulty tier of automated players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiLevel {
    /// Gentlest tier.
    #[default]
    Nice,
    /// Second tier.
    Rude,
    /// Third tier.
    Mean,
    /// Hardest tier; AI players also earn bonus income.
    Evil,
}

/// Display template for one of the fixed player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerTemplate {
    /// Display name.
    pub name: &'static str,
    /// Light highlight color.
    pub highlight: &'static str,
    /// Dark base color.
    pub color: &'static str,
}

/// The four player slots a game can seat.
pub const PLAYER_TEMPLATES: [PlayerTemplate; 4] = [
    PlayerTemplate {
        name: "Amber",
        highlight: "#fd8",
        color: "#960",
    },
    PlayerTemplate {
        name: "Crimson",
        highlight: "#f88",
        color: "#800",
    },
    PlayerTemplate {
        name: "Lavender",
        highlight: "#d9d",
        color: "#639",
    },
    PlayerTemplate {
        name: "Emerald",
        highlight: "#9d9",
        color: "#060",
    },
];

/// A participant in the game.
///
/// Everything but `id` is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Position in turn order.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Light highlight color, used for floating text.
    pub highlight: String,
    /// Dark base color.
    pub color: String,
    /// Who makes this player's decisions.
    pub controller: Controller,
}

impl Player {
    /// Create a player from a slot template.
    #[must_use]
    pub fn from_template(id: PlayerId, template: &PlayerTemplate, controller: Controller) -> Self {
        Self {
            id,
            name: template.name.to_string(),
            highlight: template.highlight.to_string(),
            color: template.color.to_string(),
            controller,
        }
    }

    /// Create a player with the template of slot `id` (wrapping around).
    #[must_use]
    pub fn new(id: PlayerId, controller: Controller) -> Self {
        Self::from_template(id, &PLAYER_TEMPLATES[id % PLAYER_TEMPLATES.len()], controller)
    }

    /// Whether an automated decision-maker drives this player.
    #[must_use]
    pub fn is_ai(&self) -> bool {
        self.controller == Controller::Ai
    }
}
