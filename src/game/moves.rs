//! Moves a decision-maker can submit to the engine.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::game::{GameState, PlayerId, RegionId, Upgrade, validate};

/// Where in the game a move was created.
///
/// The engine rejects a move whose stamp does not match the state it is
/// applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveStamp {
    /// Turn number.
    pub turn_index: u32,
    /// Acting player.
    pub player: PlayerId,
    /// Moves the player had left.
    pub moves_remaining: u32,
}

/// Move soldiers into a neighbouring region, attacking if it is not ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmyMove {
    /// Creation context.
    pub stamp: MoveStamp,
    /// Region the soldiers leave.
    pub source: RegionId,
    /// Region the soldiers enter.
    pub destination: RegionId,
    /// Number of soldiers sent.
    pub count: u32,
    /// Fight rolls to use instead of fresh random draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolls: Option<Vec<f64>>,
}

/// Buy an upgrade (or a soldier, or a respec) at a temple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMove {
    /// Creation context.
    pub stamp: MoveStamp,
    /// Region of the temple.
    pub region: RegionId,
    /// What to buy.
    pub upgrade: Upgrade,
}

/// Finish the active player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndMove {
    /// Creation context.
    pub stamp: MoveStamp,
}

/// A request to change the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Move {
    /// Army movement or attack.
    Army(ArmyMove),
    /// Temple purchase.
    Build(BuildMove),
    /// End of turn.
    End(EndMove),
}

impl Move {
    /// Wire tags of the known variants.
    pub const KINDS: [&'static str; 3] = ["army", "build", "end"];

    /// The creation context of this move.
    #[must_use]
    pub const fn stamp(&self) -> &MoveStamp {
        match self {
            Move::Army(m) => &m.stamp,
            Move::Build(m) => &m.stamp,
            Move::End(m) => &m.stamp,
        }
    }

    /// Decode a move from its JSON wire shape.
    ///
    /// ```
    /// use shrinewar::game::Move;
    ///
    /// let json = r#"{"kind":"end","stamp":{"turn_index":1,"player":0,"moves_remaining":3}}"#;
    /// assert!(matches!(Move::from_json(json), Ok(Move::End(_))));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedMoveKind`] for an unknown `kind` tag
    /// and [`EngineError::MalformedMove`] for anything else that does not
    /// decode.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| EngineError::MalformedMove(e.to_string()))?;
        let kind = value
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| EngineError::MalformedMove("missing \"kind\" tag".to_string()))?;
        if !Self::KINDS.contains(&kind) {
            return Err(EngineError::UnsupportedMoveKind(kind.to_string()));
        }
        serde_json::from_value(value).map_err(|e| EngineError::MalformedMove(e.to_string()))
    }
}

impl GameState {
    /// Stamp for a move created against this state.
    #[must_use]
    pub const fn stamp(&self) -> MoveStamp {
        MoveStamp {
            turn_index: self.turn.turn_index,
            player: self.turn.player,
            moves_remaining: self.turn.moves_remaining,
        }
    }

    /// Build an army move for the active player.
    #[must_use]
    pub fn army_move(&self, source: RegionId, destination: RegionId, count: u32) -> Move {
        Move::Army(ArmyMove {
            stamp: self.stamp(),
            source,
            destination,
            count,
            rolls: None,
        })
    }

    /// Build a temple purchase for the active player.
    #[must_use]
    pub fn build_move(&self, region: RegionId, upgrade: Upgrade) -> Move {
        Move::Build(BuildMove {
            stamp: self.stamp(),
            region,
            upgrade,
        })
    }

    /// Build an end-of-turn move for the active player.
    #[must_use]
    pub fn end_move(&self) -> Move {
        Move::End(EndMove {
            stamp: self.stamp(),
        })
    }

    /// Every move [`crate::game::apply`] would accept right now.
    ///
    /// Army moves are listed for every soldier count. Empty once the game
    /// is over.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        let player = self.active_player();
        let mut moves = Vec::new();

        for region in self.map.regions() {
            if !self.region_has_active_army(player, region.id) {
                continue;
            }
            let available = self.soldier_count(region.id);
            for &neighbor in &region.neighbors {
                for count in 1..=available {
                    moves.push(self.army_move(region.id, neighbor, count));
                }
            }
        }

        let temple_regions: Vec<RegionId> = self.temples_of(player).map(|t| t.region).collect();
        for region in temple_regions {
            for upgrade in Upgrade::ALL {
                let candidate = self.build_move(region, upgrade);
                if validate(self, &candidate).is_ok() {
                    moves.push(candidate);
                }
            }
        }

        moves.push(self.end_move());
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StateBuilder;

    #[test]
    fn test_json_round_trip_army() {
        let state = StateBuilder::line(3).owner(0, 0).soldiers(0, 2).build();
        let mv = state.army_move(0, 1, 2);
        let json = serde_json::to_string(&mv).unwrap();
        assert!(json.contains("\"kind\":\"army\""));
        assert_eq!(Move::from_json(&json).unwrap(), mv);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind":"teleport","stamp":{"turn_index":1,"player":0,"moves_remaining":3}}"#;
        assert_eq!(
            Move::from_json(json),
            Err(EngineError::UnsupportedMoveKind("teleport".to_string()))
        );
    }

    #[test]
    fn test_missing_fields_malformed() {
        assert!(matches!(
            Move::from_json(r#"{"kind":"army"}"#),
            Err(EngineError::MalformedMove(_))
        ));
        assert!(matches!(
            Move::from_json("not json"),
            Err(EngineError::MalformedMove(_))
        ));
    }

    #[test]
    fn test_legal_moves_lists_counts_and_end() {
        let state = StateBuilder::line(3).owner(1, 0).soldiers(1, 2).build();
        let moves = state.legal_moves();
        // two neighbours x two counts + end
        assert_eq!(moves.len(), 5);
        assert!(matches!(moves.last(), Some(Move::End(_))));
    }

    #[test]
    fn test_legal_moves_include_affordable_builds() {
        let state = StateBuilder::line(2)
            .owner(0, 0)
            .temple(0)
            .soldiers(0, 1)
            .cash(0, 16)
            .build();
        let builds: Vec<Upgrade> = state
            .legal_moves()
            .into_iter()
            .filter_map(|m| match m {
                Move::Build(b) => Some(b.upgrade),
                _ => None,
            })
            .collect();
        assert_eq!(builds, vec![Upgrade::Soldier, Upgrade::Water]);
    }

    #[test]
    fn test_no_moves_when_over() {
        let mut state = StateBuilder::line(2).owner(0, 0).build();
        state.end_result = Some(crate::game::EndResult::Draw);
        assert!(state.legal_moves().is_empty());
    }
}
