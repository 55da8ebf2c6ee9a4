//! Error types for the simulation engine and map generation.

use thiserror::Error;

use crate::game::{PlayerId, RegionId, Upgrade};

/// Reasons an otherwise well-formed move is rejected by the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// The active player has no moves left this turn.
    #[error("no moves remaining this turn")]
    NoMovesRemaining,
    /// The region is not owned by the active player.
    #[error("region {0} is not owned by the active player")]
    NotOwned(RegionId),
    /// The region was conquered this turn and cannot be a move source.
    #[error("region {0} was conquered this turn")]
    ConqueredThisTurn(RegionId),
    /// Source and destination do not share a border.
    #[error("region {from} does not border region {to}")]
    NotAdjacent {
        /// Source region.
        from: RegionId,
        /// Destination region.
        to: RegionId,
    },
    /// Requested soldier count is zero or exceeds what the source holds.
    #[error("cannot move {requested} soldiers, {available} available")]
    BadSoldierCount {
        /// Soldiers requested.
        requested: u32,
        /// Soldiers stationed at the source.
        available: u32,
    },
    /// The temple already carries the highest level of this upgrade.
    #[error("{0} is already at its highest level")]
    MaxLevel(Upgrade),
    /// Rebirth on a temple that carries no upgrade.
    #[error("temple on region {0} has no upgrade to remove")]
    NothingToRemove(RegionId),
    /// The owner cannot pay for the purchase.
    #[error("purchase costs {cost} faith, only {cash} available")]
    InsufficientFaith {
        /// Price of the purchase.
        cost: u32,
        /// Faith held by the buyer.
        cash: u32,
    },
}

/// Errors raised by [`crate::game::apply`].
///
/// Everything here is a programming error in the decision-maker that built
/// the move; none of them are recoverable game situations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The move's variant tag is not one the engine knows.
    #[error("unsupported move kind: {0:?}")]
    UnsupportedMoveKind(String),
    /// The move payload could not be decoded.
    #[error("malformed move: {0}")]
    MalformedMove(String),
    /// A referenced region does not exist on the map.
    #[error("region {0} does not exist")]
    UnknownRegion(RegionId),
    /// A build move targets a region without a temple.
    #[error("region {0} has no temple")]
    NoTemple(RegionId),
    /// The move was created against a different turn, player or move count.
    #[error(
        "stale move: built for turn {move_turn} player {move_player}, \
         state is at turn {turn} player {player}"
    )]
    StaleMove {
        /// Turn recorded in the move.
        move_turn: u32,
        /// Player recorded in the move.
        move_player: PlayerId,
        /// Current turn.
        turn: u32,
        /// Current active player.
        player: PlayerId,
    },
    /// The precomputed fight sequence ran out before the fight ended.
    #[error("precomputed fight sequence has {provided} rolls, fight needs {needed}")]
    ShortFightSequence {
        /// Rolls carried by the move.
        provided: usize,
        /// Rounds the fight lasts.
        needed: usize,
    },
    /// The game already has a result.
    #[error("the game is already over")]
    GameOver,
    /// The move breaks a rule.
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),
}

/// Errors raised while generating a map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapGenError {
    /// Player count outside the supported range.
    #[error("unsupported player count {count} (supported: {min}..={max})")]
    PlayerCount {
        /// Requested player count.
        count: usize,
        /// Smallest supported count.
        min: usize,
        /// Largest supported count.
        max: usize,
    },
    /// The generated adjacency failed validation.
    #[error("generated map is inconsistent: {0}")]
    Graph(#[from] GraphError),
    /// Every generation pass ran out of placement retries.
    #[error("could not generate map: {passes} passes exhausted without placing {needed} regions")]
    Exhausted {
        /// Outer passes attempted.
        passes: u32,
        /// Regions the map needed.
        needed: usize,
    },
}

/// Errors raised while building a map from explicit adjacency data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Region ids must equal their position in the list.
    #[error("region at position {position} has id {id}")]
    MisnumberedRegion {
        /// Position in the list.
        position: usize,
        /// Id carried by the region.
        id: RegionId,
    },
    /// A neighbour reference points past the end of the map.
    #[error("region {region} lists unknown neighbour {neighbor}")]
    UnknownNeighbor {
        /// Region carrying the reference.
        region: RegionId,
        /// The dangling neighbour id.
        neighbor: RegionId,
    },
    /// Adjacency is not symmetric.
    #[error("region {region} lists {neighbor} but not the other way around")]
    Asymmetric {
        /// Region carrying the reference.
        region: RegionId,
        /// Neighbour missing the back-reference.
        neighbor: RegionId,
    },
}

/// Errors raised while turning a [`crate::setup::GameSetup`] into a game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Fewer than two slots are enabled.
    #[error("at least two players must be enabled, got {enabled}")]
    TooFewPlayers {
        /// Enabled slots.
        enabled: usize,
    },
    /// More slots than there are player templates.
    #[error("at most {max} player slots are supported, got {slots}")]
    TooManySlots {
        /// Configured slots.
        slots: usize,
        /// Available templates.
        max: usize,
    },
    /// The map is too small for the requested temples.
    #[error("map has {available} regions, setup needs {needed}")]
    NotEnoughRegions {
        /// Regions required for homes and neutral temples.
        needed: usize,
        /// Regions on the map.
        available: usize,
    },
    /// Map generation failed.
    #[error(transparent)]
    MapGen(#[from] MapGenError),
}

/// Errors raised while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for the expected shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
