use std::fmt;

use crate::board::{Position, Token};

/// Errors returned by the board engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigProblem),

    #[error("invalid move {from} -> {to}: {reason}")]
    InvalidMove {
        from: Position,
        to: Position,
        reason: MoveRejection,
    },

    #[error("board did not settle after {passes} resolution passes (cap {cap})")]
    InternalInvariant { passes: u32, cap: u32 },
}

impl EngineError {
    /// Only rejected moves are recoverable; everything else ends the game.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidMove { .. })
    }
}

/// Why a configuration (or a hand-built board) cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigProblem {
    #[error("board must have at least one row and one column (got {rows}x{cols})")]
    EmptyBoard { rows: usize, cols: usize },

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("{palette_size} colors cannot keep a {rows}x{cols} board free of runs")]
    PaletteTooSmall {
        palette_size: u8,
        rows: usize,
        cols: usize,
    },

    #[error("palette of {palette_size} colors exceeds the maximum of {max}")]
    PaletteTooLarge { palette_size: u8, max: u8 },

    #[error("token {token} at {at} is outside the {palette_size}-color palette")]
    TokenOutOfPalette {
        token: Token,
        at: Position,
        palette_size: u8,
    },

    #[error("board has an empty cell at {0}")]
    EmptyCell(Position),
}

/// Reason a swap request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfBounds,
    NotAdjacent,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("position outside the board"),
            Self::NotAdjacent => f.write_str("cells are not adjacent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_display() {
        let err = EngineError::InvalidMove {
            from: Position::new(0, 0),
            to: Position::new(2, 2),
            reason: MoveRejection::NotAdjacent,
        };
        assert_eq!(
            err.to_string(),
            "invalid move (0, 0) -> (2, 2): cells are not adjacent"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = EngineError::from(ConfigProblem::PaletteTooSmall {
            palette_size: 1,
            rows: 12,
            cols: 8,
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration: 1 colors cannot keep a 12x8 board free of runs"
        );
    }

    #[test]
    fn test_fatality() {
        let invalid = EngineError::InvalidMove {
            from: Position::new(0, 0),
            to: Position::new(0, 9),
            reason: MoveRejection::OutOfBounds,
        };
        assert!(!invalid.is_fatal());
        assert!(EngineError::InternalInvariant { passes: 960, cap: 960 }.is_fatal());
        assert!(EngineError::Configuration(ConfigProblem::EmptyPalette).is_fatal());
    }
}
