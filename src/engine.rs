//! Board engine: owns the board, score and selection, validates swaps and
//! resolves cascades to a stable board.

use log::{debug, trace, warn};

use crate::board::{Board, Position, find_matches};
use crate::error::{ConfigProblem, EngineError, MoveRejection};
use crate::tokens::TokenSource;

pub const DEFAULT_ROWS: usize = 12;
pub const DEFAULT_COLS: usize = 8;
pub const DEFAULT_PALETTE_SIZE: u8 = 6;
/// Colours the front end can tell apart.
pub const MAX_PALETTE_SIZE: u8 = 8;
/// Flat score per cleared cell.
pub const POINTS_PER_CELL: u32 = 10;
/// Resolution passes allowed per cell before the loop is declared broken.
const PASSES_PER_CELL: usize = 10;

/// What happens to points scored while the initial random board settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupScore {
    /// Start every game at zero.
    #[default]
    Discard,
    /// Keep the points from the silent setup cascade.
    Keep,
}

/// What happens to a legal swap that does not form a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapRule {
    /// Tokens stay swapped; the move just scores nothing.
    #[default]
    Keep,
    /// Tokens are swapped back and the move is reported as not accepted.
    RevertUnmatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    pub palette_size: u8,
    pub setup_score: SetupScore,
    pub swap_rule: SwapRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            palette_size: DEFAULT_PALETTE_SIZE,
            setup_score: SetupScore::default(),
            swap_rule: SwapRule::default(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations that can never produce a stable board.
    pub fn validate(&self) -> Result<(), ConfigProblem> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigProblem::EmptyBoard {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.palette_size == 0 {
            return Err(ConfigProblem::EmptyPalette);
        }
        if self.palette_size > MAX_PALETTE_SIZE {
            return Err(ConfigProblem::PaletteTooLarge {
                palette_size: self.palette_size,
                max: MAX_PALETTE_SIZE,
            });
        }
        // With fewer than three colours random refill cannot be relied on to
        // settle once a line is long enough to hold a run.
        let longest_line = self.rows.max(self.cols);
        if longest_line >= crate::board::MIN_RUN && self.palette_size < 3 {
            return Err(ConfigProblem::PaletteTooSmall {
                palette_size: self.palette_size,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Maximum clearing passes in one resolution.
    pub fn resolve_cap(&self) -> u32 {
        u32::try_from(self.rows * self.cols * PASSES_PER_CELL).unwrap_or(u32::MAX)
    }
}

/// Read-only snapshot handed to renderers and score displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub board: Board,
    pub score: u32,
}

/// Summary of one run of the clear–refill–recheck loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Clearing passes; above 1 means the move cascaded.
    pub passes: u32,
    pub cleared: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    /// False only when [`SwapRule::RevertUnmatched`] undid the swap.
    pub accepted: bool,
    pub score_delta: u32,
    pub resolution: Resolution,
    pub state: BoardState,
}

/// The board state machine. One instance per game; no shared state between instances.
#[derive(Debug, Clone)]
pub struct Engine<S> {
    config: EngineConfig,
    board: Board,
    score: u32,
    selection: Option<Position>,
    moves: u32,
    source: S,
}

impl<S: TokenSource> Engine<S> {
    /// Validate `config`, fill a random board from `source` and settle it.
    pub fn new(config: EngineConfig, source: S) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self {
            board: Board::empty(config.rows, config.cols),
            config,
            score: 0,
            selection: None,
            moves: 0,
            source,
        };
        engine.reset()?;
        Ok(engine)
    }

    /// Start from a hand-built board instead of a random one.
    ///
    /// Rows and columns are taken from `board`. The board is used as given,
    /// runs included; call [`Engine::resolve`] to settle it.
    pub fn with_board(config: EngineConfig, board: Board, source: S) -> Result<Self, EngineError> {
        let config = EngineConfig {
            rows: board.rows(),
            cols: board.cols(),
            ..config
        };
        config.validate()?;
        for pos in board.positions() {
            match board.token(pos) {
                None => return Err(ConfigProblem::EmptyCell(pos).into()),
                Some(token) if token >= config.palette_size => {
                    return Err(ConfigProblem::TokenOutOfPalette {
                        token,
                        at: pos,
                        palette_size: config.palette_size,
                    }
                    .into());
                }
                Some(_) => {}
            }
        }
        Ok(Self {
            config,
            board,
            score: 0,
            selection: None,
            moves: 0,
            source,
        })
    }

    /// Full re-initialisation: new random board, score and move count reset.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        let EngineConfig {
            rows,
            cols,
            palette_size,
            ..
        } = self.config;
        self.board = Board::random(rows, cols, palette_size, &mut self.source);
        self.score = 0;
        self.moves = 0;
        self.selection = None;

        let setup = self.resolve()?;
        if self.config.setup_score == SetupScore::Discard {
            self.score = 0;
        }
        debug!(
            "new {}x{} board with {} colours settled in {} passes ({} points, {:?})",
            rows, cols, palette_size, setup.passes, setup.points, self.config.setup_score
        );
        Ok(())
    }

    /// Clear runs, score them, gravity-fill, and repeat until the board is stable.
    pub fn resolve(&mut self) -> Result<Resolution, EngineError> {
        let cap = self.config.resolve_cap();
        let mut resolution = Resolution::default();
        loop {
            let matches = find_matches(&self.board);
            if matches.is_empty() {
                return Ok(resolution);
            }
            if resolution.passes >= cap {
                return Err(EngineError::InternalInvariant {
                    passes: resolution.passes,
                    cap,
                });
            }

            let cleared = u32::try_from(self.board.clear(&matches)).unwrap_or(u32::MAX);
            let points = cleared.saturating_mul(POINTS_PER_CELL);
            self.score = self.score.saturating_add(points);
            self.board.fill_empty(self.config.palette_size, &mut self.source);

            resolution.passes += 1;
            resolution.cleared = resolution.cleared.saturating_add(cleared);
            resolution.points = resolution.points.saturating_add(points);
            trace!("pass {}: cleared {} cells\n{}", resolution.passes, cleared, self.board);
        }
    }

    /// Swap two adjacent tokens and resolve the result.
    ///
    /// Out-of-bounds or non-adjacent requests fail with
    /// [`EngineError::InvalidMove`] and leave board and score untouched.
    /// The selection is cleared either way.
    pub fn request_swap(&mut self, from: Position, to: Position) -> Result<SwapResult, EngineError> {
        self.selection = None;
        self.check_move(from, to)?;

        self.board.swap(from, to);
        if self.config.swap_rule == SwapRule::RevertUnmatched && find_matches(&self.board).is_empty() {
            self.board.swap(from, to);
            debug!("swap {} <-> {} formed no run; reverted", from, to);
            return Ok(SwapResult {
                accepted: false,
                score_delta: 0,
                resolution: Resolution::default(),
                state: self.state(),
            });
        }

        let before = self.score;
        let resolution = self.resolve()?;
        self.moves = self.moves.saturating_add(1);
        debug!(
            "swap {} <-> {}: +{} in {} passes (score {})",
            from, to, resolution.points, resolution.passes, self.score
        );
        Ok(SwapResult {
            accepted: true,
            score_delta: self.score - before,
            resolution,
            state: self.state(),
        })
    }

    fn check_move(&self, from: Position, to: Position) -> Result<(), EngineError> {
        let reason = if !self.board.contains(from) || !self.board.contains(to) {
            MoveRejection::OutOfBounds
        } else if !from.is_adjacent(to) {
            MoveRejection::NotAdjacent
        } else {
            return Ok(());
        };
        warn!("rejected swap {} <-> {}: {}", from, to, reason);
        Err(EngineError::InvalidMove { from, to, reason })
    }
}

impl<S> Engine<S> {
    /// Snapshot for rendering.
    pub fn state(&self) -> BoardState {
        BoardState {
            board: self.board.clone(),
            score: self.score,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Accepted swaps since the last reset.
    #[inline]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Highlight hint for the renderer; no effect on play. Out-of-bounds clears it.
    pub fn set_selection(&mut self, pos: Option<Position>) {
        self.selection = pos.filter(|&p| self.board.contains(p));
    }

    #[inline]
    pub fn selection(&self) -> Option<Position> {
        self.selection
    }
}
