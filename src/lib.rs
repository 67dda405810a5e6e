//! # matchtui
//!
//! Board engine for a match-3 tile-swapping puzzle, plus the terminal game
//! built on top of it (the `matchtui` binary).
//!
//! ## Modules
//!
//! - [`board`]: grid, cells, positions, match detection and gravity-fill
//! - [`engine`]: the board state machine: init, swap validation, cascades, scoring
//! - [`tokens`]: injectable token sources (random or scripted)
//! - [`error`]: structured error types
//!
//! ```
//! use matchtui::engine::{Engine, EngineConfig};
//! use matchtui::board::Position;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut engine = Engine::new(EngineConfig::default(), StdRng::seed_from_u64(7)).unwrap();
//! assert!(engine.board().is_stable());
//! let result = engine.request_swap(Position::new(0, 0), Position::new(0, 1)).unwrap();
//! assert!(result.state.board.is_stable());
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod tokens;

pub use board::{Board, Cell, Position, Token, find_matches};
pub use engine::{BoardState, Engine, EngineConfig, Resolution, SetupScore, SwapResult, SwapRule};
pub use error::{ConfigProblem, EngineError, MoveRejection};
pub use tokens::{TokenScript, TokenSource};
