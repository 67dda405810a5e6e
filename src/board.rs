//! Board grid: cells, positions, match detection and gravity-fill.

use std::collections::HashSet;
use std::fmt;

use crate::tokens::TokenSource;

/// Colour index into the palette.
pub type Token = u8;

/// Shortest run that clears.
pub const MIN_RUN: usize = 3;

/// Single cell: a token, or a hole left by a clear (only seen mid-resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Token(Token),
}

impl Cell {
    #[inline]
    pub fn token(self) -> Option<Token> {
        match self {
            Self::Token(t) => Some(t),
            Self::Empty => None,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

/// Grid coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if the two positions share an edge.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Fixed-size grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Board with every cell empty.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Board with every cell drawn from `source`, row by row, top to bottom.
    /// May contain runs; the engine resolves them before the board is shown.
    pub fn random<S: TokenSource + ?Sized>(
        rows: usize,
        cols: usize,
        palette_size: u8,
        source: &mut S,
    ) -> Self {
        let mut board = Self::empty(rows, cols);
        if palette_size == 0 {
            return board;
        }
        for cell in &mut board.cells {
            *cell = Cell::Token(source.next_token(palette_size));
        }
        board
    }

    /// Build a board from rows of tokens. Returns `None` for an empty or ragged grid.
    pub fn from_rows<R: AsRef<[Token]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first()?.as_ref().len();
        if cols == 0 || rows.iter().any(|r| r.as_ref().len() != cols) {
            return None;
        }
        let cells = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().map(|&t| Cell::Token(t)))
            .collect();
        Some(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Token at `pos`, or `None` if out of bounds or empty.
    #[inline]
    pub fn token(&self, pos: Position) -> Option<Token> {
        self.get(pos).and_then(Cell::token)
    }

    /// Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            let i = self.index(pos);
            self.cells[i] = cell;
        }
    }

    /// Exchange two cells. No-op if either is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) {
        if self.contains(a) && self.contains(b) {
            let (ia, ib) = (self.index(a), self.index(b));
            self.cells.swap(ia, ib);
        }
    }

    /// One row of cells, left to right.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = (row * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        &self.cells[start..end]
    }

    /// All positions, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }

    /// Token ids row by row; `None` while any cell is empty.
    pub fn token_grid(&self) -> Option<Vec<Vec<Token>>> {
        (0..self.rows)
            .map(|r| self.row(r).iter().map(|c| c.token()).collect())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|c| c.is_empty())
    }

    /// Full and free of runs.
    pub fn is_stable(&self) -> bool {
        self.is_full() && find_matches(self).is_empty()
    }

    /// Empty the given cells. Returns how many were tokens before.
    pub fn clear(&mut self, positions: &HashSet<Position>) -> usize {
        let mut cleared = 0;
        for &pos in positions {
            if self.token(pos).is_some() {
                self.set(pos, Cell::Empty);
                cleared += 1;
            }
        }
        cleared
    }

    /// Drop the tokens of one column to the bottom, keeping their order.
    /// Returns the number of empty slots left at the top.
    pub fn collapse_column(&mut self, col: usize) -> usize {
        if col >= self.cols {
            return 0;
        }
        let mut write = self.rows;
        for row in (0..self.rows).rev() {
            let from = Position::new(row, col);
            if let Some(token) = self.token(from) {
                write -= 1;
                if write != row {
                    self.set(Position::new(write, col), Cell::Token(token));
                    self.set(from, Cell::Empty);
                }
            }
        }
        write
    }

    /// Gravity-fill: collapse every column, then refill the vacated top slots
    /// from `source`, top row first. Returns the number of tokens generated.
    ///
    /// A zero `palette_size` collapses without refilling.
    pub fn fill_empty<S: TokenSource + ?Sized>(&mut self, palette_size: u8, source: &mut S) -> usize {
        let mut generated = 0;
        for col in 0..self.cols {
            let vacated = self.collapse_column(col);
            if palette_size == 0 {
                continue;
            }
            for row in 0..vacated {
                self.set(Position::new(row, col), Cell::Token(source.next_token(palette_size)));
            }
            generated += vacated;
        }
        generated
    }
}

impl fmt::Display for Board {
    /// One line per row; tokens as digits/letters, empty cells as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for cell in self.row(row) {
                let ch = match cell {
                    Cell::Empty => '.',
                    Cell::Token(t) => char::from_digit(u32::from(*t), 36).unwrap_or('?'),
                };
                write!(f, "{ch}")?;
            }
            if row + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Every position that belongs to a horizontal or vertical run of
/// [`MIN_RUN`] or more equal tokens. Runs contribute all their cells; cells in
/// two crossing runs appear once. Empty cells never match.
pub fn find_matches(board: &Board) -> HashSet<Position> {
    let mut matches = HashSet::new();
    for row in 0..board.rows() {
        collect_runs(
            (0..board.cols()).map(|col| Position::new(row, col)),
            board,
            &mut matches,
        );
    }
    for col in 0..board.cols() {
        collect_runs(
            (0..board.rows()).map(|row| Position::new(row, col)),
            board,
            &mut matches,
        );
    }
    matches
}

/// Walk one line of positions and add every maximal run of length >= MIN_RUN.
fn collect_runs(
    line: impl Iterator<Item = Position>,
    board: &Board,
    out: &mut HashSet<Position>,
) {
    let mut run: Vec<Position> = Vec::new();
    let mut current: Option<Token> = None;
    for pos in line {
        let token = board.token(pos);
        if token.is_some() && token == current {
            run.push(pos);
            continue;
        }
        if run.len() >= MIN_RUN {
            out.extend(run.iter().copied());
        }
        run.clear();
        current = token;
        if token.is_some() {
            run.push(pos);
        }
    }
    if run.len() >= MIN_RUN {
        out.extend(run);
    }
}
