//! Key bindings and pointer drags, decoded into cursor moves and swap intents.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use matchtui::board::Position;

/// Shortest drag, in board cells, that counts as a swipe.
pub const SWIPE_MIN_CELLS: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbour of `pos` in this direction, if it is on a `rows` x `cols` board.
    pub fn step(self, pos: Position, rows: usize, cols: usize) -> Option<Position> {
        let (row, col) = match self {
            Self::Up => (pos.row.checked_sub(1)?, pos.col),
            Self::Down => (pos.row + 1, pos.col),
            Self::Left => (pos.row, pos.col.checked_sub(1)?),
            Self::Right => (pos.row, pos.col + 1),
        };
        (row < rows && col < cols).then_some(Position::new(row, col))
    }
}

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    /// Select the cursor cell, or swap the selection with it.
    Select,
    /// Swap the selected (or cursor) token towards a direction.
    Swap(Direction),
    Cancel,
    Restart,
    Quit,
    None,
}

/// Map key event to game action. Arrows and vim keys move; shifted ones swap.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let shift = modifiers == KeyModifiers::SHIFT;
    if !modifiers.is_empty() && !shift {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('r') => Action::Restart,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Select,
        KeyCode::Up if shift => Action::Swap(Direction::Up),
        KeyCode::Down if shift => Action::Swap(Direction::Down),
        KeyCode::Left if shift => Action::Swap(Direction::Left),
        KeyCode::Right if shift => Action::Swap(Direction::Right),
        KeyCode::Char('K') => Action::Swap(Direction::Up),
        KeyCode::Char('J') => Action::Swap(Direction::Down),
        KeyCode::Char('H') => Action::Swap(Direction::Left),
        KeyCode::Char('L') => Action::Swap(Direction::Right),
        KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Action::Move(Direction::Right),
        _ => Action::None,
    }
}

/// Target of a drag that started on `start` and moved `dx`/`dy` board cells
/// (positive = right/down). The dominant axis picks the direction; short drags
/// and drags off the board give nothing.
pub fn drag_target(start: Position, dx: i32, dy: i32, rows: usize, cols: usize) -> Option<Position> {
    let dir = if dx.abs() > dy.abs() {
        if dx >= SWIPE_MIN_CELLS {
            Direction::Right
        } else if dx <= -SWIPE_MIN_CELLS {
            Direction::Left
        } else {
            return None;
        }
    } else if dy >= SWIPE_MIN_CELLS {
        Direction::Down
    } else if dy <= -SWIPE_MIN_CELLS {
        Direction::Up
    } else {
        return None;
    };
    dir.step(start, rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_vim_moves() {
        assert_eq!(
            key_to_action(key(KeyCode::Left, KeyModifiers::NONE)),
            Action::Move(Direction::Left)
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Action::Move(Direction::Down)
        );
    }

    #[test]
    fn test_shift_swaps() {
        assert_eq!(
            key_to_action(key(KeyCode::Right, KeyModifiers::SHIFT)),
            Action::Swap(Direction::Right)
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('K'), KeyModifiers::SHIFT)),
            Action::Swap(Direction::Up)
        );
    }

    #[test]
    fn test_control_chords_ignored() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            Action::None
        );
    }

    #[test]
    fn test_step_stays_on_board() {
        let corner = Position::new(0, 0);
        assert_eq!(Direction::Up.step(corner, 12, 8), None);
        assert_eq!(Direction::Left.step(corner, 12, 8), None);
        assert_eq!(Direction::Down.step(corner, 12, 8), Some(Position::new(1, 0)));
        assert_eq!(Direction::Right.step(Position::new(0, 7), 12, 8), None);
    }

    #[test]
    fn test_drag_picks_dominant_axis() {
        let start = Position::new(5, 3);
        assert_eq!(drag_target(start, 2, 1, 12, 8), Some(Position::new(5, 4)));
        assert_eq!(drag_target(start, -1, 3, 12, 8), Some(Position::new(6, 3)));
        assert_eq!(drag_target(start, 0, -1, 12, 8), Some(Position::new(4, 3)));
    }

    #[test]
    fn test_short_or_off_board_drag_ignored() {
        assert_eq!(drag_target(Position::new(5, 3), 0, 0, 12, 8), None);
        assert_eq!(drag_target(Position::new(11, 3), 0, 2, 12, 8), None);
    }
}
