//! Layout and drawing: board, cursor and selection, sidebar, quit menu.

use crate::app::{LastMove, QuitOption, Screen, Status, StatusKind};
use crate::theme::{Theme, blend};
use matchtui::board::{Board, Position};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Each board cell is two terminal columns wide so tokens look square.
pub const CELL_WIDTH: u16 = 2;
pub const CELL_HEIGHT: u16 = 1;
const SIDEBAR_WIDTH: u16 = 28;
/// Sidebar needs this many rows even when the board is shorter.
const SIDEBAR_MIN_HEIGHT: u16 = 18;

/// Everything the renderer reads. Built fresh each frame; never mutated here.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub board: &'a Board,
    pub score: u32,
    pub best: u32,
    pub moves: u32,
    pub cursor: Position,
    pub selection: Option<Position>,
    pub last_move: Option<LastMove>,
    pub status: Option<&'a Status>,
    pub seed: Option<u64>,
}

#[inline]
fn dim(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Outer size (border included) of the playfield for a `rows` x `cols` board.
fn playfield_size(rows: usize, cols: usize) -> (u16, u16) {
    (
        dim(cols).saturating_mul(CELL_WIDTH).saturating_add(2),
        dim(rows).saturating_mul(CELL_HEIGHT).saturating_add(2),
    )
}

/// Smallest terminal (columns, rows) that fits board and sidebar.
pub fn min_terminal_size(rows: usize, cols: usize) -> (u16, u16) {
    let (pw, ph) = playfield_size(rows, cols);
    (pw.saturating_add(SIDEBAR_WIDTH), ph.max(SIDEBAR_MIN_HEIGHT))
}

/// Outer rect of playfield + sidebar, centred in `area`.
fn game_rect(area: Rect, rows: usize, cols: usize) -> Rect {
    let (total_w, total_h) = min_terminal_size(rows, cols);
    Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(total_h) / 2,
        width: total_w.min(area.width),
        height: total_h.min(area.height),
    }
}

/// Board cells only (inside the border). Shared with the mouse decoder so
/// clicks map back to the cells that were drawn.
pub fn board_rect(area: Rect, rows: usize, cols: usize) -> Rect {
    let game = game_rect(area, rows, cols);
    let (pw, ph) = playfield_size(rows, cols);
    Rect {
        x: game.x + 1,
        y: game.y + 1,
        width: pw.saturating_sub(2),
        height: ph.saturating_sub(2),
    }
}

/// Board cell under terminal coordinate (`x`, `y`).
pub fn cell_at(board: Rect, rows: usize, cols: usize, x: u16, y: u16) -> Option<Position> {
    if x < board.x || y < board.y {
        return None;
    }
    let col = usize::from((x - board.x) / CELL_WIDTH);
    let row = usize::from((y - board.y) / CELL_HEIGHT);
    (row < rows && col < cols).then_some(Position::new(row, col))
}

/// Draw the current screen.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    view: &View<'_>,
    theme: &Theme,
    quit_selected: QuitOption,
) {
    let area = frame.area();
    let (need_w, need_h) = min_terminal_size(view.board.rows(), view.board.cols());
    if area.width < need_w || area.height < need_h {
        draw_too_small(frame, area, theme, need_w, need_h);
        return;
    }
    draw_game(frame, area, view, theme);
    if screen == Screen::QuitMenu {
        draw_quit_menu(frame, area, theme, quit_selected);
    }
}

fn draw_too_small(frame: &mut Frame, area: Rect, theme: &Theme, need_w: u16, need_h: u16) {
    let lines = vec![
        Line::from(Span::styled(
            " Terminal too small ",
            Style::default().fg(Color::Black).bg(theme.highlight),
        )),
        Line::from(format!(" need {}x{}, have {}x{} ", need_w, need_h, area.width, area.height)),
        Line::from(" q to quit "),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.main_fg).bg(theme.bg));
    frame.render_widget(p, area);
}

fn draw_game(frame: &mut Frame, area: Rect, view: &View<'_>, theme: &Theme) {
    let (rows, cols) = (view.board.rows(), view.board.cols());
    let game = game_rect(area, rows, cols);
    let (pw, ph) = playfield_size(rows, cols);
    let playfield = Rect {
        x: game.x,
        y: game.y,
        width: pw,
        height: ph,
    };
    let sidebar = Rect {
        x: game.x + pw,
        y: game.y,
        width: SIDEBAR_WIDTH,
        height: game.height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" matchtui ", Style::default().fg(theme.title)));
    frame.render_widget(block, playfield);
    draw_board(frame, board_rect(area, rows, cols), view, theme);
    draw_sidebar(frame, sidebar, view, theme);
}

fn draw_board(frame: &mut Frame, rect: Rect, view: &View<'_>, theme: &Theme) {
    let buf = frame.buffer_mut();
    for pos in view.board.positions() {
        let base = view
            .board
            .token(pos)
            .map_or(theme.bg, |t| theme.token_color(t));
        let selected = view.selection == Some(pos);
        let bg = if selected {
            blend(base, theme.highlight, 0.5)
        } else {
            base
        };
        let symbol = match (view.cursor == pos, selected) {
            (true, _) => "[]",
            (false, true) => "<>",
            (false, false) => "  ",
        };
        let x = rect.x + dim(pos.col) * CELL_WIDTH;
        let y = rect.y + dim(pos.row) * CELL_HEIGHT;
        if x < rect.x + rect.width && y < rect.y + rect.height {
            let style = Style::default()
                .fg(Color::Black)
                .bg(bg)
                .add_modifier(Modifier::BOLD);
            buf.set_string(x, y, symbol, style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, view: &View<'_>, theme: &Theme) {
    let label = Style::default().fg(theme.main_fg);
    let value = Style::default()
        .fg(theme.title)
        .add_modifier(Modifier::BOLD);
    let key = Style::default().fg(theme.token_color(5));

    let stat = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(name, label), Span::styled(v, value)])
    };

    let mut lines = vec![
        stat(" Score  ", view.score.to_string()),
        stat(" Best   ", view.best.max(view.score).to_string()),
        stat(" Moves  ", view.moves.to_string()),
    ];
    match view.last_move {
        Some(m) if m.passes > 1 => {
            lines.push(stat(" Last   ", format!("+{} (x{} cascade)", m.points, m.passes)));
        }
        Some(m) => lines.push(stat(" Last   ", format!("+{}", m.points))),
        None => lines.push(stat(" Last   ", "-".to_string())),
    }
    if let Some(seed) = view.seed {
        lines.push(stat(" Seed   ", seed.to_string()));
    }
    lines.push(Line::from(""));
    if let Some(status) = view.status {
        let style = match status.kind {
            StatusKind::Info => Style::default().fg(theme.main_fg),
            StatusKind::Warn => Style::default().fg(Color::Black).bg(theme.token_color(2)),
        };
        lines.push(Line::from(Span::styled(format!(" {} ", status.text), style)));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    for (k, what) in [
        (" ←↑↓→ hjkl ", "cursor"),
        (" Space     ", "select/swap"),
        (" ⇧+arrows  ", "swap"),
        (" Esc       ", "cancel"),
        (" r         ", "new board"),
        (" q         ", "quit"),
    ] {
        lines.push(Line::from(vec![Span::styled(k, key), Span::styled(what, label)]));
    }

    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    frame.render_widget(p, area);
}

fn draw_quit_menu(frame: &mut Frame, area: Rect, theme: &Theme, selected: QuitOption) {
    let popup_w = 24u16;
    let popup_h = 7u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let item = |opt: QuitOption, text: &'static str| {
        let style = if opt == selected {
            Style::default().fg(Color::Black).bg(theme.highlight)
        } else {
            Style::default().fg(theme.main_fg)
        };
        Line::from(Span::styled(text, style))
    };
    let lines = vec![
        Line::from(""),
        item(QuitOption::Resume, " Resume "),
        item(QuitOption::Restart, " New board "),
        item(QuitOption::Exit, " Quit "),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Quit? ", Style::default().fg(theme.title))),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(p, popup);
}
