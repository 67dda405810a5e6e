//! App: terminal init, main loop, key and mouse handling.

use crate::input::{Action, Direction, drag_target, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, CELL_HEIGHT, CELL_WIDTH, View};
use crate::{GameConfig, highscores};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::{info, warn};
use matchtui::board::Position;
use matchtui::engine::{Engine, SwapResult};
use matchtui::error::EngineError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::Duration;

/// Nothing animates, so input is the only reason to redraw.
const POLL_INTERVAL_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    Restart,
    Exit,
}

impl QuitOption {
    fn next(self) -> Self {
        match self {
            Self::Resume => Self::Restart,
            Self::Restart => Self::Exit,
            Self::Exit => Self::Resume,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Resume => Self::Exit,
            Self::Restart => Self::Resume,
            Self::Exit => Self::Restart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warn,
}

/// One-line message under the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    fn warn(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Warn,
        }
    }
}

/// Outcome of the last accepted swap, for the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub points: u32,
    pub passes: u32,
}

/// Pointer press waiting for its release.
#[derive(Debug, Clone, Copy)]
struct Drag {
    cell: Position,
    x: u16,
    y: u16,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    engine: Engine<StdRng>,
    screen: Screen,
    quit_selected: QuitOption,
    cursor: Position,
    status: Option<Status>,
    last_move: Option<LastMove>,
    best: u32,
    /// Best score currently on disk.
    saved_best: u32,
    drag: Option<Drag>,
    /// Terminal area of the last frame; maps mouse coordinates to cells.
    area: Rect,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let engine = Engine::new(config.engine, rng)?;
        let best = highscores::load_best();
        info!(
            "starting {}x{} board, {} colours, seed {:?}, best {}",
            config.engine.rows, config.engine.cols, config.engine.palette_size, config.seed, best
        );
        Ok(Self {
            config,
            theme,
            engine,
            screen: Screen::Playing,
            quit_selected: QuitOption::Resume,
            cursor: Position::new(0, 0),
            status: None,
            last_move: None,
            best,
            saved_best: best,
            drag: None,
            area: Rect::default(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        self.persist_best();
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            self.draw(terminal)?;

            if !event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
                continue;
            }
            let exit = match event::read()? {
                // Ignore repeats and releases; one press is one action.
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.handle_action(key_to_action(key))?
                }
                Event::Mouse(mouse) => {
                    self.handle_mouse(mouse)?;
                    false
                }
                _ => false,
            };
            if exit {
                return Ok(());
            }
        }
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let view = View {
            board: self.engine.board(),
            score: self.engine.score(),
            best: self.best,
            moves: self.engine.moves(),
            cursor: self.cursor,
            selection: self.engine.selection(),
            last_move: self.last_move,
            status: self.status.as_ref(),
            seed: self.config.seed,
        };
        let (screen, quit_selected, theme) = (self.screen, self.quit_selected, &self.theme);
        let mut area = self.area;
        terminal.draw(|f| {
            area = f.area();
            ui::draw(f, screen, &view, theme, quit_selected);
        })?;
        self.area = area;
        Ok(())
    }

    /// Apply one decoded action. Returns true when the app should exit.
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match self.screen {
            Screen::Playing => self.handle_playing(action).map(|()| false),
            Screen::QuitMenu => self.handle_quit_menu(action),
        }
    }

    fn handle_playing(&mut self, action: Action) -> Result<()> {
        let (rows, cols) = (self.engine.board().rows(), self.engine.board().cols());
        match action {
            Action::Move(dir) => {
                self.cursor = dir.step(self.cursor, rows, cols).unwrap_or(self.cursor);
            }
            Action::Select => self.select(self.cursor)?,
            Action::Swap(dir) => {
                let from = self.engine.selection().unwrap_or(self.cursor);
                match dir.step(from, rows, cols) {
                    Some(to) => {
                        self.try_swap(from, to)?;
                        self.cursor = to;
                    }
                    None => {
                        self.engine.set_selection(None);
                        self.status = Some(Status::warn("edge of the board"));
                    }
                }
            }
            Action::Cancel => {
                if self.engine.selection().is_some() {
                    self.engine.set_selection(None);
                } else {
                    self.open_quit_menu();
                }
            }
            Action::Restart => self.restart()?,
            Action::Quit => self.open_quit_menu(),
            Action::None => {}
        }
        Ok(())
    }

    fn handle_quit_menu(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Move(Direction::Down | Direction::Right) => {
                self.quit_selected = self.quit_selected.next();
            }
            Action::Move(Direction::Up | Direction::Left) => {
                self.quit_selected = self.quit_selected.prev();
            }
            Action::Select => match self.quit_selected {
                QuitOption::Resume => self.screen = Screen::Playing,
                QuitOption::Restart => self.restart()?,
                QuitOption::Exit => return Ok(true),
            },
            Action::Quit => return Ok(true),
            Action::Cancel => self.screen = Screen::Playing,
            _ => {}
        }
        Ok(false)
    }

    fn open_quit_menu(&mut self) {
        self.screen = Screen::QuitMenu;
        self.quit_selected = QuitOption::Resume;
    }

    /// Click/Space on a cell: select it, deselect it, or swap the selection with it.
    fn select(&mut self, cell: Position) -> Result<()> {
        match self.engine.selection() {
            None => self.engine.set_selection(Some(cell)),
            Some(selected) if selected == cell => self.engine.set_selection(None),
            Some(selected) => self.try_swap(selected, cell)?,
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.screen != Screen::Playing {
            return Ok(());
        }
        let (rows, cols) = (self.engine.board().rows(), self.engine.board().cols());
        let board = ui::board_rect(self.area, rows, cols);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = ui::cell_at(board, rows, cols, mouse.column, mouse.row).map(|cell| Drag {
                    cell,
                    x: mouse.column,
                    y: mouse.row,
                });
                if let Some(drag) = self.drag {
                    self.cursor = drag.cell;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return Ok(());
                };
                let dx = (i32::from(mouse.column) - i32::from(drag.x)) / i32::from(CELL_WIDTH);
                let dy = (i32::from(mouse.row) - i32::from(drag.y)) / i32::from(CELL_HEIGHT);
                if let Some(to) = drag_target(drag.cell, dx, dy, rows, cols) {
                    self.try_swap(drag.cell, to)?;
                    self.cursor = to;
                } else if dx == 0 && dy == 0 {
                    self.select(drag.cell)?;
                } else {
                    self.engine.set_selection(None);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Ask the engine for a swap. Rejected moves become a status message;
    /// anything else the engine reports is a bug and ends the game.
    fn try_swap(&mut self, from: Position, to: Position) -> Result<()> {
        match self.engine.request_swap(from, to) {
            Ok(result) => {
                self.record(&result);
                Ok(())
            }
            Err(EngineError::InvalidMove { reason, .. }) => {
                self.status = Some(Status::warn(reason.to_string()));
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn record(&mut self, result: &SwapResult) {
        if !result.accepted {
            self.status = Some(Status::info("no match, swapped back"));
            return;
        }
        self.last_move = Some(LastMove {
            points: result.score_delta,
            passes: result.resolution.passes,
        });
        self.status = match result.resolution.passes {
            0 => Some(Status::info("no match")),
            1 => None,
            n => Some(Status::info(format!("cascade x{n}!"))),
        };
        if result.state.score > self.best {
            self.best = result.state.score;
        }
    }

    fn restart(&mut self) -> Result<()> {
        self.persist_best();
        self.engine.reset()?;
        self.screen = Screen::Playing;
        self.cursor = Position::new(0, 0);
        self.last_move = None;
        self.drag = None;
        self.status = Some(Status::info("new board"));
        info!("new board");
        Ok(())
    }

    fn persist_best(&mut self) {
        if self.best <= self.saved_best {
            return;
        }
        match highscores::save_best(self.best) {
            Ok(()) => self.saved_best = self.best,
            Err(e) => warn!("could not save best score: {e:#}"),
        }
    }
}
