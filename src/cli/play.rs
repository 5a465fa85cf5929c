//! Play command implementation - interactive TUI game.

use super::tui::{self, Term, View};
use super::{load_config, resolve_seed, CliError};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use orbclash::game::{
    best_swap, GameSession, Observer, Pos, Skill, SkillOutcome, Step, TapOutcome,
};
use orbclash::replay::Recording;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const CONTROLS: &str =
    " [arrows] Move  [space] Tap  [h] Heal  [f] Fire  [b] Rage  [?] Hint  [r] Restart  [q] Quit ";

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the terminal fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    seed: Option<u64>,
    config: Option<PathBuf>,
    delay: Option<u64>,
    save: Option<PathBuf>,
) -> Result<(), CliError> {
    let mut config = load_config(config.as_deref())?;
    if let Some(ms) = delay {
        config.step_delay_ms = ms;
    }
    let seed = resolve_seed(seed);
    let session = GameSession::new(config, seed)?;
    log::info!("starting interactive game with seed {seed}");

    let mut terminal = tui::setup()?;
    let result = run(&mut terminal, session);
    tui::restore(&mut terminal)?;
    let session = result?;

    if let Some(path) = save {
        Recording::from_session(&session).save(&path)?;
        println!("Recording saved to {}", path.display());
    }
    Ok(())
}

/// Redraws on every step and sleeps on every pause.
struct TuiObserver<'a> {
    terminal: &'a mut Term,
    cursor: Pos,
    title: String,
    error: Option<io::Error>,
}

impl<'a> TuiObserver<'a> {
    fn new(terminal: &'a mut Term, cursor: Pos, title: String) -> Self {
        Self {
            terminal,
            cursor,
            title,
            error: None,
        }
    }

    fn finish(self) -> Result<(), CliError> {
        match self.error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

impl Observer for TuiObserver<'_> {
    fn on_step(&mut self, step: Step, session: &GameSession) {
        if self.error.is_some() {
            return;
        }
        log::trace!("redraw after {step:?}");
        let view = View {
            title: self.title.clone(),
            cursor: Some(self.cursor),
            controls: CONTROLS,
        };
        if let Err(e) = self.terminal.draw(|f| tui::draw(f, session, &view)) {
            self.error = Some(e);
        }
    }

    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Play until the user quits. Returns the session for saving.
fn run(terminal: &mut Term, mut session: GameSession) -> Result<GameSession, CliError> {
    let mut cursor = Pos::new(0, 0);
    let mut status = String::new();

    loop {
        let title = format!(" Orbclash | seed {} | turn {} | {status}", session.seed(), session.turn());
        let view = View {
            title: title.clone(),
            cursor: Some(cursor),
            controls: CONTROLS,
        };
        terminal
            .draw(|f| tui::draw(f, &session, &view))
            .map_err(|e| CliError::new(e.to_string()))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let tap = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up => {
                    cursor.row = cursor.row.saturating_sub(1);
                    None
                }
                KeyCode::Down => {
                    cursor.row = (cursor.row + 1).min(session.board().rows() - 1);
                    None
                }
                KeyCode::Left => {
                    cursor.col = cursor.col.saturating_sub(1);
                    None
                }
                KeyCode::Right => {
                    cursor.col = (cursor.col + 1).min(session.board().cols() - 1);
                    None
                }
                KeyCode::Char(' ') | KeyCode::Enter => Some(cursor),
                KeyCode::Char(c @ ('h' | 'f' | 'b')) => {
                    let skill = match c {
                        'h' => Skill::Heal,
                        'f' => Skill::Fire,
                        _ => Skill::Buff,
                    };
                    let mut observer = TuiObserver::new(terminal, cursor, title.clone());
                    let outcome = session.cast(skill, &mut observer);
                    observer.finish()?;
                    status = describe_cast(skill, outcome);
                    None
                }
                KeyCode::Char('?') => {
                    let config = session.config();
                    status = match best_swap(session.board(), config.min_match) {
                        Some(hint) => {
                            cursor = hint.from;
                            format!("Try {} -> {}", hint.from, hint.to)
                        }
                        None => "No productive swap".to_string(),
                    };
                    None
                }
                KeyCode::Char('r') => {
                    let mut observer = TuiObserver::new(terminal, cursor, title.clone());
                    session.restart(&mut observer);
                    observer.finish()?;
                    status = "New game".to_string();
                    None
                }
                _ => None,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let size = terminal.size()?;
                let area = ratatui::layout::Rect::new(0, 0, size.width, size.height);
                let board_area = tui::areas(area, &session).board;
                tui::cell_at(board_area, mouse.column, mouse.row)
            }
            _ => None,
        };

        if let Some(pos) = tap {
            if session.board().contains(pos) {
                cursor = pos;
            }
            let mut observer = TuiObserver::new(terminal, cursor, title.clone());
            let outcome = session.tap_cell(pos, &mut observer);
            observer.finish()?;
            if let Some(text) = describe_tap(outcome) {
                status = text;
            }
            // Input pressed during the animation is not queued.
            tui::drain_input()?;
        }
    }

    Ok(session)
}

fn describe_tap(outcome: TapOutcome) -> Option<String> {
    match outcome {
        TapOutcome::Wasted => Some("No match".to_string()),
        TapOutcome::Resolved(report) if report.game_over => Some("Defeated".to_string()),
        TapOutcome::Resolved(report) if report.enemy_defeated => {
            Some(format!("Combo x{}, monster slain!", report.combo))
        }
        TapOutcome::Resolved(report) => Some(format!("Combo x{}, {} damage", report.combo, report.damage)),
        TapOutcome::Ignored
        | TapOutcome::Selected
        | TapOutcome::Deselected
        | TapOutcome::Reselected => None,
    }
}

fn describe_cast(skill: Skill, outcome: SkillOutcome) -> String {
    match outcome {
        SkillOutcome::Ignored => "Wait for your turn".to_string(),
        SkillOutcome::Unaffordable => format!("Not enough SP for {skill}"),
        SkillOutcome::Cast { .. } => format!("Cast {skill}"),
    }
}
