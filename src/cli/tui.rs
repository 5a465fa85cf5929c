//! Shared ratatui drawing for the play and replay viewers.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use orbclash::game::{GameSession, Orb, Pos};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, stdout, Stdout};
use std::time::Duration;

use super::CliError;

/// Terminal type used by the viewers.
pub(super) type Term = Terminal<CrosstermBackend<Stdout>>;

/// Width of one board cell in terminal columns.
pub(super) const CELL_WIDTH: u16 = 3;

/// What a viewer wants drawn around the session.
#[derive(Debug)]
pub(super) struct View<'a> {
    /// Header text.
    pub(super) title: String,
    /// Keyboard cursor, if the viewer has one.
    pub(super) cursor: Option<Pos>,
    /// Footer key help.
    pub(super) controls: &'a str,
}

/// Enter raw mode and the alternate screen.
pub(super) fn setup() -> Result<Term, CliError> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))
}

/// Leave the alternate screen and raw mode.
pub(super) fn restore(terminal: &mut Term) -> Result<(), CliError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Throw away input that arrived while the session was busy.
pub(super) fn drain_input() -> io::Result<()> {
    while event::poll(Duration::ZERO)? {
        let _ = event::read()?;
    }
    Ok(())
}

/// Screen layout: header, board beside stats, log, footer.
#[derive(Debug, Clone, Copy)]
pub(super) struct Areas {
    header: Rect,
    /// Board panel.
    pub(super) board: Rect,
    stats: Rect,
    log: Rect,
    footer: Rect,
}

pub(super) fn areas(full: Rect, session: &GameSession) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(full);

    #[allow(clippy::cast_possible_truncation)]
    let board_width = session.board().cols() as u16 * CELL_WIDTH + 2;
    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width.max(20)), Constraint::Min(24)])
        .split(chunks[1]);

    Areas {
        header: chunks[0],
        board: main[0],
        stats: main[1],
        log: chunks[2],
        footer: chunks[3],
    }
}

/// Draw a full frame.
pub(super) fn draw(f: &mut Frame, session: &GameSession, view: &View<'_>) {
    let areas = areas(f.area(), session);

    let header = Paragraph::new(view.title.as_str())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, areas.header);

    render_board(f, areas.board, session, view.cursor);
    render_stats(f, areas.stats, session);
    render_log(f, areas.log, session);

    let footer = Paragraph::new(view.controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, areas.footer);
}

/// Map a terminal cell inside the board panel to a board position.
pub(super) fn cell_at(board_area: Rect, column: u16, row: u16) -> Option<Pos> {
    let x = column.checked_sub(board_area.x + 1)?;
    let y = row.checked_sub(board_area.y + 1)?;
    Some(Pos::new(usize::from(y), usize::from(x / CELL_WIDTH)))
}

const fn orb_color(orb: Orb) -> Color {
    match orb {
        Orb::Red => Color::Red,
        Orb::Blue => Color::Blue,
        Orb::Green => Color::Green,
        Orb::Yellow => Color::Yellow,
        Orb::Purple => Color::Magenta,
        Orb::Heart => Color::LightMagenta,
    }
}

fn render_board(f: &mut Frame, area: Rect, session: &GameSession, cursor: Option<Pos>) {
    let board = session.board();
    let mut lines: Vec<Line> = Vec::with_capacity(board.rows());

    for row in 0..board.rows() {
        let mut spans = Vec::with_capacity(board.cols());
        for col in 0..board.cols() {
            let pos = Pos::new(row, col);
            let (text, mut style) = match board.get(pos) {
                Some(orb) => (format!(" {} ", orb.letter()), Style::default().fg(orb_color(orb))),
                None => (" · ".to_string(), Style::default().fg(Color::DarkGray)),
            };
            if session.selection() == Some(pos) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if cursor == Some(pos) {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let title = format!(" Combo {} ", session.combo());
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

fn ratio(value: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(value.min(max)) / f64::from(max)
    }
}

fn render_stats(f: &mut Frame, area: Rect, session: &GameSession) {
    let hero = session.hero();
    let enemy = session.enemy();
    let block = Block::default().borders(Borders::ALL).title(" Battle ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let enemy_label = format!("Lv{} monster  ATK {}", enemy.level, enemy.atk);
    f.render_widget(Paragraph::new(enemy_label), rows[0]);
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Red))
            .ratio(ratio(enemy.hp, enemy.max_hp))
            .label(format!("{}/{}", enemy.hp, enemy.max_hp)),
        rows[1],
    );

    let rage = if hero.is_buffed() { "  RAGE" } else { "" };
    f.render_widget(Paragraph::new(format!("Hero{rage}")), rows[2]);
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio(hero.hp, hero.max_hp))
            .label(format!("HP {}/{}", hero.hp, hero.max_hp)),
        rows[3],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue))
            .ratio(ratio(hero.sp, hero.max_sp))
            .label(format!("SP {}/{}", hero.sp, hero.max_sp)),
        rows[4],
    );

    let status = if session.is_game_over() {
        Span::styled(
            "GAME OVER - press r to restart",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(session.phase().to_string())
    };
    f.render_widget(Paragraph::new(Line::from(status)), rows[5]);
}

fn render_log(f: &mut Frame, area: Rect, session: &GameSession) {
    let visible = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = session
        .log()
        .recent()
        .take(visible)
        .map(|event| Line::from(event.to_string()))
        .collect();
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Log "))
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}
