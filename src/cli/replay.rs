//! Replay command implementation.

use super::tui::{self, View};
use super::{CliError, ReplayFormat};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use orbclash::game::Action;
use orbclash::replay::{Recording, ReplayEngine};
use std::path::PathBuf;
use std::time::Duration;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    recording_path: PathBuf,
    format: ReplayFormat,
    step: Option<usize>,
) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path).map_err(|e| {
        CliError::new(format!("Failed to load recording {}: {e}", recording_path.display()))
    })?;
    log::info!(
        "replaying {} actions from seed {}",
        recording.actions.len(),
        recording.seed
    );

    // JSON shows a single position, so it defaults to the end.
    let default_step = match format {
        ReplayFormat::Json => recording.actions.len(),
        _ => 0,
    };
    let engine = ReplayEngine::new_at_step(recording, step.unwrap_or(default_step))?;

    match format {
        ReplayFormat::Tui => run_replay_tui(engine),
        ReplayFormat::Ascii => {
            print_replay(engine, ReplayEngine::render_ascii);
            Ok(())
        }
        ReplayFormat::Text => {
            print_replay(engine, ReplayEngine::render_text);
            Ok(())
        }
        ReplayFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&engine.session().snapshot())?);
            Ok(())
        }
    }
}

fn describe(action: Option<Action>) -> String {
    match action {
        None => "start".to_string(),
        Some(Action::Tap(pos)) => format!("tap {pos}"),
        Some(Action::Cast(skill)) => format!("cast {skill}"),
        Some(Action::Restart) => "restart".to_string(),
    }
}

fn run_replay_tui(mut engine: ReplayEngine) -> Result<(), CliError> {
    let mut terminal = tui::setup()?;

    let result = (|| -> Result<(), CliError> {
        loop {
            let title = format!(
                " Orbclash Replay | Step {}/{} | {} ",
                engine.position(),
                engine.len(),
                describe(engine.last_action())
            );
            let view = View {
                title,
                cursor: None,
                controls: " [q] Quit  [←/→] Step  [Home/End] Jump ",
            };
            terminal
                .draw(|f| tui::draw(f, engine.session(), &view))
                .map_err(|e| CliError::new(e.to_string()))?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Right | KeyCode::Char('l') => {
                        let _ = engine.step_forward();
                    }
                    KeyCode::Left | KeyCode::Char('h') => {
                        let _ = engine.step_backward();
                    }
                    KeyCode::Home => engine.goto_step(0)?,
                    KeyCode::End => engine.goto_step(engine.len())?,
                    _ => {}
                }
            }
        }
        Ok(())
    })();

    tui::restore(&mut terminal)?;
    result
}

fn print_replay(mut engine: ReplayEngine, render: fn(&ReplayEngine) -> String) {
    println!("Replay (seed: {})", engine.recording().seed);
    println!("Actions: {}", engine.len());
    println!();

    loop {
        println!(
            "=== Step {} ({}) ===",
            engine.position(),
            describe(engine.last_action())
        );
        println!("{}", render(&engine));

        if engine.step_forward().is_err() {
            println!("=== END OF RECORDING ===");
            break;
        }
    }
}
