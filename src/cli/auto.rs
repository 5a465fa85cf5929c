//! Auto command implementation - watch the greedy policy play one game.

use super::output::format_result_text;
use super::{load_config, resolve_seed, CliError, OutputFormat};
use orbclash::autoplay::Autoplayer;
use orbclash::game::{GameSession, Observer, Step};
use orbclash::replay::{render_text, Recording};
use std::path::PathBuf;

/// Execute the auto command.
///
/// # Errors
///
/// Returns an error if the config is invalid or output fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    seed: Option<u64>,
    config: Option<PathBuf>,
    turns: u32,
    format: OutputFormat,
    save: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let seed = resolve_seed(seed);
    let show_turns = !quiet && format == OutputFormat::Text;
    let mut printer = TurnPrinter { enabled: show_turns };
    let mut session = GameSession::start(config, seed, &mut printer)?;

    let result = Autoplayer::new(turns).play(&mut session, &mut printer);

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_result_text(&result));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    if let Some(path) = save {
        Recording::from_session(&session).save(&path)?;
        if format == OutputFormat::Text {
            println!("Recording saved to {}", path.display());
        }
    }

    Ok(())
}

/// Prints the session after each settled turn.
struct TurnPrinter {
    enabled: bool,
}

impl Observer for TurnPrinter {
    fn on_step(&mut self, step: Step, session: &GameSession) {
        if !self.enabled {
            return;
        }
        match step {
            Step::Deal => print!("{}", render_text(session)),
            Step::EnemyAttacked | Step::EnemySpawned | Step::SkillCast | Step::GameOver => {
                println!();
                print!("{}", render_text(session));
            }
            _ => {}
        }
    }
}
