use anyhow::Result;
use std::io::{BufRead, Write};

use foodtruck_game::{GameSession, ScenarioCatalog, game_status};

use crate::display;
use crate::input::{ask_yes_no, pause, read_choice};

/// How an interactive game finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished,
    /// Input ended before the game did.
    Abandoned,
}

/// Interactive turn loop. `pause_between_turns` waits for Enter after each
/// result so the player can read it.
///
/// # Errors
///
/// Propagates terminal I/O failures and session errors such as an empty
/// difficulty tier.
pub fn run(
    session: &mut GameSession<'_>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    pause_between_turns: bool,
) -> Result<PlayOutcome> {
    display::title(out)?;
    display::help(out)?;
    log::info!(
        "Game started | session:{} seeded:{}",
        session.state().session_id,
        session.state().random_seed.is_some()
    );

    while !session.is_over() {
        display::stats_bar(out, session.state())?;
        let scenario = session.next_scenario()?;
        display::scenario(out, scenario)?;

        let Some(selection) = read_choice(input, out, scenario.choices.len())? else {
            writeln!(out, "\n👋 Thanks for playing!")?;
            writeln!(out, "{}", game_status(session.state()))?;
            log::info!(
                "Game abandoned | session:{} turn:{}",
                session.state().session_id,
                session.state().turn
            );
            return Ok(PlayOutcome::Abandoned);
        };

        let before = session.state().resources;
        let after = session.choose(selection)?.resources;
        if let Some(choice) = scenario.choices.get(selection - 1) {
            display::choice_result(out, choice, &before, &after)?;
        }

        if pause_between_turns
            && !session.is_over()
            && !pause(input, out, "Press Enter to continue...")?
        {
            return Ok(PlayOutcome::Abandoned);
        }
    }

    display::game_over(out, session.state())?;
    log::info!(
        "Game finished | session:{} turns:{} reason:{} score:{}",
        session.state().session_id,
        session.state().turn,
        session
            .state()
            .end_reason
            .map_or("none", |reason| reason.as_str()),
        session.state().score.unwrap_or_default()
    );
    Ok(PlayOutcome::Finished)
}

/// Label for the `game`th game of a sitting; the first keeps `base` as given.
fn numbered(base: Option<&str>, game: u32) -> Option<String> {
    base.map(|base| {
        if game == 1 {
            base.to_string()
        } else {
            format!("{base}-{game}")
        }
    })
}

/// Play games on `catalog` until the player declines another one or input
/// ends. Each game is a fresh session; a given seed or session id gets a
/// `-N` suffix from the second game on so replays draw new scenarios.
/// Returns the number of games started.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_sitting(
    catalog: &ScenarioCatalog,
    session_id: Option<&str>,
    seed: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    pause_between_turns: bool,
) -> Result<u32> {
    let mut games = 0;
    loop {
        games += 1;
        let mut session = GameSession::new(
            catalog,
            numbered(session_id, games),
            numbered(seed, games),
        );
        let outcome = run(&mut session, input, out, pause_between_turns)?;
        if outcome == PlayOutcome::Abandoned
            || !ask_yes_no(input, out, "Would you like to play again?")?
        {
            break;
        }
    }
    if games > 1 {
        log::info!("Sitting ended after {games} games");
    }
    Ok(games)
}
