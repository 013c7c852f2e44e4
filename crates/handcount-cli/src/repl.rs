use handcount_core::clock::driver::ClockDriver;
use handcount_core::game::match_state::Phase;
use handcount_core::gate::ConfirmAction;
use handcount_core::model::round::{ScoringProgress, parse_held_points};
use handcount_core::model::settings::format_clock;
use handcount_core::signal::{Signal, SignalSink};
use handcount_core::{Alert, FinalStandings, Session, ValidationError};
use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub const HELP: &str = "\
commands:
  players N        set the player count (2-4) during setup
  time             cycle the turn time limit during setup
  names [A B ..]   seat the players and start the match (no names: reuse the last ones)
  first N          choose who opens the round (1-based)
  go               start the round
  back             step back: to setup, to first player selection, or out of scoring
  timer            start the current player's clock
  pass             end the current turn by hand
  end              end the round (asks to confirm)
  yes | no         answer the pending question
  score [N]        enter points held by the player being scored (blank is 0)
  cancel           drop the scores entered so far
  next             start the next round
  finish           finish the match (asks to confirm)
  again            restart with the same players
  new              restart with new players
  status           show the table
  help             show this list
  quit             leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Table(TableCommand),
    Timer,
    Status,
    Help,
    Quit,
}

/// Commands that only touch the session and never the clock driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    Players(usize),
    Time,
    Names(Vec<String>),
    First(usize),
    Go,
    Back,
    Pass,
    End,
    Yes,
    No,
    Score(String),
    Cancel,
    Next,
    Finish,
    Again,
    New,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseCommandError::Empty)?;
        let rest: Vec<&str> = words.collect();
        let keyword = head.to_ascii_lowercase();
        let table = match keyword.as_str() {
            "timer" => return Ok(Command::Timer),
            "status" => return Ok(Command::Status),
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" => return Ok(Command::Quit),
            "players" => {
                TableCommand::Players(single_number(&rest, "players", "a count from 2 to 4")?)
            }
            "time" => TableCommand::Time,
            "names" => TableCommand::Names(rest.iter().map(|s| s.to_string()).collect()),
            "first" => {
                let seat: usize = single_number(&rest, "first", "a player number")?;
                if seat == 0 {
                    return Err(ParseCommandError::BadArgument {
                        command: "first",
                        expected: "a player number starting at 1",
                    });
                }
                TableCommand::First(seat - 1)
            }
            "go" => TableCommand::Go,
            "back" => TableCommand::Back,
            "pass" => TableCommand::Pass,
            "end" => TableCommand::End,
            "yes" | "y" => TableCommand::Yes,
            "no" | "n" => TableCommand::No,
            "score" => TableCommand::Score(rest.join(" ")),
            "cancel" => TableCommand::Cancel,
            "next" => TableCommand::Next,
            "finish" => TableCommand::Finish,
            "again" => TableCommand::Again,
            "new" => TableCommand::New,
            _ => return Err(ParseCommandError::Unknown(head.to_string())),
        };
        Ok(Command::Table(table))
    }
}

fn single_number(
    rest: &[&str],
    command: &'static str,
    expected: &'static str,
) -> Result<usize, ParseCommandError> {
    match rest {
        [value] => value
            .parse()
            .map_err(|_| ParseCommandError::BadArgument { command, expected }),
        _ => Err(ParseCommandError::BadArgument { command, expected }),
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseCommandError),
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("no names to reuse; give one name per player")]
    NoNamesToReuse,
    #[error("nothing is waiting for confirmation")]
    NothingPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Line-driven front-end over a shared session and its clock driver.
pub struct Repl<S> {
    driver: ClockDriver<S>,
}

impl<S: SignalSink + Send + 'static> Repl<S> {
    pub fn new(driver: ClockDriver<S>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &ClockDriver<S> {
        &self.driver
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        debug!(target: "handcount_cli::repl", ?command, "executing");
        let text = match command {
            Command::Quit => {
                self.driver.stop();
                return Ok(Reply::Quit);
            }
            Command::Help => HELP.to_string(),
            Command::Status => self.render_status(),
            Command::Timer => {
                let ticker = self.driver.start_turn()?;
                debug!(
                    target: "handcount_cli::repl",
                    epoch = ticker.epoch().value(),
                    "ticker started"
                );
                let session = self.driver.session().lock();
                format!(
                    "clock running for {}: {}",
                    session.state().roster().name(session.state().current_player()),
                    format_clock(session.state().time_remaining())
                )
            }
            Command::Table(table) => {
                let mut session = self.driver.session().lock();
                apply(&mut session, table)?
            }
        };
        Ok(Reply::Text(text))
    }

    pub fn render_status(&self) -> String {
        let session = self.driver.session().lock();
        render_status(&session)
    }

    /// Reads commands until `quit` or end of input, writing replies to `out`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> std::io::Result<()> {
        writeln!(out, "{}", self.render_status())?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let outcome = line
                .parse::<Command>()
                .map_err(CommandError::from)
                .and_then(|command| self.execute(command));
            match outcome {
                Ok(Reply::Text(text)) => writeln!(out, "{text}")?,
                Ok(Reply::Quit) => return Ok(()),
                Err(err) => writeln!(out, "error: {err}")?,
            }
            out.flush()?;
        }
        self.driver.stop();
        Ok(())
    }
}

fn apply<S: SignalSink>(
    session: &mut Session<S>,
    command: TableCommand,
) -> Result<String, CommandError> {
    let text = match command {
        TableCommand::Players(count) => {
            session.state_mut().set_player_count(count)?;
            format!("{count} players")
        }
        TableCommand::Time => {
            let limit = session.state_mut().cycle_time_limit()?;
            format!("time limit: {}", limit.label())
        }
        TableCommand::Names(mut names) => {
            if names.is_empty() {
                names = session
                    .state()
                    .players()
                    .iter()
                    .map(|p| p.name.clone())
                    .collect();
            }
            if names.is_empty() {
                return Err(CommandError::NoNamesToReuse);
            }
            session.state_mut().initialize_match(&names)?;
            format!("seated {}; choose who goes first", names.join(", "))
        }
        TableCommand::First(index) => {
            let seat = session.state_mut().select_first_player(index)?;
            format!("{} opens the round", session.state().roster().name(seat))
        }
        TableCommand::Go => {
            session.state_mut().start_round()?;
            render_status(session)
        }
        TableCommand::Back => match session.state().phase() {
            Phase::FirstPlayerSelect => {
                session.state_mut().return_to_setup()?;
                let names: Vec<&str> = session
                    .state()
                    .players()
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                format!(
                    "back to setup; 'names' alone re-seats {}",
                    names.join(", ")
                )
            }
            Phase::Scoring => {
                session.state_mut().abandon_scoring()?;
                "scores discarded".to_string()
            }
            _ => {
                session.state_mut().return_to_first_player_select()?;
                "choose who goes first".to_string()
            }
        },
        TableCommand::Pass => {
            let seat = session.advance_turn()?;
            format!("{} to play", session.state().roster().name(seat))
        }
        TableCommand::End => session.request(ConfirmAction::EndRound)?.to_string(),
        TableCommand::Finish => session.request(ConfirmAction::FinishMatch)?.to_string(),
        TableCommand::Yes => match session.confirm()? {
            Some(ConfirmAction::EndRound) => scoring_prompt(session),
            Some(ConfirmAction::FinishMatch) => render_standings(session),
            None => return Err(CommandError::NothingPending),
        },
        TableCommand::No => match session.decline() {
            Some(_) => "cancelled".to_string(),
            None => return Err(CommandError::NothingPending),
        },
        TableCommand::Score(raw) => {
            let held = parse_held_points(&raw)?;
            let cursor = session.state().scoring_cursor();
            match session.submit_score(cursor, i64::from(held))? {
                ScoringProgress::Next(_) => scoring_prompt(session),
                ScoringProgress::Complete(_) => render_scoreboard(session),
            }
        }
        TableCommand::Cancel => {
            session.state_mut().abandon_scoring()?;
            "scores discarded".to_string()
        }
        TableCommand::Next => {
            session.state_mut().start_next_round()?;
            "choose who goes first".to_string()
        }
        TableCommand::Again => {
            session.restart_same_players()?;
            "scores cleared; choose who goes first".to_string()
        }
        TableCommand::New => {
            session.restart_new_players();
            "back to setup".to_string()
        }
    };
    Ok(text)
}

fn scoring_prompt<S: SignalSink>(session: &Session<S>) -> String {
    let state = session.state();
    let seat = state.roster().seats().nth(state.scoring_cursor());
    match seat {
        Some(seat) => format!("points held by {}?", state.roster().name(seat)),
        None => String::new(),
    }
}

pub fn render_status<S: SignalSink>(session: &Session<S>) -> String {
    let state = session.state();
    let mut out = String::new();
    let _ = write!(out, "[{}]", state.phase());
    match state.phase() {
        Phase::Setup => {
            let settings = state.settings();
            let _ = write!(
                out,
                " {} players, {} per turn",
                settings.player_count.get(),
                settings.time_limit.label()
            );
        }
        Phase::FirstPlayerSelect => {
            for (number, player) in state.players().iter().enumerate() {
                let _ = write!(out, "\n  {}. {}", number + 1, player.name);
            }
        }
        Phase::Turn => {
            let marker = match state.clock().alert() {
                Alert::None => "",
                Alert::Warning => " (warning)",
                Alert::Danger => " (danger)",
            };
            let _ = write!(
                out,
                " {} to play, {}{}",
                state.roster().name(state.current_player()),
                format_clock(state.time_remaining()),
                marker
            );
        }
        Phase::Scoring => {
            out.push(' ');
            out.push_str(&scoring_prompt(session));
        }
        Phase::Scoreboard => {
            out.push('\n');
            out.push_str(&render_scoreboard(session));
        }
        Phase::Result => {
            out.push('\n');
            out.push_str(&render_standings(session));
        }
    }
    if let Some(action) = session.pending_confirmation() {
        let _ = write!(out, "\n  {} (yes/no)", action.prompt());
    }
    out
}

pub fn render_scoreboard<S: SignalSink>(session: &Session<S>) -> String {
    let state = session.state();
    let mut out = String::from("round");
    for player in state.players() {
        let _ = write!(out, " | {:>8}", player.name);
    }
    for (number, round) in state.rounds().iter().enumerate() {
        let _ = write!(out, "\n{:>5}", number + 1);
        for delta in round.deltas() {
            let _ = write!(out, " | {delta:>8}");
        }
    }
    out.push_str("\ntotal");
    for total in state.scores().standings() {
        let _ = write!(out, " | {total:>8}");
    }
    out
}

pub fn render_standings<S: SignalSink>(session: &Session<S>) -> String {
    let Some(standings) = FinalStandings::capture(session.state()) else {
        return String::new();
    };
    let mut out = format!(
        "winner: {} with {}",
        standings.winner.name, standings.winner.score
    );
    for entry in &standings.others {
        let _ = write!(out, "\n  {}: {}", entry.name, entry.score);
    }
    out
}

/// One-line description of a clock or match signal, with the cue to play.
pub fn describe_signal(signal: Signal) -> String {
    let text = match signal {
        Signal::WarningThresholdReached { remaining } => {
            format!("{} left", format_clock(remaining))
        }
        Signal::DangerThresholdReached { remaining } => format!("{remaining}..."),
        Signal::TimerExpired => "time is up".to_string(),
        Signal::RoundComplete { round_number } => format!("round {round_number} recorded"),
        Signal::MatchReadyForResult => "match finished".to_string(),
    };
    match signal.cue() {
        Some(cue) => {
            let tone = cue.tone();
            format!("{text} [beep {}Hz {}ms]", tone.frequency_hz, tone.duration_ms)
        }
        None => text,
    }
}
