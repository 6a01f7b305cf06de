//! Interactive terminal host for the session timer.
//!
//! Commands are read line by line from stdin. The floating timer is mirrored
//! into the terminal window title, which stays visible while the terminal
//! is in the background.

use std::io::{IsTerminal, Write};

use clap::Args;
use focuscafe_core::audio::{Cue, CuePlayer, Silent};
use focuscafe_core::events::Event;
use focuscafe_core::ledger::FOCUS_REWARD;
use focuscafe_core::timer::parse_minutes;
use focuscafe_core::projection::{format_clock, DisplayList, ExternalDisplay, Frame, SurfaceSize};
use focuscafe_core::{
    AudioError, Command, Config, Database, FocusCafe, ProjectionError, SessionMode, TimerView,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "commands: start | pause | toggle | reset | focus [min] | break [min] | pip | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes for this run (1-60)
    #[arg(long, allow_hyphen_values = true)]
    focus: Option<String>,
    /// Break length in minutes for this run (1-15)
    #[arg(long = "break", allow_hyphen_values = true)]
    break_minutes: Option<String>,
    /// Start the focus clock immediately
    #[arg(long)]
    start: bool,
}

/// Mirrors frames into the terminal title via OSC 2.
struct TitleDisplay<W: Write> {
    out: W,
    available: bool,
}

impl<W: Write> TitleDisplay<W> {
    fn write_title(&mut self, title: &str) -> Result<(), ProjectionError> {
        write!(self.out, "\x1b]2;{title}\x07")
            .and_then(|_| self.out.flush())
            .map_err(|e| ProjectionError::Refused(e.to_string()))
    }
}

impl<W: Write> ExternalDisplay for TitleDisplay<W> {
    fn is_available(&self) -> bool {
        self.available
    }

    fn open(&mut self, first: &Frame) -> Result<(), ProjectionError> {
        self.present(first)
    }

    fn present(&mut self, frame: &Frame) -> Result<(), ProjectionError> {
        let title = format!("{} {}", frame.countdown, frame.status.text());
        self.write_title(&title)
    }

    fn close(&mut self) {
        let _ = self.write_title("focuscafe");
    }
}

/// Rings the terminal bell once per cue.
struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        let rings = match cue {
            Cue::Alarm => "\x07\x07",
            Cue::Chime => "\x07",
        };
        let mut err = std::io::stderr();
        err.write_all(rings.as_bytes())
            .and_then(|_| err.flush())
            .map_err(|e| AudioError::Blocked(e.to_string()))
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    let stderr = std::io::stderr();
    let display = TitleDisplay {
        available: stderr.is_terminal(),
        out: stderr,
    };
    let cues: Box<dyn CuePlayer> = if config.notifications.enabled {
        Box::new(TerminalBell)
    } else {
        Box::new(Silent)
    };
    let surface = DisplayList::new(SurfaceSize::square(config.projection.frame_edge()));

    let mut cafe = FocusCafe::new(db, config.timer.durations(), surface, display, cues);
    if let Some(input) = args.focus.as_deref() {
        cafe.set_duration_input(SessionMode::Focus, input);
    }
    if let Some(input) = args.break_minutes.as_deref() {
        cafe.set_duration_input(SessionMode::Break, input);
    }
    if config.projection.auto_open {
        let _ = cafe.enter_projection();
    }
    cafe.subscribe(Box::new(print_event));

    if cafe.profile().needs_name() {
        println!("Welcome! Set a display name with `focuscafe profile rename <name>`.");
    } else {
        println!("Welcome back, {}.", cafe.profile().display_name());
    }
    println!("{HELP}");
    print_status(&cafe.view());

    let (tx, mut rx) = mpsc::unbounded_channel();
    if args.start {
        tx.send(Command::Start)?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        tokio::spawn(read_commands(tx));
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        cafe.run(&mut rx, shutdown).await;
    });
    // Blocking stdin reads cannot be cancelled.
    runtime.shutdown_background();
    debug!(view = ?cafe.view(), "timer loop stopped");

    println!();
    for notice in cafe.take_notices() {
        eprintln!("note: {notice}");
    }
    let profile = cafe.profile();
    println!(
        "{} focus sessions, {} coins.",
        profile.counters().focus,
        profile.coins()
    );
    Ok(())
}

async fn read_commands(tx: mpsc::UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(command) => {
                if tx.send(command).is_err() {
                    break;
                }
            }
            None => eprintln!("{HELP}"),
        }
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let arg = words.next();
    let mode_command = |mode: SessionMode| match arg {
        Some(input) => parse_minutes(input).map(|m| Command::SetDuration(mode, m)),
        None => Some(Command::SwitchMode(mode)),
    };
    match verb.as_str() {
        "s" | "start" => Some(Command::Start),
        "p" | "pause" => Some(Command::Pause),
        "t" | "toggle" => Some(Command::Toggle),
        "r" | "reset" => Some(Command::Reset),
        "f" | "focus" => mode_command(SessionMode::Focus),
        "b" | "break" => mode_command(SessionMode::Break),
        "pip" => Some(Command::ToggleProjection),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn print_event(event: &Event, view: &TimerView) {
    if let Event::SessionCompleted { completed, .. } = event {
        match completed {
            SessionMode::Focus => println!("\nFocus complete! +{FOCUS_REWARD} coins. Break is ready."),
            SessionMode::Break => println!("\nBreak over. Ready to focus."),
        }
    }
    print_status(view);
}

fn print_status(view: &TimerView) {
    let state = if view.is_running { "running" } else { "paused" };
    print!(
        "\r{:<5} {}  [{state}]  ",
        view.mode.label(),
        format_clock(view.time_left_secs)
    );
    let _ = std::io::stdout().flush();
}
