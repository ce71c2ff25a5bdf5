mod controls;
mod terminal;

use clap::{Parser, Subcommand};
use controls::Control;
use interval_core::*;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use terminal::TerminalDisplay;

#[derive(Parser)]
#[command(name = "intervals")]
#[command(about = "Interval workout timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved presets (default)
    List,

    /// Show the expanded schedule of a preset
    Show {
        /// Preset id
        id: String,
    },

    /// Add a new preset
    Add {
        /// Preset name
        #[arg(long)]
        name: String,

        /// Set as KIND:DURATION, e.g. work:20 or rest:1m (repeatable, in order)
        #[arg(long = "set", required = true, value_parser = parse_set)]
        sets: Vec<SetSpec>,

        /// Number of repetitions
        #[arg(long, default_value_t = 1)]
        reps: u32,

        /// Long break after the last repetition, e.g. 90, 30s or 5m
        #[arg(long = "break", value_parser = parse_duration, default_value = "0")]
        break_duration: u64,
    },

    /// Change an existing preset
    Update {
        /// Preset id
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Replacement sets as KIND:DURATION (repeatable, in order)
        #[arg(long = "set", value_parser = parse_set)]
        sets: Vec<SetSpec>,

        #[arg(long)]
        reps: Option<u32>,

        #[arg(long = "break", value_parser = parse_duration)]
        break_duration: Option<u64>,
    },

    /// Delete a preset
    Delete {
        /// Preset id
        id: String,
    },

    /// Run a preset. While running, type p (or just Enter) to pause or
    /// resume, r to reset, q to quit.
    Run {
        /// Preset id
        id: String,

        /// Milliseconds between display refreshes
        #[arg(long)]
        frame_ms: Option<u64>,

        /// Run in virtual time, finishing immediately (for testing)
        #[arg(long)]
        simulate: bool,

        /// Don't ring the terminal bell
        #[arg(long)]
        no_bell: bool,
    },
}

fn main() -> Result<()> {
    // Keep the timer display free of log lines unless asked for
    interval_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store = JsonPresetStore::new(interval_core::config::presets_path(&data_dir));

    match cli.command {
        Some(Commands::List) | None => cmd_list(&store),
        Some(Commands::Show { id }) => cmd_show(&store, &id),
        Some(Commands::Add {
            name,
            sets,
            reps,
            break_duration,
        }) => cmd_add(&store, name, sets, reps, break_duration),
        Some(Commands::Update {
            id,
            name,
            sets,
            reps,
            break_duration,
        }) => cmd_update(&store, &id, name, sets, reps, break_duration),
        Some(Commands::Delete { id }) => cmd_delete(&store, &id),
        Some(Commands::Run {
            id,
            frame_ms,
            simulate,
            no_bell,
        }) => {
            let frame_ms = frame_ms.unwrap_or(config.timer.frame_interval_ms);
            let bell = config.cues.bell && !no_bell;
            cmd_run(&store, &id, frame_ms, simulate, bell)
        }
    }
}

fn cmd_list(store: &impl PresetStore) -> Result<()> {
    let presets = store.load()?;
    if presets.is_empty() {
        println!("No presets. Add one with `intervals add`.");
        return Ok(());
    }

    for preset in &presets {
        println!("{}", summary_line(preset));
    }
    Ok(())
}

fn cmd_show(store: &impl PresetStore, id: &str) -> Result<()> {
    let preset = store.get(id)?;
    let schedule = build_schedule(&preset);

    println!("{}", summary_line(&preset));
    println!();
    for (i, step) in schedule.iter().enumerate() {
        let rep = if step.is_long_break() {
            String::new()
        } else {
            format!("rep {}/{}", step.rep_index, step.total_reps)
        };
        println!(
            "  {:>3}. {:<10} {:>6}  {}",
            i + 1,
            step.kind.label(),
            format_clock(i64::try_from(step.duration).unwrap_or(i64::MAX)),
            rep
        );
    }
    Ok(())
}

fn cmd_add(
    store: &impl PresetStore,
    name: String,
    sets: Vec<SetSpec>,
    reps: u32,
    break_duration: u64,
) -> Result<()> {
    let preset = Preset {
        id: Preset::new_id(),
        name,
        sets,
        repetitions: reps,
        break_duration,
    };
    let id = preset.id.clone();
    store.add(preset)?;

    println!("✓ Added preset {}", id);
    Ok(())
}

fn cmd_update(
    store: &impl PresetStore,
    id: &str,
    name: Option<String>,
    sets: Vec<SetSpec>,
    reps: Option<u32>,
    break_duration: Option<u64>,
) -> Result<()> {
    let mut preset = store.get(id)?;
    if let Some(name) = name {
        preset.name = name;
    }
    if !sets.is_empty() {
        preset.sets = sets;
    }
    if let Some(reps) = reps {
        preset.repetitions = reps;
    }
    if let Some(break_duration) = break_duration {
        preset.break_duration = break_duration;
    }

    store.update(preset)?;
    println!("✓ Updated preset {}", id);
    Ok(())
}

fn cmd_delete(store: &impl PresetStore, id: &str) -> Result<()> {
    let preset = store.get(id)?;
    store.delete(id)?;
    println!("✓ Deleted preset {} ({})", id, preset.name);
    Ok(())
}

fn cmd_run(
    store: &impl PresetStore,
    id: &str,
    frame_ms: u64,
    simulate: bool,
    bell: bool,
) -> Result<()> {
    if frame_ms == 0 {
        return Err(Error::Config("frame interval must be greater than zero".into()));
    }

    let mut session = Session::load(store)?;
    let preset = session.select(id)?.clone();
    preset.validate()?;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", preset.name);
    println!("╰─────────────────────────────────────────╯");
    println!(
        "  {} steps x {} reps • Total: {}\n",
        preset.sets.len(),
        preset.repetitions,
        format_clock(i64::try_from(preset.total_duration_secs()).unwrap_or(i64::MAX))
    );

    let display = TerminalDisplay::stdout(bell);
    let step_changes = if simulate {
        let clock = ManualClock::new();
        let mut timer = IntervalTimer::new(display, clock.clone(), FrameQueue::new());
        timer.start(&preset);
        loop {
            clock.advance(frame_ms);
            if !timer.pump() {
                break;
            }
        }
        timer.listener().step_changes()
    } else {
        println!("  {}\n", controls::HELP);
        let input = controls::spawn_reader(io::BufReader::new(io::stdin()));
        let frames = PacedFrames::new(Duration::from_millis(frame_ms));
        let mut timer = IntervalTimer::new(display, MonotonicClock::new(), frames);
        timer.start(&preset);
        run_interactive(&mut timer, &preset, &input);
        timer.listener().step_changes()
    };

    tracing::info!("Run of {} finished after {} step changes", id, step_changes);
    Ok(())
}

/// Pump frames until the run completes, handling controls in between.
///
/// While paused or reset no frame is outstanding, so this blocks on the
/// controls instead. Closing the input at that point ends the run.
fn run_interactive<C, F>(
    timer: &mut IntervalTimer<TerminalDisplay<io::Stdout>, C, F>,
    preset: &Preset,
    input: &Receiver<Control>,
) where
    C: Clock,
    F: FrameScheduler,
{
    while !timer.listener().is_complete() {
        let control = if timer.state() == TimerState::Running {
            match input.try_recv() {
                Ok(control) => control,
                Err(_) => {
                    timer.pump();
                    continue;
                }
            }
        } else {
            match input.recv() {
                Ok(control) => control,
                Err(_) => Control::Quit,
            }
        };

        if !controls::apply(timer, preset, control) {
            timer.listener_mut().notice("■ Stopped");
            tracing::info!("Run of {} stopped at step {}", preset.id, timer.current_index());
            return;
        }

        let notice = match (control, timer.state()) {
            (Control::Reset, _) => "↺ Reset. p to start again, q to quit",
            (_, TimerState::Paused) => "⏸ Paused",
            (_, TimerState::Running) => "▶ Running",
            (_, TimerState::Stopped) => continue,
        };
        timer.listener_mut().notice(notice);
    }
}

fn summary_line(preset: &Preset) -> String {
    format!(
        "{:<14} {:<20} {} steps x {} reps • Total: {}",
        preset.id,
        preset.name,
        preset.sets.len(),
        preset.repetitions,
        format_clock(i64::try_from(preset.total_duration_secs()).unwrap_or(i64::MAX))
    )
}

/// Parse `work:20`, `rest:30s` or `work:2m`
fn parse_set(s: &str) -> std::result::Result<SetSpec, String> {
    let (kind, duration) = s
        .split_once(':')
        .ok_or_else(|| format!("expected KIND:DURATION, got '{}'", s))?;
    let kind = match kind.trim().to_lowercase().as_str() {
        "work" => SetKind::Work,
        "rest" => SetKind::Rest,
        other => return Err(format!("unknown set kind '{}' (use work or rest)", other)),
    };
    let duration = parse_duration(duration)?;
    if duration == 0 {
        return Err("set duration must be greater than zero".into());
    }
    Ok(SetSpec { kind, duration })
}

/// Parse seconds as `90`, `90s` or `5m`
fn parse_duration(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let (digits, multiplier) = if let Some(mins) = s.strip_suffix('m') {
        (mins, 60)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1)
    } else {
        (s, 1)
    };
    let n = digits
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid duration '{}': {}", s, e))?;
    n.checked_mul(multiplier)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}
