//! shift-runner: headless driver for the shift aggregation engine.
//!
//! Usage:
//!   shift-runner --source roster.json --workgroup wg-1
//!   shift-runner --synthetic 40 --seed 7 --db cache.db --now-only
//!   shift-runner --config shiftboard.json --source roster.json --ipc-mode

use anyhow::Result;
use shiftboard_core::{
    config::ShiftConfig,
    engine::{ShiftBoard, ShiftEngine},
    event::SyncLogEntry,
    remote::{AssignmentSource, JsonFileSource, StaticSource},
    roster::{generate_roster, RosterSpec},
    store::{CacheTable, ShiftStore},
};
use std::env;
use std::io::{self, BufRead, Write};

type Engine = ShiftEngine<Box<dyn AssignmentSource>>;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Board {
        #[serde(default)]
        workgroup_id: Option<String>,
        #[serde(default)]
        force: bool,
    },
    OnShiftNow {
        #[serde(default)]
        workgroup_id: Option<String>,
        #[serde(default)]
        force: bool,
    },
    SyncLog {
        #[serde(default = "default_log_limit")]
        limit: usize,
    },
    Quit,
}

fn default_log_limit() -> usize {
    20
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let synthetic = parse_arg(&args, "--synthetic", 0usize);
    let ipc_mode = has_flag(&args, "--ipc-mode");
    let force = has_flag(&args, "--force");
    let now_only = has_flag(&args, "--now-only");
    let workgroup = flag_value(&args, "--workgroup");
    let source_path = flag_value(&args, "--source");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => ShiftConfig::load(path)?,
        None => ShiftConfig::default(),
    };
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = db.to_string();
    }

    let source: Box<dyn AssignmentSource> = match (source_path, synthetic) {
        (Some(path), _) => Box::new(JsonFileSource::new(path)),
        (None, shifts) if shifts > 0 => {
            let spec = RosterSpec { shifts, ..RosterSpec::default() };
            Box::new(StaticSource::new(generate_roster(seed, spec)))
        }
        _ => anyhow::bail!("either --source <file> or --synthetic <shifts> is required"),
    };

    if !ipc_mode {
        println!("shift-runner");
        println!("  source:     {}", source.name());
        println!("  db:         {}", config.db_path);
        println!("  threshold:  {}s", config.freshness_threshold_secs);
        println!("  workgroup:  {}", workgroup.unwrap_or("(all)"));
        println!();
    }

    let engine: Engine = ShiftEngine::build(config, source)?;

    if ipc_mode {
        run_ipc_loop(&engine)?;
    } else {
        let board = if now_only {
            engine.on_shift_now(workgroup, force)
        } else {
            engine.board(workgroup, force)
        };
        print_board(&board);
        print_cache(engine.store())?;
        print_sync_log(&engine.recent_sync_log(5)?);
    }

    Ok(())
}

fn run_ipc_loop(engine: &Engine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Board { workgroup_id, force } => {
                let board = engine.board(workgroup_id.as_deref(), force);
                writeln!(stdout, "{}", serde_json::to_string(&board)?)?;
            }
            IpcCommand::OnShiftNow { workgroup_id, force } => {
                let board = engine.on_shift_now(workgroup_id.as_deref(), force);
                writeln!(stdout, "{}", serde_json::to_string(&board)?)?;
            }
            IpcCommand::SyncLog { limit } => {
                let entries = engine.recent_sync_log(limit)?;
                writeln!(stdout, "{}", serde_json::to_string(&entries)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_board(board: &ShiftBoard) {
    let last_sync = board
        .last_sync_timestamp
        .map(|at| at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| "never".into());

    println!("=== SHIFT BOARD ===");
    println!("  state:          {:?}", board.state);
    println!("  fresh data:     {}", board.is_fresh_data);
    println!("  last sync:      {last_sync}");
    println!("  records:        {}", board.metrics.total_before_grouping);
    println!("  shifts:         {}", board.metrics.total_after_grouping);
    println!("  assigned:       {}", board.metrics.total_assigned);
    println!("  clocked in:     {}", board.metrics.clocked_in_count);
    println!("  skipped:        {}", board.metrics.skipped_invalid);
    for warning in &board.warnings {
        println!("  warning:        {warning}");
    }

    println!();
    if board.groups.is_empty() {
        println!("  (No shifts)");
    }
    for group in &board.groups {
        println!(
            "  {} | {} -> {} | {}/{} clocked in",
            group.name,
            group.start_timestamp,
            group.end_timestamp,
            group.clocked_in_count(),
            group.assigned_count()
        );
        for a in group.assignments() {
            let mark = if a.clocked_in { "*" } else { " " };
            println!("      {mark} {}", a.name);
        }
    }
}

fn print_cache(store: &ShiftStore) -> Result<()> {
    println!();
    println!("=== LOCAL CACHE ===");
    println!("  assignments:    {}", store.row_count(CacheTable::Assignment)?);
    println!("  people:         {}", store.row_count(CacheTable::Person)?);
    println!("  workgroups:     {}", store.row_count(CacheTable::Workgroup)?);
    println!("  sync log:       {}", store.row_count(CacheTable::SyncLog)?);
    Ok(())
}

fn print_sync_log(entries: &[SyncLogEntry]) {
    println!();
    println!("=== RECENT SYNCS ===");
    for e in entries {
        println!("  {} | {} | {}", e.occurred_at.format("%H:%M:%S"), e.event_type, e.payload);
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
