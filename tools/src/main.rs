//! plan-runner: headless staffing planner.
//!
//! Usage:
//!   plan-runner --seed 12345 --date 2026-10-14 --auto-fill
//!   plan-runner --config data/planner_config.json --narrative-cmd "my-llm --json"
//!   plan-runner --ipc-mode

mod backend;

use anyhow::Result;
use backend::{CommandBackend, NoBackend};
use chrono::NaiveDate;
use staffing_core::{
    command::PlannerCommand,
    config::PlannerConfig,
    daily_stats::DailyStats,
    event::PlanEvent,
    narrative::{AnalysisResult, HourSummary, NarrativeBackend},
    planner::PlannerSession,
    segment::Segment,
    variance::DayReview,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: PlannerCommand },
    Analyze,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    session_id: &'a str,
    date:       NaiveDate,
    historical: bool,
    config:     &'a PlannerConfig,
    stats:      DailyStats,
    hours:      Vec<HourSummary>,
    segments:   &'a [Segment],
    review:     Option<DayReview>,
    events:     Vec<PlanEvent>,
    analysis:   Option<AnalysisResult>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let auto_fill = args.iter().any(|a| a == "--auto-fill");
    let timeout_secs = parse_arg(&args, "--narrative-timeout", 30u64);

    let today = match arg_value(&args, "--today") {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let date = match arg_value(&args, "--date") {
        Some(raw) => parse_date(raw)?,
        None => today,
    };
    let config = match arg_value(&args, "--config") {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    let command_backend = arg_value(&args, "--narrative-cmd")
        .and_then(|cmd| CommandBackend::parse(cmd, Duration::from_secs(timeout_secs)));
    let has_backend = command_backend.is_some();
    let backend: Box<dyn NarrativeBackend> = match command_backend {
        Some(cmd) => Box::new(cmd),
        None => Box::new(NoBackend),
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    let mut session = PlannerSession::new(session_id, seed, today, config)?;
    session.select_date(date);

    if ipc_mode {
        run_ipc_loop(&mut session, backend.as_ref())?;
    } else {
        if auto_fill {
            session.auto_fill();
        }
        print_summary(&session)?;
        if has_backend {
            print_analysis(&session.analyze(backend.as_ref()));
        }
    }

    Ok(())
}

fn run_ipc_loop(session: &mut PlannerSession, backend: &dyn NarrativeBackend) -> Result<()> {
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
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => write_state(&mut stdout, session, None)?,
            IpcCommand::Analyze => {
                let analysis = session.analyze(backend);
                write_state(&mut stdout, session, Some(analysis))?;
            }
            IpcCommand::Command { command } => match session.handle(command) {
                Ok(()) => write_state(&mut stdout, session, None)?,
                Err(e) => {
                    log::warn!("command rejected: {e}");
                    write_error(&mut stdout, &e.to_string())?;
                }
            },
        }
    }
    Ok(())
}

fn write_state(
    out: &mut impl Write,
    session: &mut PlannerSession,
    analysis: Option<AnalysisResult>,
) -> Result<()> {
    let events = session.drain_events();
    for event in &events {
        log::debug!("event: {}", event.type_name());
    }
    let state = UiState {
        session_id: &session.session_id,
        date:       session.current_date(),
        historical: session.is_historical(session.current_date()),
        config:     session.config(),
        stats:      session.stats(),
        hours:      session.hourly_summary(),
        segments:   session.current_segments(),
        review:     session.review(),
        events,
        analysis,
    };
    writeln!(out, "{}", serde_json::to_string(&state)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_summary(session: &PlannerSession) -> Result<()> {
    let config = session.config();
    let stats = session.stats();
    let date = session.current_date();

    println!("=== STAFFING PLAN ===");
    println!("  session:        {}", session.session_id);
    println!("  seed:           {}", session.seed());
    println!("  date:           {date}{}", if session.is_historical(date) { " (history)" } else { "" });
    println!(
        "  hours:          {}:00-{}:00 every {} min",
        config.start_hour,
        config.end_hour,
        config.interval.minutes()
    );
    println!("  segments:       {}", session.current_segments().len());
    println!("  total sales:    ${:.0}", stats.total_sales);
    println!("  labor hours:    {:.1}", stats.total_labor_hours);
    println!("  labor cost:     ${:.2} ({:.1}% of sales)", stats.total_labor_cost, stats.labor_percentage);
    println!("  SPLH:           ${:.0} (target ${:.0})", stats.sales_per_labor_hour, config.target_sales_per_labor_hour());
    println!("  efficiency:     {:.1}% of segments on target", stats.efficiency_score);
    if config.enable_breaks {
        println!(
            "  break impact:   {:.1} hrs / ${:.2}",
            stats.break_impact_hours, stats.break_impact_cost
        );
    }

    println!();
    println!("=== BY HOUR ===");
    for hour in session.hourly_summary() {
        println!(
            "  {:>5} | sales ${:>6.0} | sched {:>3} rec {:>3} ({:+}) | {}",
            hour.hour_label,
            hour.sales,
            hour.scheduled_total(),
            hour.recommended_total(),
            hour.headcount_gap(),
            hour.status().label()
        );
    }

    if let Some(review) = session.review() {
        let daily = &review.daily;
        println!();
        println!("=== HISTORY REVIEW ===");
        println!("  sales variance: {:+.1}% ({:?})", daily.sales_variance_pct, daily.forecast_bias);
        println!("  labor variance: {:+.1}% ({:?})", daily.labor_variance_pct, daily.staffing_direction);
        println!(
            "  actual SPLH:    ${:.0} (target ${:.0})",
            daily.actual_sales_per_labor_hour, daily.target_sales_per_labor_hour
        );
        println!("  avg adherence:  {:.1}", daily.average_adherence);
    }
    Ok(())
}

fn print_analysis(analysis: &AnalysisResult) {
    println!();
    println!("=== ANALYSIS ===");
    println!("  {}", analysis.summary);
    for insight in &analysis.key_insights {
        println!("  # {insight}");
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date '{raw}' (expected YYYY-MM-DD): {e}"))
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
