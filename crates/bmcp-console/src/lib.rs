//! Colorful console output for BMCP solver events.
//!
//! Provides a custom `tracing` layer that formats solver events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end, construction, star improvements)
//! - **DEBUG**: Outer iterations and every CC search / deep optimize run
//! - **TRACE**: Individual add/drop decisions

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing. `RUST_LOG` overrides the default
/// `bmcp_solver=info` directive.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bmcp_solver=info"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ____  __  __  ____ ____
| __ )|  \/  |/ ___|  _ \
|  _ \| |\/| | |   | |_) |
| |_) | |  | | |___|  __/
|____/|_|  |_|\____|_|
"#;

    let version_line = format!("   v{} - Budgeted Maximum Coverage Solver\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        // Accept events from solver modules
        if !target.starts_with("bmcp_solver") && !target.starts_with("bmcp::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = *metadata.level();
        let output = format_event(&visitor, level);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    action: Option<String>,
    steps: Option<u64>,
    speed: Option<u64>,
    score: Option<i64>,
    weight: Option<i64>,
    capacity: Option<i64>,
    step: Option<u64>,
    item: Option<u64>,
    size: Option<u64>,
    iteration: Option<u64>,
    iterations: Option<u64>,
    duration_ms: Option<u64>,
    elapsed_ms: Option<u64>,
    item_count: Option<u64>,
    element_count: Option<u64>,
    edge_count: Option<u64>,
    time_limit_ms: Option<u64>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "phase" => self.phase = Some(s.trim_matches('"').to_string()),
            "action" => self.action = Some(s.trim_matches('"').to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "steps" => self.steps = Some(value),
            "speed" => self.speed = Some(value),
            "step" => self.step = Some(value),
            "item" => self.item = Some(value),
            "size" => self.size = Some(value),
            "iteration" => self.iteration = Some(value),
            "iterations" => self.iterations = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            "item_count" => self.item_count = Some(value),
            "element_count" => self.element_count = Some(value),
            "edge_count" => self.edge_count = Some(value),
            "time_limit_ms" => self.time_limit_ms = Some(value),
            "score" | "weight" | "capacity" => self.record_i64(field, value as i64),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "score" => self.score = Some(value),
            "weight" => self.weight = Some(value),
            "capacity" => self.capacity = Some(value),
            // phase-local steps are signed
            _ => self.record_u64(field, value.max(0) as u64),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "action" => self.action = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "progress" => format_progress(v),
        "iteration" => format_iteration(v),
        "step" => format_step(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let items = v.item_count.unwrap_or(0);
    let elements = v.element_count.unwrap_or(0);
    let edges = v.edge_count.unwrap_or(0);
    let capacity = v.capacity.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving │ {} items │ {} elements │ {} edges │ capacity {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        items.to_formatted_string(&Locale::en).bright_yellow(),
        elements.to_formatted_string(&Locale::en).bright_yellow(),
        edges.to_formatted_string(&Locale::en).bright_yellow(),
        capacity.to_formatted_string(&Locale::en).bright_yellow(),
    );

    if let Some(limit) = v.time_limit_ms {
        output.push_str(&format!(
            " │ {} limit",
            format_duration_ms(limit).bright_yellow()
        ));
    }

    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let profit = v.score.unwrap_or(0);
    let weight = v.weight.unwrap_or(0);
    let size = v.size.unwrap_or(0);
    let iterations = v.iterations.unwrap_or(0);

    let status = if v.terminated_early.unwrap_or(false) {
        "TERMINATED EARLY".bright_yellow().bold().to_string()
    } else {
        "TIME LIMIT".bright_green().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} iterations │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        iterations.to_formatted_string(&Locale::en).white(),
        status
    );

    // Summary box
    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let title = "BEST FEASIBLE SOLUTION";
    let inner_width: usize = 58;
    let total_pad = inner_width.saturating_sub(title.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        title.bright_green().bold(),
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(
        &"╠══════════════════════════════════════════════════════════╣"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    for (label, value) in [
        ("Profit:", profit.to_formatted_string(&Locale::en)),
        ("Weight:", weight.to_formatted_string(&Locale::en)),
        ("Items:", size.to_formatted_string(&Locale::en)),
    ] {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");

    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let steps = v.steps.unwrap_or(0);
    let speed = v.speed.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} {} ended │ {} │ {} steps │ {} toggles/s",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(duration).yellow(),
        steps.to_formatted_string(&Locale::en).white(),
        speed.to_formatted_string(&Locale::en).bright_magenta().bold(),
    );

    if let Some(profit) = v.score {
        output.push_str(&format!(" │ {}", format_profit(profit)));
    }

    output
}

fn format_progress(v: &EventVisitor) -> String {
    let iteration = v.iteration.unwrap_or(0);
    let profit = v.score.unwrap_or(0);

    let mut output = format!(
        "{} {} iteration {:>8} │ {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        iteration.to_formatted_string(&Locale::en).white(),
        format_profit(profit)
    );

    if let Some(weight) = v.weight {
        output.push_str(&format!(
            " │ weight {}",
            weight.to_formatted_string(&Locale::en).white()
        ));
    }

    output
}

fn format_iteration(v: &EventVisitor) -> String {
    let iteration = v.iteration.unwrap_or(0);
    let profit = v.score.unwrap_or(0);

    format!(
        "{} {} Iteration {:>8} │ star {}",
        format_elapsed(),
        "↻".bright_blue(),
        iteration.to_formatted_string(&Locale::en).bright_black(),
        format_profit(profit)
    )
}

fn format_step(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let step = v.step.unwrap_or(0);
    let item = v.item.unwrap_or(0);
    let action = v.action.as_deref().unwrap_or("add");

    let icon = match action {
        "drop" | "evict" => "−".bright_red().to_string(),
        "block" => "■".bright_yellow().to_string(),
        _ => "+".bright_green().to_string(),
    };

    format!(
        "{} {} Step {:>10} │ Item {:>6} │ {}",
        format_elapsed(),
        icon,
        step.to_formatted_string(&Locale::en).bright_black(),
        item.to_formatted_string(&Locale::en).bright_black(),
        action.bright_black()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_profit(profit: i64) -> String {
    let text = format!("profit {}", profit.to_formatted_string(&Locale::en));
    if profit > 0 {
        text.bright_green().to_string()
    } else {
        text.white().to_string()
    }
}
