//! Colorful console output for solver progress.
//!
//! A `tracing` layer that renders the structured events of
//! `planforge_solver` as colored lines.

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_DIRECTIVE: &str = "planforge_solver=info";

/// Installs the console subscriber.
///
/// Only the first call has effect. `RUST_LOG` directives are honored on top
/// of `planforge_solver=info`. If another global subscriber is already
/// installed, this one is silently skipped.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
            filter = filter.add_directive(directive);
        }
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let version_line = format!("PlanForge v{} - local search planning engine", env!("CARGO_PKG_VERSION"));
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", version_line.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
#[derive(Debug, Default)]
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("planforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        if let Some(line) = format_solver_event(&visitor) {
            let _ = writeln!(io::stdout(), "{line}");
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    phase_index: Option<u64>,
    phases: Option<u64>,
    duration_ms: Option<u64>,
    steps: Option<u64>,
    calculations: Option<u64>,
    speed: Option<u64>,
    move_threads: Option<u64>,
    terminated_early: Option<bool>,
    score: Option<String>,
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        match field.name() {
            "event" => self.event = Some(value),
            "phase" => self.phase = Some(value),
            "score" => self.score = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_text(field, format!("{value:?}").trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "phases" => self.phases = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "steps" => self.steps = Some(value),
            "calculations" => self.calculations = Some(value),
            "speed" => self.speed = Some(value),
            "move_threads" => self.move_threads = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }
}

fn format_solver_event(v: &EventVisitor) -> Option<String> {
    match v.event.as_deref()? {
        "solve_start" => Some(format_solve_start(v)),
        "phase_start" => Some(format_phase_start(v)),
        "phase_end" => Some(format_phase_end(v)),
        "solve_end" => Some(format_solve_end(v)),
        _ => None,
    }
}

fn prefix(scope: &str) -> String {
    format!(
        "{} {} {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{scope}]").bright_cyan()
    )
}

fn format_solve_start(v: &EventVisitor) -> String {
    format!(
        "{} Solving started: phases ({}), starting score ({})",
        prefix("Solver"),
        v.phases.unwrap_or(0).to_string().yellow(),
        format_score(v.score.as_deref().unwrap_or("N/A"))
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    let threads = match v.move_threads {
        Some(count) if count > 0 => format!(", move threads ({})", count.to_string().yellow()),
        _ => String::new(),
    };
    format!(
        "{} {} phase ({}) started{threads}",
        prefix(phase),
        phase.white().bold(),
        v.phase_index.unwrap_or(0).to_string().yellow()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    format!(
        "{} {} phase ({}) ended: time spent ({}), best score ({}), score calculation speed ({}/sec), step total ({})",
        prefix(phase),
        phase.white().bold(),
        v.phase_index.unwrap_or(0).to_string().yellow(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_score(v.score.as_deref().unwrap_or("N/A")),
        v.speed.unwrap_or(0).to_formatted_string(&Locale::en).bright_magenta().bold(),
        v.steps.unwrap_or(0).to_formatted_string(&Locale::en).white()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let how = if v.terminated_early.unwrap_or(false) {
        "terminated early".bright_yellow().to_string()
    } else {
        "ended".to_string()
    };
    format!(
        "{} Solving {how}: time spent ({}), best score ({}), score calculations ({}), step total ({})",
        prefix("Solver"),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_score(v.score.as_deref().unwrap_or("N/A")),
        v.calculations.unwrap_or(0).to_formatted_string(&Locale::en).bright_magenta(),
        v.steps.unwrap_or(0).to_formatted_string(&Locale::en).white()
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{:5}.{:03}", d.as_secs() % 100_000, d.subsec_millis()))
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

/// Colors each level of a score by its sign: `-2hard/5soft`, `-7`.
fn format_score(score: &str) -> String {
    score
        .split('/')
        .map(|level| {
            let number: String = level
                .chars()
                .take_while(|c| *c == '-' || *c == '.' || c.is_ascii_digit())
                .collect();
            let value: f64 = number.parse().unwrap_or(0.0);
            if value < 0.0 && level.ends_with("hard") {
                level.bright_red().to_string()
            } else if value < 0.0 {
                level.yellow().to_string()
            } else if value > 0.0 {
                level.bright_green().to_string()
            } else {
                level.white().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
