use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use training_context::dates::parse_reference_date;
use training_context::{
  prepare, ContextConfig, PrepareOptions, SizeReport, TrainingDataset, TrendOverview,
};

#[derive(Parser)]
#[command(name = "training-context")]
#[command(author, version, about = "Condense training history into a bounded agent context", long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Prepare an agent context from a dataset file
  Prepare {
    #[command(flatten)]
    window: WindowArgs,
    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
  },
  /// Show size reduction and trend coverage for a dataset file
  Report {
    #[command(flatten)]
    window: WindowArgs,
  },
}

#[derive(Args)]
struct WindowArgs {
  /// Dataset JSON file
  #[arg(short, long)]
  input: PathBuf,
  /// Analysis date (YYYY-MM-DD), defaults to today
  #[arg(short, long)]
  date: Option<String>,
  /// Days of full-detail activities (overrides CONTEXT_RECENT_DAYS)
  #[arg(long)]
  recent_days: Option<u32>,
  /// Days of weekly trends, measured back from the analysis date (overrides CONTEXT_TRENDS_DAYS)
  #[arg(long)]
  trends_days: Option<u32>,
}

impl WindowArgs {
  fn options(&self) -> anyhow::Result<PrepareOptions> {
    let reference_date: NaiveDate = match &self.date {
      Some(raw) => parse_reference_date(raw)?,
      None => Local::now().date_naive(),
    };
    let config = ContextConfig::from_env()?.with_overrides(self.recent_days, self.trends_days)?;
    Ok(config.options_for(reference_date))
  }

  fn load(&self) -> anyhow::Result<TrainingDataset> {
    TrainingDataset::from_path(&self.input)
      .with_context(|| format!("Failed to load dataset from {}", self.input.display()))
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Prepare { window, output, compact } => run_prepare(&window, output.as_deref(), compact),
    Commands::Report { window } => run_report(&window),
  }
}

fn run_prepare(window: &WindowArgs, output: Option<&Path>, compact: bool) -> anyhow::Result<()> {
  let options = window.options()?;
  let dataset = window.load()?;

  let json = prepare(&dataset, &options).to_json(!compact)?;

  match output {
    Some(path) => {
      fs::write(path, format!("{}\n", json))
        .with_context(|| format!("Failed to write {}", path.display()))?;
      tracing::info!(path = %path.display(), "Context written");
    }
    None => println!("{}", json),
  }
  Ok(())
}

fn run_report(window: &WindowArgs) -> anyhow::Result<()> {
  let options = window.options()?;
  let dataset = window.load()?;

  let context = prepare(&dataset, &options);
  let size = SizeReport::compare(&dataset, &context)?;
  let overview = TrendOverview::compute(&context.weekly_trends);

  println!("Context for {}", options.reference_date);
  println!(
    "  Windows:           {} days recent, {} days trends",
    options.recent_window_days, options.trends_window_days
  );
  println!("  Recent activities: {}", context.recent_activities.len());
  println!(
    "  Weekly trends:     {} weeks ({} with activity)",
    overview.total_weeks, overview.weeks_with_activity
  );
  println!();
  println!("Size");
  println!("  Raw:       {:>9} chars  ~{} tokens", size.raw_chars, size.raw_tokens);
  println!("  Prepared:  {:>9} chars  ~{} tokens", size.prepared_chars, size.prepared_tokens);
  println!("  Reduction: {:.1}%", size.reduction_pct);
  println!();
  println!("Trends");
  println!("  Avg activities/week: {:.1}", overview.avg_weekly_activities);
  println!("  Avg distance/week:   {:.1} km", overview.avg_weekly_distance_km);
  println!("  Avg duration/week:   {:.1} h", overview.avg_weekly_duration_hours);
  match &overview.peak_week {
    Some(peak) => println!(
      "  Peak week:           #{} ({}) {:.1} km",
      peak.week_number, peak.week_start, peak.total_distance_km
    ),
    None => println!("  Peak week:           -"),
  }
  if !overview.activity_types.is_empty() {
    println!("  Activity types:      {}", overview.activity_types.join(", "));
  }
  println!(
    "  History:             {:.1} months ({})",
    overview.months_of_history,
    overview.history_depth.as_str()
  );
  Ok(())
}
