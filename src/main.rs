use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};

use lunch_rotation::config::{AppConfig, ScoringWeights};
use lunch_rotation::display::{print_day_schedule, write_schedule_to_file};
use lunch_rotation::history::{DayRecord, HistoryStore};
use lunch_rotation::roster::{build_people, load_profiles, load_roster, StaffProfile};
use lunch_rotation::schedule::{generate_day, DayOptions};
use lunch_rotation::web::{self, AppState};
use lunch_rotation::{logging, RotationError};

#[derive(Parser, Debug)]
#[command(name = "lunch-rotation", about = "Lunch-rush station rotation scheduler")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Generate today's rotation from a roster file
    Generate(GenerateArgs),
    /// Serve the JSON API
    Web(WebArgs),
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Staff profiles (JSON array)
    #[arg(long)]
    staff: Option<PathBuf>,

    /// History file; falls back to $ROTATION_HISTORY, then data/history.json
    #[arg(long)]
    history: Option<PathBuf>,

    /// Scoring weights override (JSON)
    #[arg(long)]
    weights: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Today's roster (CSV with id,name,duration)
    #[arg(long)]
    roster: PathBuf,

    /// Date being scheduled (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,

    /// Id of the person who did the pre-open grill prep
    #[arg(long)]
    grill_opener: Option<String>,

    /// Run with a single griller
    #[arg(long)]
    one_griller: bool,

    /// Also write the table to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Do not record the result in history
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(clap::Args, Debug)]
struct WebArgs {
    /// Listen port; falls back to $ROTATION_PORT, then 8080
    #[arg(long)]
    port: Option<u16>,

    #[command(flatten)]
    common: CommonArgs,
}

fn build_config(common: &CommonArgs) -> Result<AppConfig, RotationError> {
    let mut config = AppConfig::default();
    if let Some(path) = &common.history {
        config.history_path = path.clone();
    }
    if let Some(path) = &common.staff {
        config.staff_path = path.clone();
    }
    if let Some(path) = &common.weights {
        config.weights = ScoringWeights::from_file(path)?;
    }
    Ok(config)
}

fn load_staff(path: &Path) -> Result<Vec<StaffProfile>, RotationError> {
    if !path.exists() {
        warn!(path = %path.display(), "staff file not found, everyone gets neutral preferences");
        return Ok(Vec::new());
    }
    load_profiles(path)
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, RotationError> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| RotationError::InvalidDate(format!("{}: {}", raw, e))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args.common)?;
    let date = parse_date(args.date.as_deref())?;

    println!("Loading roster from {}...", args.roster.display());
    let roster = load_roster(&args.roster)?;
    let profiles = load_staff(&config.staff_path)?;
    println!("Loaded {} people working today, {} staff profiles", roster.len(), profiles.len());

    let mut history = HistoryStore::open(&config.history_path).with_window(config.history_window);
    let view = history.view_for(date);

    let people = build_people(&roster, &profiles);
    let options = DayOptions {
        hazard_exempt: args.grill_opener.filter(|id| !id.is_empty()),
        reduced_risk: args.one_griller,
    };
    let schedule = generate_day(&people, &options, &view, &config.weights)?;

    let title = format!("Rotation Schedule {}", date.format("%A, %B %-d, %Y"));
    print_day_schedule(&title, &schedule);

    if let Some(output) = &args.output {
        write_schedule_to_file(&title, &schedule, output)?;
        println!("Schedule saved to {}", output.display());
    }

    if args.dry_run {
        info!("dry run, history left untouched");
        return Ok(());
    }

    let kept = history.merge(DayRecord {
        date,
        staff: roster,
        grill_opener: options.hazard_exempt,
        one_griller_only: options.reduced_risk,
        schedule: Some(schedule),
    });
    if !kept {
        println!("{} is older than the stored history window; history not updated", date);
        return Ok(());
    }
    history.save()?;
    info!(path = %config.history_path.display(), "history updated");

    Ok(())
}

async fn run_web(args: WebArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args.common)?;
    let port = args
        .port
        .or_else(|| std::env::var("ROTATION_PORT").ok().and_then(|p| p.parse::<u16>().ok()))
        .unwrap_or(8080);

    let history = HistoryStore::open(&config.history_path).with_window(config.history_window);
    let staff = load_staff(&config.staff_path)?;

    println!("Starting web server on port {}...", port);
    println!("Access the API at http://localhost:{}/api/history", port);

    web::start_server(port, AppState::new(history, staff, config.weights)).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Web(args) => run_web(args).await,
    }
}
