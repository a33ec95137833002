use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

use civicprep::config::Config;
use civicprep::engine::calendar::{format_date, parse_date, parse_date_time};
use civicprep::engine::compute_study_plan;
use civicprep::engine::snapshot::{SnapshotBuilder, read_snapshot, validate};
use civicprep::logging::init_logging;
use civicprep::store::json_store::JsonStore;

#[derive(Parser)]
#[command(name = "civicprep", version, about = "Daily study planner for the U.S. civics test")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show today's study plan
    Plan {
        #[arg(long, help = "Print the plan as JSON")]
        json: bool,
        #[arg(long, value_parser = parse_date_time, help = "Plan for this local time (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)")]
        now: Option<NaiveDateTime>,
        #[arg(long, help = "Read a StudyPlanInput snapshot from a JSON file instead of saved progress")]
        input: Option<PathBuf>,
    },
    /// Record an answer to a practice question
    Answer {
        question_id: String,
        #[arg(short, long)]
        category: String,
        #[arg(long, conflicts_with = "wrong", required_unless_present = "wrong")]
        correct: bool,
        #[arg(long)]
        wrong: bool,
        #[arg(long, value_parser = parse_date, help = "Date answered (defaults to today)")]
        on: Option<NaiveDate>,
    },
    /// Record a mock test result
    Mock {
        #[arg(long)]
        correct: u32,
        #[arg(long)]
        total: u32,
        #[arg(long, value_parser = parse_date, help = "Date taken (defaults to today)")]
        on: Option<NaiveDate>,
    },
    /// Set the test date (YYYY-MM-DD), or clear it with "none"
    TestDate { date: String },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("ignoring unreadable config {}: {e}", Config::config_path().display());
        Config::default()
    });
    init_logging(&config.log_level);

    match cli.command {
        Command::Plan { json, now, input } => {
            let input = match input {
                Some(path) => read_snapshot(&path, now)?,
                None => {
                    let store = JsonStore::new()?;
                    let progress = store.load_progress_or_default();
                    let now = now.unwrap_or_else(|| Local::now().naive_local());
                    SnapshotBuilder::new(&progress, &config).build(now)
                }
            };
            validate(&input)?;
            let plan = compute_study_plan(&input);
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("{plan}");
            }
        }
        Command::Answer {
            question_id,
            category,
            correct,
            on,
            ..
        } => {
            if category.trim().is_empty() {
                bail!("category must not be empty");
            }
            let store = JsonStore::new()?;
            let mut progress = store.load_progress_or_default();
            let on = on.unwrap_or_else(|| Local::now().date_naive());
            progress.record_answer(&question_id, &category, correct, on);
            store.save_progress(&progress)?;
            let card = &progress.review_queue[&question_id];
            tracing::info!(
                question_id = %question_id,
                category = %category,
                correct,
                due = %card.due,
                "recorded answer"
            );
            println!("Next review of {question_id}: {}", format_date(card.due));
        }
        Command::Mock { correct, total, on } => {
            let store = JsonStore::new()?;
            let mut progress = store.load_progress_or_default();
            let on = on.unwrap_or_else(|| Local::now().date_naive());
            let score = progress.record_mock_test(on, correct, total)?.score_percent();
            store.save_progress(&progress)?;
            tracing::info!(correct, total, taken_on = %on, "recorded mock test");
            println!("Mock test on {}: {correct}/{total} ({score:.0}%)", format_date(on));
        }
        Command::TestDate { date } => {
            // reload strictly: never save defaults over a file that failed to parse
            let mut config = Config::load()?;
            config.test_date = if date.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_date(&date)?)
            };
            config.save()?;
            match config.test_date {
                Some(d) => println!("Test date set to {}", format_date(d)),
                None => println!("Test date cleared"),
            }
        }
        Command::Config => {
            println!("# {}", Config::config_path().display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
