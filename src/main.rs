mod error;
mod output;
mod overview;
mod parser;
mod pipeline;
mod record;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use error::ReviewError;
use pipeline::Mode;
use settings::Settings;

#[derive(Parser)]
#[command(name = "review_scraper", about = "Steam review page extractor and CSV converter")]
struct Cli {
    /// TOML settings file (default: ./review_scraper.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull reviews out of a saved review page into block text files
    Extract {
        /// Saved review page (HTML)
        html: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Which listing the page came from
        #[arg(short, long, value_enum, default_value_t = Mode::All)]
        mode: Mode,
    },
    /// Convert a block text file into a `;`-separated CSV
    Convert {
        /// Block text file written by `extract`
        txt: PathBuf,
        /// Output CSV (default: input with .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Review tally and sales estimate for a saved review page
    Overview {
        /// Saved review page (HTML)
        html: PathBuf,
        /// Write app_data_overview.md here instead of printing it
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Steam app id, adds store and tracker links
        #[arg(long)]
        app_id: Option<u32>,
        /// Launch price, e.g. "19.99" or "$19,99"
        #[arg(long)]
        launch_price: Option<String>,
        /// Launch discount in percent
        #[arg(long)]
        launch_discount: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    let result: anyhow::Result<()> = match cli.command {
        Commands::Extract { html, out_dir, mode } => {
            println!("Extracting reviews from {}...", html.display());
            match pipeline::extract_file(&html, &out_dir, mode, &settings) {
                Ok(summary) => {
                    println!(
                        "Extracted {} reviews ({} occidental, {} oriental).",
                        summary.total, summary.occidental, summary.oriental
                    );
                    for f in &summary.files {
                        println!("  {}", f.display());
                    }
                    Ok(())
                }
                Err(ReviewError::NoReviewsFound) => {
                    println!("No reviews found in {}.", html.display());
                    return Ok(());
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Convert { txt, output } => {
            let csv = output.unwrap_or_else(|| txt.with_extension("csv"));
            match pipeline::convert_file(&txt, &csv, &settings) {
                Ok(rows) => {
                    println!("Wrote {} rows to {}", rows, csv.display());
                    Ok(())
                }
                Err(ReviewError::NoReviewsFound) => {
                    println!("No review blocks found in {}.", txt.display());
                    return Ok(());
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Overview {
            html,
            out_dir,
            app_id,
            launch_price,
            launch_discount,
        } => {
            let launch = overview::LaunchInfo {
                app_id,
                price: launch_price,
                discount: launch_discount,
            };
            let o = overview::build_overview(&html, launch, &settings)
                .with_context(|| format!("building overview for {}", html.display()))?;
            match out_dir {
                Some(dir) => {
                    let path = overview::write_overview(&dir, &o)?;
                    println!(
                        "{} reviews ({} positive, {} negative), ~{:.0} copies. Saved to {}",
                        o.tally.total,
                        o.tally.positive,
                        o.tally.negative,
                        o.estimates.copies,
                        path.display()
                    );
                }
                None => print!("{}", overview::render_markdown(&o)),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
