//! Job Board Scraper
//!
//! Scrapes job postings from Indeed or LinkedIn search results and saves
//! them to data/jobs_<site>_<query>_<timestamp>.{json,csv} with charts in
//! data/visualizations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use job_scraper::{
    output, Fetcher, JobVisualizer, Orchestrator, OutputFormat, ScrapeConfig, Site,
};

#[derive(Parser)]
#[command(name = "job-scraper", about = "Job board scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a job board search and save the results
    Run {
        /// Job site to scrape (indeed, linkedin)
        site: String,
        /// Job search query
        query: String,
        /// Job location
        #[arg(long, default_value = "Remote")]
        location: String,
        /// Maximum number of listing pages to scrape
        #[arg(long, default_value_t = 5)]
        max_pages: usize,
        #[arg(long, value_enum, default_value = "json")]
        output_format: OutputFormat,
        /// Directory for the output file and charts
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            site,
            query,
            location,
            max_pages,
            output_format,
            data_dir,
        } => {
            let config = ScrapeConfig::default()
                .with_data_dir(data_dir)
                .with_max_pages(max_pages);
            scrape_jobs(&site, &query, &location, output_format, &config)
        }
    };

    if let Err(e) = &result {
        error!("Error scraping jobs: {:#}", e);
    }
    result
}

fn scrape_jobs(
    site: &str,
    query: &str,
    location: &str,
    format: OutputFormat,
    config: &ScrapeConfig,
) -> Result<()> {
    let site: Site = site.parse()?;
    let board = site.board()?;
    let start_url = board.search_url(query, location);

    info!(
        "Scraping jobs from {} for query: {}, location: {}",
        site, query, location
    );
    let fetcher = Fetcher::new(config).context("Failed to create HTTP client")?;
    let mut orchestrator = Orchestrator::new(fetcher, board, config);
    let jobs = orchestrator.run(&start_url);

    let path = output::output_path(&config.data_dir, &site.to_string(), query, Local::now(), format);
    output::save(&jobs, &path, format)
        .with_context(|| format!("Failed to save jobs to {:?}", path))?;

    match JobVisualizer::new(&config.visualization_dir) {
        Ok(visualizer) => {
            visualizer.generate_all(&jobs);
        }
        Err(e) => error!("Error generating visualizations: {}", e),
    }

    println!("✨ Scraping complete! {} jobs saved to {:?}", jobs.len(), path);
    Ok(())
}
