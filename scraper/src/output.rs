use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use common::JobRecord;
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// `<data_dir>/jobs_<site>_<query>_<YYYYmmdd_HHMMSS>.<ext>`
pub fn output_path(
    data_dir: &Path,
    site: &str,
    query: &str,
    timestamp: DateTime<Local>,
    format: OutputFormat,
) -> PathBuf {
    let query: String = query
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    data_dir.join(format!(
        "jobs_{}_{}_{}.{}",
        site,
        query,
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

pub fn save(records: &[JobRecord], path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => save_to_json(records, path),
        OutputFormat::Csv => save_to_csv(records, path),
    }
}

pub fn save_to_json(records: &[JobRecord], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    info!("Saved {} jobs to {:?}", records.len(), path);
    Ok(())
}

pub fn save_to_csv(records: &[JobRecord], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("Saved {} jobs to {:?}", records.len(), path);
    Ok(())
}

pub fn load_json(path: &Path) -> Result<Vec<JobRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// The serializer only emits a header alongside the first row.
const CSV_HEADER: [&str; 9] = [
    "title",
    "company",
    "location",
    "description",
    "posted_date",
    "job_type",
    "salary",
    "url",
    "scraped_at",
];

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            info!("Created {:?}", parent);
        }
    }
    Ok(())
}
