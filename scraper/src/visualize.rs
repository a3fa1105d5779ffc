//! PNG charts summarizing a scrape run.
//!
//! Every chart is best-effort: a chart with nothing to show is skipped, and a
//! chart that fails to render is logged without stopping the others.

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::Local;
use common::JobRecord;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use regex::Regex;
use tracing::{error, info};

use crate::error::{Result, ScraperError};

type DrawResult<T> = std::result::Result<T, Box<dyn Error>>;

const TOP_N: usize = 10;
const CLOUD_MAX_WORDS: usize = 200;
const SALARY_BINS: usize = 20;

const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by",
    "can", "do", "for", "from", "has", "have", "in", "into", "is", "it", "its", "may", "more",
    "must", "not", "of", "on", "or", "our", "such", "that", "the", "their", "them", "they",
    "this", "to", "us", "we", "who", "will", "with", "within", "you", "your",
];

const PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(23, 190, 207),
];

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+#]*").expect("valid word regex"));

// Numbers that may have commas (e.g., "50,000" or "50000")
static SALARY_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?(\d{1,3}(?:,\d{3})+|\d+)").expect("valid salary regex")
});

type Chart = fn(&JobVisualizer, &[JobRecord]) -> Result<Option<PathBuf>>;

pub struct JobVisualizer {
    output_dir: PathBuf,
}

impl JobVisualizer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Renders every chart, skipping the ones that fail. Returns how many were written.
    pub fn generate_all(&self, jobs: &[JobRecord]) -> usize {
        info!("Generating visualizations...");
        let charts: [(&str, Chart); 5] = [
            ("jobs_by_company", Self::plot_jobs_by_company),
            ("jobs_by_location", Self::plot_jobs_by_location),
            ("job_types", Self::plot_job_types),
            ("word_cloud", Self::create_word_cloud),
            ("salary_ranges", Self::plot_salary_ranges),
        ];

        let mut written = 0;
        for (name, chart) in charts {
            match chart(self, jobs) {
                Ok(Some(path)) => {
                    info!("Saved visualization to {:?}", path);
                    written += 1;
                }
                Ok(None) => info!("Skipping {}: no data", name),
                Err(e) => error!("Error generating {}: {}", name, e),
            }
        }
        info!("Generated {} of {} visualizations", written, charts.len());
        written
    }

    pub fn plot_jobs_by_company(&self, jobs: &[JobRecord]) -> Result<Option<PathBuf>> {
        let counts = top_counts(jobs.iter().map(|j| j.company.as_str()), TOP_N);
        self.render("jobs_by_company", !counts.is_empty(), |path| {
            draw_ranking(path, "Top 10 Companies by Number of Job Postings", "Company", &counts)
        })
    }

    pub fn plot_jobs_by_location(&self, jobs: &[JobRecord]) -> Result<Option<PathBuf>> {
        let counts = top_counts(jobs.iter().map(|j| j.location.as_str()), TOP_N);
        self.render("jobs_by_location", !counts.is_empty(), |path| {
            draw_ranking(path, "Top 10 Locations by Number of Job Postings", "Location", &counts)
        })
    }

    pub fn plot_job_types(&self, jobs: &[JobRecord]) -> Result<Option<PathBuf>> {
        let counts = top_counts(jobs.iter().map(|j| j.job_type.as_str()), usize::MAX);
        self.render("job_types", !counts.is_empty(), |path| draw_pie(path, &counts))
    }

    pub fn create_word_cloud(&self, jobs: &[JobRecord]) -> Result<Option<PathBuf>> {
        let words = word_frequencies(jobs.iter().map(|j| j.description.as_str()), CLOUD_MAX_WORDS);
        self.render("word_cloud", !words.is_empty(), |path| draw_word_cloud(path, &words))
    }

    pub fn plot_salary_ranges(&self, jobs: &[JobRecord]) -> Result<Option<PathBuf>> {
        let salaries: Vec<f64> = jobs
            .iter()
            .filter_map(|j| salary_figure(&j.salary))
            .map(|s| s as f64)
            .collect();
        let bins = histogram_bins(&salaries, SALARY_BINS);
        self.render("salary_ranges", !bins.is_empty(), |path| draw_histogram(path, &bins))
    }

    fn render(
        &self,
        chart: &'static str,
        has_data: bool,
        draw: impl FnOnce(&Path) -> DrawResult<()>,
    ) -> Result<Option<PathBuf>> {
        if !has_data {
            return Ok(None);
        }
        let path = self
            .output_dir
            .join(format!("{}_{}.png", chart, Local::now().format("%Y%m%d_%H%M%S")));
        draw(&path).map_err(|e| ScraperError::Chart {
            chart,
            reason: e.to_string(),
        })?;
        Ok(Some(path))
    }
}

/// Most frequent non-empty values, highest count first, ties alphabetical.
pub fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, u32)> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        *counts.entry(value).or_default() += 1;
    }
    let mut ranked: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Lower-cased word counts across all texts, stop words removed.
pub fn word_frequencies<'a>(texts: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, u32)> {
    let mut words = Vec::new();
    for text in texts {
        for m in WORD.find_iter(text) {
            let word = m.as_str().to_lowercase();
            if word.len() > 1 && !STOP_WORDS.contains(&word.as_str()) {
                words.push(word);
            }
        }
    }
    top_counts(words.iter().map(String::as_str), limit)
}

/// Extracts the salary figure from a raw salary string using regex.
/// Looks for numbers and returns the first one found (likely the minimum).
pub fn salary_figure(salary_raw: &str) -> Option<i64> {
    for cap in SALARY_NUMBER.captures_iter(salary_raw) {
        if let Some(matched) = cap.get(1) {
            let clean_number: String = matched
                .as_str()
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            if let Ok(num) = clean_number.parse::<i64>() {
                // Small numbers are hours, days or years of experience
                if num >= 1000 {
                    return Some(num);
                }
            }
        }
    }
    None
}

/// Splits the value range into equal-width bins: `(low, high, count)`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<(f64, f64, u32)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut counts = vec![0u32; bins];
    for value in values {
        let index = (((value - min) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let low = min + width * i as f64;
            (low, low + width, count)
        })
        .collect()
}

fn draw_ranking(path: &Path, title: &str, axis: &str, counts: &[(String, u32)]) -> DrawResult<()> {
    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let rows = counts.len() as u32;
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(260)
        .build_cartesian_2d(0u32..max + 1, (0u32..rows).into_segmented())?;

    // Row 0 is drawn at the bottom; reverse so the largest bar is on top.
    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => rows
            .checked_sub(i + 1)
            .and_then(|row| counts.get(row as usize))
            .map(|(name, _)| truncate(name, 32))
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(counts.len())
        .y_label_formatter(&label)
        .x_desc("Number of Jobs")
        .y_desc(axis)
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(PALETTE[0].filled())
            .margin(6)
            .data(
                counts
                    .iter()
                    .enumerate()
                    .map(|(i, (_, count))| (rows - 1 - i as u32, *count)),
            ),
    )?;

    root.present()?;
    Ok(())
}

fn draw_pie(path: &Path, counts: &[(String, u32)]) -> DrawResult<()> {
    let root = BitMapBackend::new(path, (1000, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Distribution of Job Types", ("sans-serif", 32))?;

    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;
    let sizes: Vec<f64> = counts.iter().map(|(_, c)| f64::from(*c)).collect();
    let colors: Vec<RGBColor> = (0..counts.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
    let labels: Vec<String> = counts.iter().map(|(name, _)| truncate(name, 24)).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 22).into_font().color(&BLACK));
    pie.percentages(("sans-serif", radius * 0.07).into_font().color(&WHITE));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}

fn draw_word_cloud(path: &Path, words: &[(String, u32)]) -> DrawResult<()> {
    const WIDTH: u32 = 1200;
    const HEIGHT: u32 = 800;
    const MARGIN: i32 = 20;
    const MIN_SIZE: f64 = 12.0;
    const MAX_SIZE: f64 = 72.0;

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Word Cloud of Job Descriptions", ("sans-serif", 28))?;
    let (area_width, area_height) = root.dim_in_pixel();

    let top = words.first().map(|(_, c)| f64::from(*c)).unwrap_or(1.0);
    let (mut x, mut y) = (MARGIN, MARGIN);
    let mut row_height = 0;

    for (i, (word, count)) in words.iter().enumerate() {
        let size = MIN_SIZE + (MAX_SIZE - MIN_SIZE) * f64::from(*count) / top;
        let style = ("sans-serif", size)
            .into_font()
            .color(&PALETTE[i % PALETTE.len()]);
        let (w, h) = root.estimate_text_size(word, &style)?;
        let (w, h) = (w as i32, h as i32);

        if x + w > area_width as i32 - MARGIN {
            x = MARGIN;
            y += row_height + 6;
            row_height = 0;
        }
        if y + h > area_height as i32 - MARGIN {
            break;
        }

        root.draw(&Text::new(word.as_str(), (x, y), style))?;
        x += w + 12;
        row_height = row_height.max(h);
    }

    root.present()?;
    Ok(())
}

fn draw_histogram(path: &Path, bins: &[(f64, f64, u32)]) -> DrawResult<()> {
    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let low = bins.first().map(|b| b.0).unwrap_or(0.0);
    let high = bins.last().map(|b| b.1).unwrap_or(1.0);
    let max = bins.iter().map(|b| b.2).max().unwrap_or(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Salary Ranges", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(low..high, 0u32..max + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| format!("{:.0}", v))
        .x_desc("Salary")
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().map(|(lo, hi, count)| {
        Rectangle::new([(*lo, 0), (*hi, *count)], PALETTE[0].mix(0.7).filled())
    }))?;

    root.present()?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(company: &str, job_type: &str, salary: &str, description: &str) -> JobRecord {
        let mut job = JobRecord::blank("https://example.com/j");
        job.company = company.to_string();
        job.job_type = job_type.to_string();
        job.salary = salary.to_string();
        job.description = description.to_string();
        job
    }

    #[test]
    fn test_salary_figure_with_dollar_sign() {
        assert_eq!(salary_figure("$50,000 - $70,000"), Some(50000));
    }

    #[test]
    fn test_salary_figure_without_dollar_sign() {
        assert_eq!(salary_figure("Salary: 60000 USD"), Some(60000));
    }

    #[test]
    fn test_salary_figure_no_salary() {
        assert_eq!(salary_figure("Competitive salary"), None);
    }

    #[test]
    fn test_salary_figure_skips_small_numbers() {
        assert_eq!(salary_figure("Up to 40 hours, $95,500/year"), Some(95500));
        assert_eq!(salary_figure("$45 an hour"), None);
    }

    #[test]
    fn test_top_counts_orders_and_limits() {
        let values = ["Acme", "Globex", "Acme", "", "Initech", "Globex", "Acme", "  "];
        let counts = top_counts(values.into_iter(), 2);
        assert_eq!(
            counts,
            vec![("Acme".to_string(), 3), ("Globex".to_string(), 2)]
        );
    }

    #[test]
    fn test_top_counts_breaks_ties_alphabetically() {
        let counts = top_counts(["b", "a", "c"].into_iter(), 10);
        let names: Vec<&str> = counts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_word_frequencies_drop_stop_words() {
        let words = word_frequencies(
            ["Rust and C++ for the backend", "We love Rust"].into_iter(),
            10,
        );
        assert_eq!(words[0], ("rust".to_string(), 2));
        assert!(words.iter().any(|(w, _)| w == "c++"));
        assert!(words.iter().all(|(w, _)| w != "and" && w != "the" && w != "we"));
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let bins = histogram_bins(&[50_000.0, 60_000.0, 150_000.0, 150_000.0], 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.2).sum::<u32>(), 4);
        assert_eq!(bins[0].2, 1);
        assert_eq!(bins[19].2, 2);
        assert_eq!(bins[0].0, 50_000.0);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram_bins(&[80_000.0, 80_000.0], 20);
        assert_eq!(bins[0], (80_000.0, 80_001.0, 2));
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram_bins(&[], 20).is_empty());
    }

    #[test]
    fn test_no_jobs_skips_every_chart() {
        let dir = std::env::temp_dir().join(format!("job-scraper-viz-{}", std::process::id()));
        let visualizer = JobVisualizer::new(&dir).unwrap();

        assert_eq!(visualizer.generate_all(&[]), 0);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_blank_fields_skip_their_charts() {
        let dir = std::env::temp_dir().join(format!("job-scraper-viz-blank-{}", std::process::id()));
        let visualizer = JobVisualizer::new(&dir).unwrap();
        let jobs = vec![job("", "", "Competitive", "")];

        assert_eq!(visualizer.plot_jobs_by_company(&jobs).unwrap(), None);
        assert_eq!(visualizer.plot_job_types(&jobs).unwrap(), None);
        assert_eq!(visualizer.create_word_cloud(&jobs).unwrap(), None);
        assert_eq!(visualizer.plot_salary_ranges(&jobs).unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
