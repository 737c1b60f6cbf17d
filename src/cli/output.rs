//! Console output for ingest and search runs.
//!
//! Human-readable only; nothing here is meant to be parsed.

use std::fmt::Display;

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::IngestObserver;
use crate::domain::{IngestOutcome, IngestReport, IngestStage, Review, ReviewMatch};

fn highlight(text: &str) -> ColoredString {
    text.truecolor(0xFE, 0xC8, 0x3C)
}

pub fn welcome(url_count: usize) {
    println!(
        "{}",
        [
            format!("🤘 {}", highlight("Welcome to ReviewVault!")),
            String::new(),
            "Each review page is fetched, extracted, embedded, and stored for search.".to_string(),
            String::new(),
            format!("📍 Step 1: Process {} album reviews", url_count),
            "📍 Step 2: Extract review content and store it in the vector collection".to_string(),
        ]
        .join("\n")
    );
}

pub fn processing(url: impl Display) {
    println!("\nProcessing review: {}", url);
}

pub fn review_added(review: &Review) {
    let plain = format!("Added review: {}", review.headline());
    let styled = format!(
        "Added review: {} by {} (Score: {})",
        highlight(&review.title),
        highlight(&review.artist),
        highlight(&review.score.to_string())
    );
    println!("{}", boxed(&plain, &styled, "Review Added"));
}

pub fn review_failed(url: &str, stage: IngestStage, reason: &str) {
    eprintln!(
        "{} Failed to process review at {} ({}): {}",
        "✗".red(),
        url,
        stage,
        reason
    );
}

pub fn recap(report: &IngestReport) {
    println!(
        "{}",
        [
            "To recap, here are the steps we took:".to_string(),
            format!(
                "1. We attempted {} album reviews: {} stored, {} failed",
                report.attempted(),
                report.succeeded().to_string().green(),
                report.failed().to_string().red()
            ),
            "2. We extracted the review content and stored it in the vector collection".to_string(),
        ]
        .join("\n\n")
    );

    for (url, stage, reason) in report.failures() {
        println!("   {} {} [{}] {}", "✗".red(), url, stage, reason);
    }
}

/// Progress bar over an ingest run, with the per-item lines printed above it.
pub struct ConsoleProgress {
    progress_bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new(total: usize) -> Self {
        let progress_bar = ProgressBar::new(total as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        Self { progress_bar }
    }
}

impl IngestObserver for ConsoleProgress {
    fn item_started(&self, url: &str) {
        self.progress_bar.set_message(url.to_string());
        self.progress_bar.suspend(|| processing(url));
    }

    fn item_finished(&self, outcome: &IngestOutcome) {
        self.progress_bar.suspend(|| match outcome {
            IngestOutcome::Stored { review, .. } => review_added(review),
            IngestOutcome::Failed { url, stage, reason } => review_failed(url, *stage, reason),
        });
        self.progress_bar.inc(1);
    }

    fn run_finished(&self, _report: &IngestReport) {
        self.progress_bar.finish_and_clear();
    }
}

pub fn search_results(results: &[ReviewMatch]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    println!("Found {} results:\n", results.len());
    for (i, result) in results.iter().enumerate() {
        let review = result.review();
        println!(
            "{}. {} by {} (score: {}, similarity: {:.3})",
            i + 1,
            highlight(&review.title),
            highlight(&review.artist),
            review.score,
            result.score()
        );
        println!("   {}", review.url.dimmed());
        if !review.date.is_empty() {
            println!("   {}", review.date);
        }
        println!();
    }
}

/// Frames `styled` in a rounded box sized from its uncolored twin `plain`.
pub fn boxed(plain: &str, styled: &str, title: &str) -> String {
    const PADDING: usize = 1;
    const MARGIN: &str = "   ";

    let width = plain.chars().count().max(title.chars().count() + 2) + PADDING * 4;
    let title_segment = format!(" {} ", title);
    let top_fill = width.saturating_sub(title_segment.chars().count());
    let inner_pad = width - PADDING * 2 - plain.chars().count();
    let blank = format!("{}│{}│", MARGIN, " ".repeat(width));

    [
        String::new(),
        format!("{}╭{}{}╮", MARGIN, title_segment, "─".repeat(top_fill)),
        blank.clone(),
        format!(
            "{}│{}{}{}│",
            MARGIN,
            " ".repeat(PADDING * 2),
            styled,
            " ".repeat(inner_pad)
        ),
        blank,
        format!("{}╰{}╯", MARGIN, "─".repeat(width)),
        String::new(),
    ]
    .join("\n")
}
