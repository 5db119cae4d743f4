// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # mcap2video CLI
//!
//! List or extract `foxglove.CompressedVideo` channels from an MCAP file.
//!
//! ## Usage
//!
//! ```sh
//! # List compressed-video channels
//! mcap2video drive.mcap
//!
//! # Extract one topic into the current directory
//! mcap2video drive.mcap /camera/front
//!
//! # Extract every video topic into ./videos
//! mcap2video drive.mcap all --output videos
//! ```

use std::fs;
use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use mcap2video::{
    extract_channel, map_mcap, plan_output_paths, probe_codecs, resolve_output_path,
    ChannelCatalog,
};

type Result<T = ()> = anyhow::Result<T>;

/// List topics containing foxglove.CompressedVideo messages in an MCAP
/// file, or extract video topics into playable MP4 files.
#[derive(Parser)]
#[command(name = "mcap2video")]
#[command(about = "Extract foxglove.CompressedVideo channels from MCAP files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to the MCAP file
    #[arg(value_name = "FILE")]
    mcap_file: PathBuf,

    /// Topic to extract; use 'all' to extract every video topic
    #[arg(value_name = "TOPIC")]
    topic: Option<String>,

    /// Output directory for extracted videos
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Emit the channel listing as JSON (list mode only)
    #[arg(long)]
    json: bool,
}

fn run() -> Result {
    let cli = Cli::parse();

    let mapped = map_mcap(&cli.mcap_file)
        .with_context(|| format!("unable to open {}", cli.mcap_file.display()))?;
    let catalog = ChannelCatalog::scan(&mapped)
        .with_context(|| format!("unable to read {}", cli.mcap_file.display()))?;

    match cli.topic.as_deref() {
        None => cmd_list(&mapped, &catalog, &cli),
        Some("all") => cmd_extract_all(&mapped, &catalog, &cli),
        Some(topic) => cmd_extract_one(&mapped, &catalog, topic, &cli),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[derive(Serialize)]
struct ListingRow {
    topic: String,
    codec: Option<String>,
    messages: u64,
    duration_ns: u64,
}

/// Cmd: List video channels
fn cmd_list(mapped: &[u8], catalog: &ChannelCatalog, cli: &Cli) -> Result {
    let channels = catalog.video_channels();
    if channels.is_empty() {
        println!("No foxglove.CompressedVideo messages found");
        return Ok(());
    }

    let topics: Vec<&str> = channels.iter().map(|c| c.topic.as_str()).collect();
    let codecs = probe_codecs(mapped, &topics)?;

    if cli.json {
        let rows: Vec<ListingRow> = channels
            .iter()
            .map(|channel| ListingRow {
                topic: channel.topic.clone(),
                codec: codecs.get(&channel.topic).map(|c| c.tag().to_string()),
                messages: channel.message_count,
                duration_ns: channel.duration(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "Found {} foxglove.CompressedVideo channel(s) in {}:",
        channels.len(),
        cli.mcap_file.display()
    );
    let start = channels.iter().filter_map(|c| c.start_time).min();
    let end = channels.iter().filter_map(|c| c.end_time).max();
    if let (Some(start), Some(end)) = (start, end) {
        println!("Start: {}", format_timestamp(start));
        println!("End:   {}", format_timestamp(end));
    }
    for channel in channels {
        let codec = codecs
            .get(&channel.topic)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "- {} ({}, {} messages, {})",
            channel.topic,
            codec,
            channel.message_count,
            format_duration(channel.duration())
        );
    }

    Ok(())
}

/// Cmd: Extract a single topic
fn cmd_extract_one(mapped: &[u8], catalog: &ChannelCatalog, topic: &str, cli: &Cli) -> Result {
    fs::create_dir_all(&cli.output)
        .with_context(|| format!("unable to create output dir {}", cli.output.display()))?;

    let output_path = resolve_output_path(&cli.output, topic);
    println!("Extracting video from topic {topic} in {}", cli.mcap_file.display());

    let report = extract_channel(mapped, catalog, topic, &output_path)?;
    print_report(&report.output_path, report.frames_written, report.messages_skipped);

    Ok(())
}

/// Cmd: Extract every video topic
fn cmd_extract_all(mapped: &[u8], catalog: &ChannelCatalog, cli: &Cli) -> Result {
    let channels = catalog.video_channels();
    if channels.is_empty() {
        println!("No foxglove.CompressedVideo messages found");
        return Ok(());
    }

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("unable to create output dir {}", cli.output.display()))?;

    let plan = plan_output_paths(&cli.output, &channels);
    let progress = Progress::new(plan.len() as u64, "Extracting channels");

    let mut succeeded: usize = 0;
    let mut failures: Vec<(String, String)> = Vec::new();

    for (index, (channel, output_path)) in plan.iter().enumerate() {
        progress.set(index as u64);
        match extract_channel(mapped, catalog, &channel.topic, output_path) {
            Ok(report) => {
                succeeded += 1;
                print_report(&report.output_path, report.frames_written, report.messages_skipped);
            }
            Err(err) => {
                eprintln!("Failed to extract {}: {err}", channel.topic);
                failures.push((channel.topic.clone(), err.to_string()));
            }
        }
    }
    progress.finish(format!("{succeeded}/{} channel(s)", plan.len()));

    println!("Extracted {succeeded}/{} channel(s)", plan.len());
    if !failures.is_empty() {
        anyhow::bail!("{} channel(s) failed to extract", failures.len());
    }

    Ok(())
}

fn print_report(path: &std::path::Path, frames: u64, skipped: u64) {
    if skipped > 0 {
        println!(
            "Saved {} ({frames} frames, {skipped} undecodable messages skipped)",
            path.display()
        );
    } else {
        println!("Saved {} ({frames} frames)", path.display());
    }
}

/// Format a timestamp in nanoseconds to human-readable string.
fn format_timestamp(nanos: u64) -> String {
    let secs = nanos / 1_000_000_000;
    let datetime = chrono::DateTime::<chrono::Utc>::from_timestamp(secs as i64, 0);

    match datetime {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} ns", nanos),
    }
}

/// Format a duration in nanoseconds to human-readable string.
fn format_duration(nanos: u64) -> String {
    let secs = nanos / 1_000_000_000;
    let millis = (nanos % 1_000_000_000) / 1_000_000;

    if secs >= 3600 {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        format!("{}h {}m", hours, minutes)
    } else if secs >= 60 {
        let minutes = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}m {}s", minutes, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

/// Progress bar wrapper for consistent progress reporting.
struct Progress {
    inner: Option<indicatif::ProgressBar>,
}

impl Progress {
    /// Create a new progress bar; hidden when stderr is not a terminal.
    fn new(total: u64, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let inner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(total);
            pb.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
                    )
                    .unwrap()
                    .progress_chars("=>-"),
            );
            pb.set_prefix(prefix);
            Some(pb)
        } else {
            None
        };

        Self { inner }
    }

    fn set(&self, position: u64) {
        if let Some(pb) = &self.inner {
            pb.set_position(position);
        }
    }

    fn finish(&self, msg: String) {
        if let Some(pb) = &self.inner {
            pb.finish_with_message(msg);
        }
    }
}
