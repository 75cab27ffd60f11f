//! # chatshrink CLI
//!
//! Command-line interface for the chatshrink library.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatshrink::cli::{Args, default_output_path};
use chatshrink::platform::detect_platform;
use chatshrink::shrink::{ShrinkConfig, ShrinkResult, shrink_with_platform};
use chatshrink::window::TimeWindow;
use chatshrink::{Platform, ShrinkError};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ShrinkError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let output_path = args
        .output
        .as_ref()
        .map_or_else(|| default_output_path(&args.input), PathBuf::from);

    let window = TimeWindow::from_parts(
        args.start_date.as_deref(),
        args.start_time.as_deref(),
        args.end_date.as_deref(),
        args.end_time.as_deref(),
    )?;

    let config = ShrinkConfig::new()
        .with_max_messages(args.max_messages)
        .with_skip_invalid(!args.strict);

    let transcript = fs::read_to_string(&args.input)?;
    let platform = match args.platform {
        Some(platform) => platform,
        None => detect_platform(&transcript)?,
    };

    if !args.json {
        print_header(&args, platform, &output_path, &window);
    }

    let result = shrink_with_platform(platform, &transcript, &window, &config)?;

    // All-or-nothing: the output file is only written on success.
    fs::write(&output_path, &result.text)?;

    if args.json {
        print_json_summary(platform, &output_path, &result);
    } else {
        print_summary(&transcript, &output_path, &result, total_start);
    }

    Ok(())
}

fn print_header(args: &Args, platform: Platform, output_path: &Path, window: &TimeWindow) {
    println!("🗜️ chatshrink v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📖 Platform: {}", platform);
    println!("📂 Input:    {}", args.input);
    println!("💾 Output:   {}", output_path.display());

    if let Some(ref date) = args.start_date {
        println!(
            "📅 From:     {} {}",
            date,
            args.start_time.as_deref().unwrap_or("12:00 AM")
        );
    }
    if let Some(ref date) = args.end_date {
        println!(
            "📅 Until:    {} {}",
            date,
            args.end_time.as_deref().unwrap_or("12:00 AM")
        );
    }
    if window.is_unbounded() {
        println!("📅 Window:   unbounded");
    }
    println!();
}

fn print_summary(
    transcript: &str,
    output_path: &Path,
    result: &ShrinkResult,
    total_start: Instant,
) {
    println!("✅ Done! Output saved to {}", output_path.display());
    println!();
    println!("📊 Summary:");
    println!("   Messages:  {}", result.message_count);
    println!("   Speakers:  {}", result.user_count);
    for (raw, nick) in result.raw_names.iter().zip(result.pseudonyms.iter()) {
        println!("              {} → {}", raw, nick);
    }
    if result.skipped > 0 {
        println!("   Skipped:   {} malformed header(s)", result.skipped);
    }

    let original = transcript.len();
    let compacted = result.text.len();
    if original > 0 {
        let reduction = 100.0 * (1.0 - compacted as f64 / original as f64);
        println!(
            "   Size:      {} → {} bytes ({:.1}% reduction)",
            original, compacted, reduction
        );
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());
}

fn print_json_summary(platform: Platform, output_path: &Path, result: &ShrinkResult) {
    let summary = serde_json::json!({
        "platform": platform.to_string().to_lowercase(),
        "output": output_path.display().to_string(),
        "message_count": result.message_count,
        "user_count": result.user_count,
        "raw_names": result.raw_names,
        "pseudonyms": result.pseudonyms,
        "skipped": result.skipped,
    });
    println!("{}", summary);
}
