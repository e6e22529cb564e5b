//! # auditpack CLI
//!
//! Command-line interface for the auditpack library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use auditpack::bundle::ExportBundle;
use auditpack::cli::Args;
use auditpack::core::apply_filters;
use auditpack::export::{LinkStats, check_photos, link_photos};
use auditpack::format::{OutputFormat, write_to_format};
use auditpack::logging::init_logging;
use auditpack::parser::AuditParser;
use auditpack::resolver::ImageResolver;
use auditpack::store::{DirectoryStore, PhotoStore};
use auditpack::{AuditpackError, ParsedRecord};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), AuditpackError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    init_logging(&args.log_config())?;

    let output_path = args.output_path();
    let format: OutputFormat = args.format.into();

    // Validate everything before touching the input
    let parser = AuditParser::with_config(args.parser_config())?;
    let resolver_config = args.resolver_config()?;
    let filter_config = args.filter_config()?;
    let output_config = args.output_config()?;
    let store = build_store(&args)?;

    // Print header
    println!("📦 auditpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    if let Some(ref after) = args.after {
        println!("📅 After:   {}", after);
    }
    if let Some(ref before) = args.before {
        println!("📅 Before:  {}", before);
    }
    if let Some(ref from) = args.from {
        println!("👤 From:    {}", from);
    }
    println!();

    // Step 1: Open the bundle
    println!("🗂️  Opening export...");
    let bundle = ExportBundle::open(&args.input)?;
    println!(
        "   Transcript {} with {} photos",
        bundle.chat_path().display(),
        bundle.images().len()
    );

    // Step 2: Parse
    println!("⏳ Parsing transcript...");
    let parse_start = Instant::now();
    let bytes = std::fs::read(bundle.chat_path())?;
    let (records, stats) = parser.parse_bytes_with_stats(&bytes);
    println!(
        "   Found {} records in {} messages ({:.2}s)",
        stats.records,
        stats.blocks,
        parse_start.elapsed().as_secs_f64()
    );

    // Step 3: Filter
    let mut records: Vec<ParsedRecord> = if filter_config.is_active() {
        println!("🔍 Filtering records...");
        let filtered = apply_filters(records, &filter_config);
        println!("   {} records after filtering", filtered.len());
        filtered
    } else {
        records
    };

    // Step 4: Link photos
    let link_start = Instant::now();
    let resolver = ImageResolver::new(bundle.images(), resolver_config);
    let link_stats = match store {
        Some(ref store) => {
            println!("🖼️  Linking photos...");
            let link_stats = link_photos(&mut records, &resolver, &**store);
            println!(
                "   {} stored, {} not found ({:.2}s)",
                link_stats.uploaded,
                link_stats.not_found,
                link_start.elapsed().as_secs_f64()
            );
            link_stats
        }
        None => {
            println!("🔎 Checking photos (no --photos-dir or --upload-url, nothing stored)...");
            let link_stats = check_photos(&mut records, &resolver);
            println!(
                "   {} found, {} not found ({:.2}s)",
                link_stats.found,
                link_stats.not_found,
                link_start.elapsed().as_secs_f64()
            );
            link_stats
        }
    };

    // Step 5: Write output in selected format
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(&records, &output_path, format, &output_config)?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    let total_time = total_start.elapsed();

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Lines:     {}", stats.lines);
    println!("   Messages:  {}", stats.blocks);
    println!("   Records:   {}", stats.records);
    println!("   Discarded: {}", stats.discarded);
    if filter_config.is_active() {
        println!("   Filtered:  {} records", records.len());
    }
    print_link_summary(&link_stats);

    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());

    Ok(())
}

fn print_link_summary(stats: &LinkStats) {
    if stats.found > 0 {
        println!("   Photos:    {} found (not stored)", stats.found);
    } else {
        println!("   Photos:    {} stored", stats.uploaded);
    }
    println!("              {} not found", stats.not_found);
    println!("              {} without photo", stats.no_image);
    if stats.failed > 0 {
        println!("              {} failed", stats.failed);
    }
}

/// Picks the photo store from `--upload-url` or `--photos-dir`.
fn build_store(args: &Args) -> Result<Option<Box<dyn PhotoStore>>, AuditpackError> {
    if let Some(ref url) = args.upload_url {
        return upload_store(url).map(Some);
    }

    let Some(ref dir) = args.photos_dir else {
        return Ok(None);
    };
    let mut store = DirectoryStore::new(dir)?;
    if let Some(ref base_url) = args.base_url {
        store = store.with_base_url(base_url);
    }
    Ok(Some(Box::new(store)))
}

#[cfg(feature = "http-store")]
fn upload_store(url: &str) -> Result<Box<dyn PhotoStore>, AuditpackError> {
    Ok(Box::new(auditpack::store::HttpStore::new(url)?))
}

#[cfg(not(feature = "http-store"))]
fn upload_store(_url: &str) -> Result<Box<dyn PhotoStore>, AuditpackError> {
    Err(AuditpackError::invalid_config(
        "upload_url",
        "--upload-url requires the 'http-store' feature",
    ))
}
