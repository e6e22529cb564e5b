//! Synthetic audit transcript generator for stress testing auditpack.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output] [photos]
//! Example: cargo run --features gen-test --bin gen_test -- 100000 heavy_chat.txt
//!
//! With a third argument, empty placeholder photos for every referenced
//! `IMG-...` name are written to that directory, so the output can be zipped
//! into a complete export.

use rand::Rng;
use rand::seq::SliceRandom;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

const SENDERS: &[&str] = &[
    "Alice",
    "Bob",
    "Budi Santoso",
    "Siti",
    "+62 812-3456-7890",
    "Store Team 🔧",
    "Dewi: Lead", // colon in the sender name
];

const LOCS: &[&str] = &["K7", "K8", "A1", "B12", "RCM-3", "WH2/R4", "  ", ""];
const BINS: &[&str] = &["RCM1", "RCM2", "BIN 04", "B/7", "-"];

const CHATTER: &[&str] = &[
    "Hello, good morning",
    "Starting row K now",
    "ok noted 👍",
    "Please recount the last bin",
    "Lunch break, back at 13:00",
    "Where is the ladder?",
];

const QTY_LABELS: &[&str] = &["QTY ACTUAL", "QTY ACT", "Qty", "qty actual"];
const REMARK_LABELS: &[&str] = &["REMARK", "Remarks", "REMARK(S)", "REMARKABLE"];

struct Stats {
    blocks: usize,
    photos: Vec<String>,
    bytes_written: usize,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("heavy_chat.txt");
    let photos_dir = args.get(3).map(Path::new);

    println!("🧪 Audit Transcript Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Output:   {}", output);
    if let Some(dir) = photos_dir {
        println!("   Photos:   {}", dir.display());
    }
    println!();

    if let Err(e) = run(count, output, photos_dir) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(count: usize, output: &str, photos_dir: Option<&Path>) -> io::Result<()> {
    let start = std::time::Instant::now();
    let stats = generate_transcript(count, output)?;

    if let Some(dir) = photos_dir {
        fs::create_dir_all(dir)?;
        for name in &stats.photos {
            File::create(dir.join(name))?;
        }
    }

    let elapsed = start.elapsed();
    let mb = stats.bytes_written as f64 / 1_000_000.0;

    println!("\n\n✅ Done!");
    println!("   Audit blocks: {}", stats.blocks);
    println!("   Photos:       {}", stats.photos.len());
    println!("   Size:         {:.2} MB", mb);
    println!("   Time:         {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed:        {:.0} msg/s",
        count as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

fn generate_transcript(count: usize, output: &str) -> io::Result<Stats> {
    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file); // 1MB buffer

    let mut rng = rand::thread_rng();
    let start = std::time::Instant::now();
    let mut stats = Stats {
        blocks: 0,
        photos: Vec::new(),
        bytes_written: 0,
    };

    for i in 0..count {
        let block = generate_message(&mut rng, i, &mut stats);
        stats.bytes_written += block.len();
        writer.write_all(block.as_bytes())?;

        // Occasionally insert garbage lines to test robustness
        if i % 1000 == 500 {
            let garbage = generate_garbage_line(&mut rng);
            writer.write_all(garbage.as_bytes())?;
            stats.bytes_written += garbage.len();
        }

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            let mps = (i + 1) as f64 / elapsed;
            let mb = stats.bytes_written as f64 / 1_000_000.0;
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                mb,
                mps
            );
        }
    }

    writer.flush()?;
    Ok(stats)
}

fn header(index: usize, sender: &str) -> String {
    let day = (index / 1440) % 28 + 1;
    let hour = (index / 60) % 24;
    let minute = index % 60;
    format!("{}/8/2024, {:02}:{:02} - {}:", day, hour, minute, sender)
}

fn photo_name(index: usize) -> String {
    let day = (index / 1440) % 28 + 1;
    format!("IMG-202408{:02}-WA{:04}.jpg", day, index % 10_000)
}

fn generate_message(rng: &mut impl Rng, index: usize, stats: &mut Stats) -> String {
    let sender = SENDERS.choose(rng).copied().unwrap_or("Alice");
    let mut block = header(index, sender);

    match index % 10 {
        // Plain chatter, never a record
        0 | 1 => {
            block.push(' ');
            block.push_str(CHATTER.choose(rng).copied().unwrap_or_default());
            block.push('\n');
        }

        // Photo posted without fields
        2 => {
            block.push('\n');
            block.push_str(&format!("{} (file attached)\n", photo_name(index)));
        }

        // Media not exported
        3 => {
            block.push_str(" <Media omitted>\n");
        }

        // Fields on the header line
        4 => {
            let loc = LOCS.choose(rng).copied().unwrap_or("K7");
            block.push_str(&format!(" LOC: {}\n", loc));
            block.push_str(&format!("QTY ACTUAL: {}\n", rng.gen_range(0..500)));
            stats.blocks += 1;
        }

        // Full audit block, with occasional corrections and noise
        _ => {
            block.push('\n');
            let loc = LOCS.choose(rng).copied().unwrap_or("K7");
            let emro: u32 = rng.gen_range(0..500);
            let actual = emro.saturating_add_signed(rng.gen_range(-3..=3));

            block.push_str(&format!("LOC: {}\n", loc));
            block.push_str(&format!(
                "BIN: {}\n",
                BINS.choose(rng).copied().unwrap_or("RCM1")
            ));
            block.push_str(&format!("PN: AR{:07}\n", rng.gen_range(0..10_000_000)));
            if rng.gen_bool(0.7) {
                block.push_str(&format!("SN: {:08}\n", rng.gen_range(0..100_000_000)));
            }
            block.push_str(&format!("QTY EMRO: {}\n", emro));
            let label = QTY_LABELS.choose(rng).copied().unwrap_or("QTY ACTUAL");
            block.push_str(&format!("{}: {}\n", label, actual));

            if rng.gen_bool(0.1) {
                // Corrected count, last one wins
                block.push_str(&format!("QTY ACTUAL: {} (recount)\n", actual + 1));
            }

            let remark = match actual.cmp(&emro) {
                std::cmp::Ordering::Greater => format!("SURPLUS {}", actual - emro),
                std::cmp::Ordering::Less => format!("SHORTAGE {}", emro - actual),
                std::cmp::Ordering::Equal => "OK".to_string(),
            };
            let label = REMARK_LABELS.choose(rng).copied().unwrap_or("REMARK");
            block.push_str(&format!("{}: {}\n", label, remark));

            if rng.gen_bool(0.05) {
                block.push_str("Shelf: top row\n");
            }
            if rng.gen_bool(0.1) {
                block.push_str("counted twice to be sure\n");
            }

            match rng.gen_range(0..10) {
                0 => block.push_str("<Media omitted>\n"),
                1 => {}
                _ => {
                    let name = photo_name(index);
                    block.push_str(&format!("{} (file attached)\n", name));
                    stats.photos.push(name);
                }
            }
            stats.blocks += 1;
        }
    }

    block
}

fn generate_garbage_line(rng: &mut impl Rng) -> String {
    match rng.gen_range(0..6) {
        0 => "This line has no timestamp or sender format\n".to_string(),
        1 => "1/8/2024, 10:00 - Missing colon after sender\n".to_string(),
        2 => "-------------------------------------------\n".to_string(),
        3 => "\n".to_string(), // Empty line
        4 => "☠️💀👻 Random emoji line 👻💀☠️\n".to_string(),
        _ => "Messages and calls are end-to-end encrypted.\n".to_string(),
    }
}
