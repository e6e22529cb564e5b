//! Property-based tests for auditpack.
//!
//! These tests generate random transcripts to check the parser's
//! invariants: it always terminates, only emits located blocks, keeps the
//! last value per field and never leaks state across messages.

use std::io::Cursor;

use proptest::prelude::*;

use auditpack::ParsedRecord;
use auditpack::core::{FilterConfig, apply_filters};
use auditpack::parser::AuditParser;
use auditpack::parsing::FieldNormalizer;
use auditpack::streaming::RecordIterator;

/// One generated chat message.
#[derive(Debug, Clone)]
struct Block {
    sender: &'static str,
    loc: Option<&'static str>,
    bin: Option<&'static str>,
    qty: Vec<&'static str>,
    image: Option<&'static str>,
    omitted_after_image: bool,
    chatter: bool,
}

impl Block {
    fn render(&self, index: usize) -> String {
        let mut out = format!("1/8/2024, 09:{:02} - {}:\n", index % 60, self.sender);
        if self.chatter {
            out.push_str("Hello, good morning\n");
        }
        if let Some(image) = self.image {
            out.push_str(image);
            out.push_str(" (file attached)\n");
            if self.omitted_after_image {
                out.push_str("<Media omitted>\n");
            }
        }
        if let Some(loc) = self.loc {
            out.push_str(&format!("LOC: {loc}\n"));
        }
        if let Some(bin) = self.bin {
            out.push_str(&format!("Bin: {bin}\n"));
        }
        for (i, qty) in self.qty.iter().enumerate() {
            let label = ["QTY", "QTY ACT", "Qty Actual"][i % 3];
            out.push_str(&format!("{label}: {qty}\n"));
        }
        out
    }

    fn emits(&self) -> bool {
        self.loc.is_some_and(|loc| !loc.trim().is_empty())
    }
}

fn arb_block() -> impl Strategy<Value = Block> {
    (
        prop::sample::select(vec!["Alice", "Bob", "Иван", "Store Team 🔧"]),
        prop::option::of(prop::sample::select(vec!["K7", "A1", "WH2/R4", "Склад-3", "", "   "])),
        prop::option::of(prop::sample::select(vec!["RCM1", "B/7", "-"])),
        prop::collection::vec(prop::sample::select(vec!["0", "12", "46 pcs", "~3"]), 0..4),
        prop::option::of(prop::sample::select(vec![
            "IMG-20240801-WA0001.jpg",
            "IMG-20240801-WA0002 (1).jpeg",
            "img-20240802-wa0100.PNG",
        ])),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(sender, loc, bin, qty, image, omitted_after_image, chatter)| Block {
            sender,
            loc,
            bin,
            qty,
            image,
            omitted_after_image,
            chatter,
        })
}

fn render(blocks: &[Block]) -> String {
    blocks.iter().enumerate().map(|(i, b)| b.render(i)).collect()
}

fn parse(content: &str) -> Vec<ParsedRecord> {
    AuditParser::new().parse_str(content)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // TOTALITY
    // ============================================

    /// Arbitrary lines never panic and never emit more records than messages
    #[test]
    fn parse_is_total(lines in prop::collection::vec(any::<String>(), 0..40)) {
        let content = lines.join("\n");
        let (records, stats) = AuditParser::new().parse_str_with_stats(&content);
        prop_assert!(records.len() <= stats.blocks);
        prop_assert_eq!(stats.records + stats.discarded, stats.blocks);
    }

    /// Arbitrary bytes are decoded, never rejected
    #[test]
    fn parse_bytes_is_total(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = AuditParser::new().parse_bytes(&bytes);
    }

    // ============================================
    // LOC GATING
    // ============================================

    /// Exactly the blocks with a non-blank LOC become records, in order
    #[test]
    fn only_located_blocks_emit(blocks in prop::collection::vec(arb_block(), 0..20)) {
        let records = parse(&render(&blocks));

        let expected: Vec<&str> = blocks
            .iter()
            .filter(|b| b.emits())
            .filter_map(|b| b.loc)
            .collect();
        let actual: Vec<&str> = records.iter().map(|r| r.loc.as_str()).collect();
        prop_assert_eq!(actual, expected);

        for record in &records {
            prop_assert!(!record.loc.trim().is_empty());
            prop_assert!(record.photo_link.is_empty());
        }
    }

    // ============================================
    // LAST WRITE WINS
    // ============================================

    /// The last quantity line of a block is the one kept
    #[test]
    fn last_quantity_wins(block in arb_block()) {
        let block = Block { loc: Some("K7"), ..block };
        let records = parse(&block.render(0));

        prop_assert_eq!(records.len(), 1);
        let expected = block.qty.last().copied().unwrap_or("");
        prop_assert_eq!(records[0].qty_actual.as_str(), expected);
    }

    // ============================================
    // BOUNDARY RESET
    // ============================================

    /// Fields and photos never carry over to the next message
    #[test]
    fn fields_do_not_leak(blocks in prop::collection::vec(arb_block(), 1..20)) {
        let records = parse(&render(&blocks));
        let emitted: Vec<&Block> = blocks.iter().filter(|b| b.emits()).collect();
        prop_assert_eq!(records.len(), emitted.len());

        for (record, block) in records.iter().zip(emitted) {
            prop_assert_eq!(record.bin.as_str(), block.bin.unwrap_or(""));
            prop_assert_eq!(record.sender.as_str(), block.sender);
            if block.image.is_none() {
                prop_assert_eq!(record.photo_file.as_str(), "");
            }
        }
    }

    // ============================================
    // MEDIA OMITTED
    // ============================================

    /// A media-omitted marker after the photo clears it
    #[test]
    fn media_omitted_clears_photo(block in arb_block()) {
        let block = Block { loc: Some("K7"), ..block };
        let records = parse(&block.render(0));

        let expected = match block.image {
            Some(image) if !block.omitted_after_image => image,
            _ => "",
        };
        prop_assert_eq!(records[0].photo_file.as_str(), expected);
    }

    // ============================================
    // NORMALIZATION
    // ============================================

    /// Normalizing a canonical key returns it unchanged
    #[test]
    fn normalization_is_idempotent(
        label in "[A-Za-z()./ _]{1,16}",
        remark in prop::sample::select(vec!["REMARK", "REMARKABLE"]),
    ) {
        let label = label.trim().to_uppercase();
        prop_assume!(!label.is_empty());

        let normalizer = FieldNormalizer::new(remark);
        let once = normalizer.normalize(&label).to_string();
        let twice = normalizer.normalize(&once);
        prop_assert_eq!(twice, once.as_str());
    }

    // ============================================
    // STREAMING
    // ============================================

    /// Streaming yields the same records as parsing in memory
    #[test]
    fn streaming_matches_in_memory(blocks in prop::collection::vec(arb_block(), 0..15)) {
        let content = render(&blocks);
        let parser = AuditParser::new();

        let streamed: Vec<ParsedRecord> = RecordIterator::new(Cursor::new(content.as_bytes()), &parser)
            .filter_map(Result::ok)
            .collect();
        prop_assert_eq!(streamed, parser.parse_str(&content));
    }

    // ============================================
    // FILTER PROPERTIES
    // ============================================

    /// Sender filter only keeps matching senders (case insensitive)
    #[test]
    fn sender_filter_only_keeps_matching(blocks in prop::collection::vec(arb_block(), 0..20)) {
        let records = parse(&render(&blocks));
        let filtered = apply_filters(records, &FilterConfig::new().with_sender("alice"));

        for record in &filtered {
            prop_assert_eq!(record.sender.as_str(), "Alice");
        }
    }

    /// No filter means passthrough
    #[test]
    fn no_filter_is_passthrough(blocks in prop::collection::vec(arb_block(), 0..20)) {
        let records = parse(&render(&blocks));
        let len = records.len();
        prop_assert_eq!(apply_filters(records, &FilterConfig::new()).len(), len);
    }
}
