//! Grouping of Tesseract TSV output into line-level fragments.
//!
//! Tesseract reports one row per layout element. Only word rows (level 5) carry
//! text; they are grouped by `(page, block, paragraph, line)` so each fragment
//! corresponds to one detected text line, in reading order.

use crate::models::RecognizedFragment;
use tracing::debug;

const WORD_LEVEL: u32 = 5;
const COLUMN_COUNT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineKey {
    page: u32,
    block: u32,
    paragraph: u32,
    line: u32,
}

struct WordRow<'a> {
    key: LineKey,
    confidence: f32,
    text: &'a str,
}

fn parse_word_row(row: &str) -> Option<WordRow<'_>> {
    let columns: Vec<&str> = row.splitn(COLUMN_COUNT, '\t').collect();
    if columns.len() < COLUMN_COUNT - 1 {
        return None;
    }

    let level: u32 = columns[0].trim().parse().ok()?;
    if level != WORD_LEVEL {
        return None;
    }

    let key = LineKey {
        page: columns[1].trim().parse().ok()?,
        block: columns[2].trim().parse().ok()?,
        paragraph: columns[3].trim().parse().ok()?,
        line: columns[4].trim().parse().ok()?,
    };
    let confidence: f32 = columns[10].trim().parse().ok()?;
    let text = columns.get(11).map(|t| t.trim()).unwrap_or("");

    Some(WordRow { key, confidence, text })
}

struct LineAccumulator {
    key: LineKey,
    words: Vec<String>,
    confidence_total: f32,
}

impl LineAccumulator {
    fn into_fragment(self) -> RecognizedFragment {
        let mean = self.confidence_total / self.words.len() as f32;
        RecognizedFragment::new(self.words.join(" "), (mean / 100.0).clamp(0.0, 1.0))
    }
}

/// Convert Tesseract TSV into one fragment per recognised line.
///
/// Header rows, non-word rows, rows that fail to parse and empty words are skipped.
pub fn fragments_from_tsv(tsv: &str) -> Vec<RecognizedFragment> {
    let mut fragments = Vec::new();
    let mut current: Option<LineAccumulator> = None;
    let mut skipped = 0usize;

    for row in tsv.lines() {
        let Some(word) = parse_word_row(row) else {
            skipped += 1;
            continue;
        };
        if word.text.is_empty() {
            continue;
        }

        match current.as_mut() {
            Some(line) if line.key == word.key => {
                line.words.push(word.text.to_string());
                line.confidence_total += word.confidence;
            }
            _ => {
                if let Some(finished) = current.take() {
                    fragments.push(finished.into_fragment());
                }
                current = Some(LineAccumulator {
                    key: word.key,
                    words: vec![word.text.to_string()],
                    confidence_total: word.confidence,
                });
            }
        }
    }

    if let Some(finished) = current {
        fragments.push(finished.into_fragment());
    }

    debug!("Grouped TSV into {} fragments ({} non-word rows skipped)", fragments.len(), skipped);
    fragments
}
