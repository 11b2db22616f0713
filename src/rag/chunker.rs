//! Sentence-window chunking. Scraped text is split into sentences, then
//! grouped into fixed-size windows that overlap by a configurable number of
//! sentences, preserving document order.

use std::sync::OnceLock;

use regex::Regex;

pub const CHUNK_SENTENCES: usize = 10;
pub const OVERLAP_SENTENCES: usize = 1;

static SENTENCE_RE: OnceLock<Regex> = OnceLock::new();

/// Splits text into sentences on `.`/`!`/`?` boundaries. Whitespace is
/// trimmed and empty fragments dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let re = SENTENCE_RE.get_or_init(|| Regex::new(r"[^.!?]+[.!?]*").unwrap());
    re.find_iter(text)
        .map(|found| found.as_str().trim().to_string())
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Lazy, finite, restartable (via `Clone`) iterator over sentence windows.
/// The start index advances by `window - overlap` per step, clamped to at
/// least one so the iterator terminates for any parameter combination. The
/// window that reaches the final sentence is the last one produced; later
/// start positions would only re-emit already-covered overlap.
#[derive(Debug, Clone)]
pub struct SentenceWindows {
    sentences: Vec<String>,
    window: usize,
    step: usize,
    start: usize,
    done: bool,
}

impl Iterator for SentenceWindows {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done || self.start >= self.sentences.len() {
            return None;
        }
        let end = (self.start + self.window).min(self.sentences.len());
        let chunk = self.sentences[self.start..end].join(" ");
        if end == self.sentences.len() {
            self.done = true;
        } else {
            self.start += self.step;
        }
        Some(chunk)
    }
}

pub fn chunk_text(text: &str, window: usize, overlap: usize) -> SentenceWindows {
    let window = window.max(1);
    SentenceWindows {
        sentences: split_sentences(text),
        window,
        step: window.saturating_sub(overlap).max(1),
        start: 0,
        done: false,
    }
}
