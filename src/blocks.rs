//! Extraction of `#tag` delimited blocks from experiment config files
//!
//! A block starts at a line that is exactly `#<tag>` and runs until the next
//! line starting with `#`. Blank lines are skipped everywhere and never end a
//! block. Several blocks with the same tag are concatenated in file order.

use crate::{paths::is_gzipped, ThorResult};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Tags whose content is always a list, even with a single line
pub const LIST_TAGS: &[&str] = &["rep1", "rep2", "inputs1", "inputs2"];

/// Content of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValue {
    Scalar(String),
    List(Vec<String>),
}

impl BlockValue {
    fn collapse(tag: &str, mut lines: Vec<String>) -> Self {
        if lines.len() == 1 && !LIST_TAGS.contains(&tag) {
            BlockValue::Scalar(lines.remove(0))
        } else {
            BlockValue::List(lines)
        }
    }

    /// True for an absent tag
    pub fn is_empty(&self) -> bool {
        matches!(self, BlockValue::List(lines) if lines.is_empty())
    }

    /// All lines of the block, scalars as a one-element vector
    pub fn into_lines(self) -> Vec<String> {
        match self {
            BlockValue::Scalar(line) => vec![line],
            BlockValue::List(lines) => lines,
        }
    }
}

/// Collect the lines of every `tag` block from a reader
pub fn read_block<R: BufRead>(reader: R, tag: &str) -> ThorResult<BlockValue> {
    let marker = format!("#{}", tag);
    let mut lines = Vec::new();
    let mut active = false;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            active = line == marker;
            continue;
        }
        if active {
            lines.push(line.to_string());
        }
    }

    Ok(BlockValue::collapse(tag, lines))
}

/// Open a config file, plain or gzip compressed
pub fn open_config<P: AsRef<Path>>(path: P) -> ThorResult<Box<dyn BufRead>> {
    let file = File::open(&path)?;

    let reader: Box<dyn BufRead> = if is_gzipped(&path)? {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

/// Extract the block(s) named `tag` from the config file at `path`
pub fn get_data_block<P: AsRef<Path>>(path: P, tag: &str) -> ThorResult<BlockValue> {
    read_block(open_config(path)?, tag)
}

/// Names of all tags in a file, in order of first appearance
pub fn list_tags<P: AsRef<Path>>(path: P) -> ThorResult<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for line in open_config(path)?.lines() {
        let line = line?;
        if let Some(tag) = line.trim().strip_prefix('#') {
            // `# some text` is a comment, not a tag
            if tag.is_empty() || tag.contains(char::is_whitespace) {
                continue;
            }
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    Ok(tags)
}
