use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{CoverMode, CoverageProfile, ProfileBlock};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverParseError {
    #[error("no mode line found")]
    Empty,
    #[error("line {line}: bad mode line: {text:?}")]
    BadModeLine { line: usize, text: String },
    #[error("line {line}: {text:?} doesn't match expected format")]
    BadLine { line: usize, text: String },
    #[error("line {line}: inconsistent statement count for block in {file}")]
    InconsistentNumStmt { line: usize, file: String },
}

/// Parse a Go-style coverage profile.
///
/// The first non-empty line declares the mode (`mode: set|count|atomic`, or
/// any other non-empty word);
/// every following non-empty line has the form
/// `path:startLine.startCol,endLine.endCol numStmt count`.
///
/// Blocks are grouped per file and sorted by position. Repeated blocks
/// (as produced by merging profiles from several test binaries) are folded
/// together: OR-ed in `set` mode, summed in every other mode. Profiles come back
/// sorted by file name.
pub fn parse_profiles(text: &str) -> Result<Vec<CoverageProfile>, CoverParseError> {
    let mut mode: Option<CoverMode> = None;
    // file -> (source line of each block, block)
    let mut files: BTreeMap<&str, Vec<(usize, ProfileBlock)>> = BTreeMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if mode.is_none() {
            mode = Some(parse_mode_line(line).ok_or_else(|| CoverParseError::BadModeLine {
                line: line_no,
                text: line.to_string(),
            })?);
            continue;
        }

        let (file, block) = parse_block_line(line).ok_or_else(|| CoverParseError::BadLine {
            line: line_no,
            text: line.to_string(),
        })?;
        files.entry(file).or_default().push((line_no, block));
    }

    let Some(mode) = mode else {
        return Err(CoverParseError::Empty);
    };

    let mut profiles = Vec::with_capacity(files.len());
    for (file, mut blocks) in files {
        blocks.sort_by_key(|(_, b)| (b.start_line, b.start_col));
        let blocks = merge_blocks(file, &mode, blocks)?;
        profiles.push(CoverageProfile {
            file_name: file.to_string(),
            mode: mode.clone(),
            blocks,
        });
    }

    tracing::debug!(files = profiles.len(), ?mode, "parsed coverage profile");
    Ok(profiles)
}

fn parse_mode_line(line: &str) -> Option<CoverMode> {
    let value = line.strip_prefix("mode: ")?;
    CoverMode::parse(value.trim())
}

/// `path:L0.C0,L1.C1 numStmt count`. The path may itself contain `:`; the
/// range starts after the last one.
fn parse_block_line(line: &str) -> Option<(&str, ProfileBlock)> {
    let (rest, count) = line.rsplit_once(' ')?;
    let (location, num_stmt) = rest.rsplit_once(' ')?;
    let (file, range) = location.rsplit_once(':')?;
    if file.is_empty() {
        return None;
    }
    let (start, end) = range.split_once(',')?;
    let (start_line, start_col) = parse_position(start)?;
    let (end_line, end_col) = parse_position(end)?;

    Some((
        file,
        ProfileBlock {
            start_line,
            start_col,
            end_line,
            end_col,
            num_stmt: parse_digits(num_stmt)?,
            count: parse_digits(count)?,
        },
    ))
}

fn parse_position(s: &str) -> Option<(u32, u32)> {
    let (line, col) = s.split_once('.')?;
    Some((parse_digits(line)?, parse_digits(col)?))
}

/// Unsigned decimal only: rejects signs and whitespace that `str::parse`
/// would otherwise accept or that the line format does not allow.
fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn merge_blocks(
    file: &str,
    mode: &CoverMode,
    blocks: Vec<(usize, ProfileBlock)>,
) -> Result<Vec<ProfileBlock>, CoverParseError> {
    let mut merged: Vec<ProfileBlock> = Vec::with_capacity(blocks.len());
    for (line_no, block) in blocks {
        if let Some(last) = merged.last_mut()
            && last.same_range(&block)
        {
            if last.num_stmt != block.num_stmt {
                return Err(CoverParseError::InconsistentNumStmt {
                    line: line_no,
                    file: file.to_string(),
                });
            }
            last.count = if mode.is_set() {
                u64::from(last.count > 0 || block.count > 0)
            } else {
                last.count.saturating_add(block.count)
            };
            continue;
        }
        merged.push(block);
    }
    Ok(merged)
}
