use serde::{Deserialize, Serialize};

/// How hit counts were recorded by the coverage tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    /// Each block is 0 or 1: executed or not.
    Set,
    /// Counts are execution counts.
    Count,
    /// Like `Count`, collected with atomic increments.
    Atomic,
    /// Any other tool-specific mode; counts are treated like `Count`.
    #[serde(untagged)]
    Other(String),
}

impl CoverMode {
    /// `None` only for an empty mode.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => None,
            "set" => Some(Self::Set),
            "count" => Some(Self::Count),
            "atomic" => Some(Self::Atomic),
            other => Some(Self::Other(other.to_string())),
        }
    }

    /// Whether counts are 0/1 flags rather than execution counts.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set)
    }
}

/// A contiguous source range with its statement and hit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBlock {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub num_stmt: u64,
    pub count: u64,
}

impl ProfileBlock {
    pub fn same_range(&self, other: &ProfileBlock) -> bool {
        self.start_line == other.start_line
            && self.start_col == other.start_col
            && self.end_line == other.end_line
            && self.end_col == other.end_col
    }

    /// Number of source lines the block spans (at least 1).
    pub fn line_span(&self) -> u64 {
        u64::from(self.end_line.saturating_sub(self.start_line)) + 1
    }
}

/// Coverage data for one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageProfile {
    /// Slash-separated path as written by the coverage tool.
    pub file_name: String,
    pub mode: CoverMode,
    /// Sorted by start position, no two blocks share a range.
    pub blocks: Vec<ProfileBlock>,
}

impl CoverageProfile {
    pub fn num_statements(&self) -> u64 {
        self.blocks.iter().map(|b| b.num_stmt).sum()
    }

    pub fn covered_statements(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| b.count > 0)
            .map(|b| b.num_stmt)
            .sum()
    }

    pub fn num_lines(&self) -> u64 {
        self.blocks.iter().map(ProfileBlock::line_span).sum()
    }

    /// Fraction of statements executed at least once. Files without
    /// statements count as uncovered.
    pub fn percent_covered(&self) -> f64 {
        let total = self.num_statements();
        if total == 0 {
            return 0.0;
        }
        self.covered_statements() as f64 / total as f64
    }
}
