use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One query to check, as handed over by a row source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub query: String,
    pub row_index: usize,
    /// Source row, carried through untouched.
    #[serde(default)]
    pub original_row: serde_json::Map<String, serde_json::Value>,
}

impl QueryRow {
    pub fn new(query: impl Into<String>, row_index: usize) -> Self {
        Self {
            query: query.into(),
            row_index,
            original_row: serde_json::Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpResult {
    pub rank: u32,
    /// Normalized: lowercase, no protocol, no `www.`.
    pub domain: String,
    pub url: String,
}

/// Where the target domain showed up in one result list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RankMatch {
    Found { rank: u32, url: String },
    #[default]
    NotFound,
}

impl RankMatch {
    /// Output-boundary placeholder for a missing rank or URL.
    pub const SENTINEL: &'static str = "-";

    pub fn is_found(&self) -> bool {
        matches!(self, RankMatch::Found { .. })
    }

    pub fn rank(&self) -> Option<u32> {
        match self {
            RankMatch::Found { rank, .. } => Some(*rank),
            RankMatch::NotFound => None,
        }
    }

    pub fn rank_label(&self) -> String {
        match self {
            RankMatch::Found { rank, .. } => rank.to_string(),
            RankMatch::NotFound => Self::SENTINEL.to_string(),
        }
    }

    pub fn url_label(&self) -> &str {
        match self {
            RankMatch::Found { url, .. } => url,
            RankMatch::NotFound => Self::SENTINEL,
        }
    }
}

impl Serialize for RankMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RankMatch", 2)?;
        match self {
            RankMatch::Found { rank, url } => {
                s.serialize_field("rank", rank)?;
                s.serialize_field("url", url)?;
            }
            RankMatch::NotFound => {
                s.serialize_field("rank", Self::SENTINEL)?;
                s.serialize_field("url", Self::SENTINEL)?;
            }
        }
        s.end()
    }
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// One provider × retrieval mode combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    GptModelOnly,
    GptWithSearch,
    GeminiModelOnly,
    GeminiWithSearch,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::GptModelOnly,
        Channel::GptWithSearch,
        Channel::GeminiModelOnly,
        Channel::GeminiWithSearch,
    ];

    /// Column label used by the tabular outputs.
    pub fn label(self) -> &'static str {
        match self {
            Channel::GptModelOnly => "GPT",
            Channel::GptWithSearch => "GPT (Web)",
            Channel::GeminiModelOnly => "Gemini",
            Channel::GeminiWithSearch => "Gemini (Web)",
        }
    }

    pub fn uses_search(self) -> bool {
        matches!(self, Channel::GptWithSearch | Channel::GeminiWithSearch)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per [`Channel`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PerChannel<T> {
    pub gpt_model_only: T,
    pub gpt_with_search: T,
    pub gemini_model_only: T,
    pub gemini_with_search: T,
}

impl<T> PerChannel<T> {
    pub fn get(&self, channel: Channel) -> &T {
        match channel {
            Channel::GptModelOnly => &self.gpt_model_only,
            Channel::GptWithSearch => &self.gpt_with_search,
            Channel::GeminiModelOnly => &self.gemini_model_only,
            Channel::GeminiWithSearch => &self.gemini_with_search,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Channel, &T) -> U) -> PerChannel<U> {
        PerChannel {
            gpt_model_only: f(Channel::GptModelOnly, &self.gpt_model_only),
            gpt_with_search: f(Channel::GptWithSearch, &self.gpt_with_search),
            gemini_model_only: f(Channel::GeminiModelOnly, &self.gemini_model_only),
            gemini_with_search: f(Channel::GeminiWithSearch, &self.gemini_with_search),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityStatus {
    Visible,
    Invisible,
    ToolOnly,
    Error,
}

impl VisibilityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityStatus::Visible => "visible",
            VisibilityStatus::Invisible => "invisible",
            VisibilityStatus::ToolOnly => "tool-only",
            VisibilityStatus::Error => "error",
        }
    }
}

impl fmt::Display for VisibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Final outcome for one [`QueryRow`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedResult {
    pub row_index: usize,
    pub original_query: String,
    pub persona: Option<String>,
    pub status: VisibilityStatus,
    /// Why the row ended in `Error` without a classification, if it did.
    pub error: Option<String>,
    pub results: PerChannel<Vec<SerpResult>>,
    pub ranks: PerChannel<RankMatch>,
}

impl ProcessedResult {
    pub fn error(row: &QueryRow, reason: impl Into<String>) -> Self {
        Self {
            row_index: row.row_index,
            original_query: row.query.clone(),
            persona: None,
            status: VisibilityStatus::Error,
            error: Some(reason.into()),
            results: PerChannel::default(),
            ranks: PerChannel::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total: usize,
    pub processed: usize,
    pub visible: usize,
    pub invisible: usize,
    pub tool_only: usize,
    pub errors: usize,
}

impl ProcessingStats {
    /// Count one finished row.
    pub fn record(&mut self, status: VisibilityStatus) {
        self.processed += 1;
        match status {
            VisibilityStatus::Visible => self.visible += 1,
            VisibilityStatus::Invisible => self.invisible += 1,
            VisibilityStatus::ToolOnly => self.tool_only += 1,
            VisibilityStatus::Error => self.errors += 1,
        }
    }
}

impl fmt::Display for ProcessingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Visibility Run Complete ===")?;
        writeln!(f, "Queries:    {}/{}", self.processed, self.total)?;
        let total = self.processed.max(1) as f64;
        let pct = |n: usize| n as f64 / total * 100.0;
        writeln!(f, "Visible:    {} ({:.0}%)", self.visible, pct(self.visible))?;
        writeln!(f, "Tool-only:  {} ({:.0}%)", self.tool_only, pct(self.tool_only))?;
        writeln!(f, "Invisible:  {} ({:.0}%)", self.invisible, pct(self.invisible))?;
        writeln!(f, "Errors:     {} ({:.0}%)", self.errors, pct(self.errors))?;
        Ok(())
    }
}
