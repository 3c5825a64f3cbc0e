use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One line of text reported by the figure detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedFragment {
    pub text: String,
    /// Normalised to `0.0..=1.0`. Reported but never used for filtering.
    pub confidence: f32,
}

impl RecognizedFragment {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Payload of a successful figure-sum extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractionResult {
    /// Figures joined by `" + "`, e.g. `"12.0 + 8.5"`.
    pub formula: String,
    /// Sum of the figures, e.g. `"20.5"`.
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TableCell {
    pub row_index: u32,
    pub column_index: u32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TableStructure {
    /// 1-based, in document order.
    pub table_number: u32,
    pub row_count: u32,
    pub column_count: u32,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionType {
    Text,
    Tables,
    FigureSum,
}

impl ExtractionType {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(ExtractionType::Text),
            2 => Some(ExtractionType::Tables),
            3 => Some(ExtractionType::FigureSum),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            ExtractionType::Text => 1,
            ExtractionType::Tables => 2,
            ExtractionType::FigureSum => 3,
        }
    }
}

/// Successful `/extract` body, one shape per extraction type.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExtractionResponse {
    Text { text: String },
    Tables { tables: Vec<TableStructure> },
    Figures(ExtractionResult),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
