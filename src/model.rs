use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Value,
    Comment,
}

/// Outcome of a pass/fail field. Absence is its own state, never a fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassFail {
    Pass,
    Fail,
    NotApplicable,
}

impl PassFail {
    pub fn from_value(value: Option<&FieldValue>) -> Self {
        match value {
            Some(FieldValue::Bool(true)) => PassFail::Pass,
            Some(FieldValue::Bool(false)) => PassFail::Fail,
            Some(FieldValue::Text(s)) if s.eq_ignore_ascii_case("pass") => PassFail::Pass,
            Some(FieldValue::Text(s)) if s.eq_ignore_ascii_case("fail") => PassFail::Fail,
            _ => PassFail::NotApplicable,
        }
    }
}

/// One renderable unit of an assessment: a sub-header, a field, or a comment.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    pub label: Option<String>,
    pub value: Option<String>,
    pub pass_fail: Option<PassFail>,
    pub comment: Option<String>,
    /// The value came from the pass/fail field itself; only the status is shown.
    pub status_only: bool,
}

impl Line {
    pub fn header(label: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Header,
            label: Some(label.into()),
            value: None,
            pass_fail: None,
            comment: None,
            status_only: false,
        }
    }

    pub fn value(label: Option<String>, value: Option<String>, pass_fail: Option<PassFail>) -> Self {
        Self {
            kind: LineKind::Value,
            label,
            value,
            pass_fail,
            comment: None,
            status_only: false,
        }
    }

    pub fn status(label: String, value: String, pass_fail: PassFail) -> Self {
        Self {
            status_only: true,
            ..Self::value(Some(label), Some(value), Some(pass_fail))
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Comment,
            label: None,
            value: None,
            pass_fail: None,
            comment: Some(text.into()),
            status_only: false,
        }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::value(None, Some(text.into()), None)
    }
}

/// One assessment category: its title and lines in display order.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<Line>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Column {
    pub index: usize,
    pub x: f32,
    pub top_y: f32,
    pub height: f32,
    pub width: f32,
}

impl Column {
    pub fn bottom(&self) -> f32 {
        self.top_y - self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<[u8; 3]>, // None = black
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            color: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }

    pub fn colored(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }
}

/// Styled text handed to the measuring/drawing port.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragment {
    pub spans: Vec<Span>,
}

impl Fragment {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.trim().is_empty())
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Placed {
    Title(Fragment),
    Line(Fragment),
}

impl Placed {
    pub fn fragment(&self) -> &Fragment {
        match self {
            Placed::Title(f) | Placed::Line(f) => f,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacementEntry {
    pub content: Placed,
    pub column_index: usize,
    pub x: f32,
    /// Top edge of the placed content.
    pub y: f32,
    pub font_size: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacementResult {
    pub font_size: f32,
    pub placements: Vec<PlacementEntry>,
    pub fits: bool,
    /// Content items discarded because they ran past the last column.
    pub dropped: usize,
}

/// A recorded field value. JSON `null` deserializes to `None` in [`Record`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

pub type Record = BTreeMap<String, Option<FieldValue>>;

/// Present, non-null, non-blank value of `field`.
pub fn field_value<'a>(record: &'a Record, field: &str) -> Option<&'a FieldValue> {
    record
        .get(field)
        .and_then(Option::as_ref)
        .filter(|v| !v.is_blank())
}

#[derive(Clone, Debug, Deserialize)]
pub struct Detail {
    /// Label key, resolved through the label resolver.
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InspectionReport {
    /// Label key for the document title.
    #[serde(default = "default_title_key")]
    pub title: String,
    #[serde(default)]
    pub details: Vec<Detail>,
    /// Category key -> recorded fields. Categories without an entry still render.
    #[serde(default)]
    pub assessments: BTreeMap<String, Record>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub photo: Option<PathBuf>,
    #[serde(default)]
    pub corner_image: Option<PathBuf>,
    #[serde(default)]
    pub additional_photos: Vec<PathBuf>,
}

fn default_title_key() -> String {
    "pdf.title".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Image bytes belonging to one report, already read from disk.
#[derive(Clone, Debug, Default)]
pub struct ReportImages {
    pub photo: Option<EmbeddedImage>,
    pub corner: Option<EmbeddedImage>,
    pub additional: Vec<EmbeddedImage>,
}
