use crate::error::Error;
use crate::labels::LabelResolver;
use crate::model::{Fragment, Line, LineKind, PassFail, Span};

use super::canvas::Measure;

pub const PASS_COLOR: [u8; 3] = [0, 128, 0];
pub const FAIL_COLOR: [u8; 3] = [192, 0, 0];
pub const NOT_APPLICABLE_COLOR: [u8; 3] = [128, 128, 128];
pub const COMMENT_COLOR: [u8; 3] = [80, 80, 120];

/// Localized status markers drawn in front of pass/fail lines.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusGlyphs {
    pub pass: String,
    pub fail: String,
    pub not_applicable: String,
}

impl Default for StatusGlyphs {
    fn default() -> Self {
        Self {
            pass: "PASS".to_string(),
            fail: "FAIL".to_string(),
            not_applicable: "N/A".to_string(),
        }
    }
}

impl StatusGlyphs {
    pub fn from_labels(labels: &dyn LabelResolver) -> Result<Self, Error> {
        Ok(Self {
            pass: labels.translate("shared.pass")?,
            fail: labels.translate("shared.fail")?,
            not_applicable: labels.translate("shared.not_applicable")?,
        })
    }

    fn span(&self, status: PassFail) -> Span {
        let (text, color) = match status {
            PassFail::Pass => (&self.pass, PASS_COLOR),
            PassFail::Fail => (&self.fail, FAIL_COLOR),
            PassFail::NotApplicable => (&self.not_applicable, NOT_APPLICABLE_COLOR),
        };
        Span::bold(format!("{text} ")).colored(color)
    }
}

/// Turns Lines into styled fragments.
#[derive(Clone, Debug, Default)]
pub struct SectionRenderer {
    glyphs: StatusGlyphs,
}

impl SectionRenderer {
    pub fn new(glyphs: StatusGlyphs) -> Self {
        Self { glyphs }
    }

    pub fn title(&self, title: &str) -> Fragment {
        Fragment::new(vec![Span::bold(title)])
    }

    pub fn render(&self, line: &Line) -> Fragment {
        match line.kind {
            LineKind::Header => {
                Fragment::new(line.label.iter().map(|l| Span::bold(l.as_str())).collect())
            }
            LineKind::Comment => match line.comment.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => {
                    Fragment::new(vec![Span::italic(text).colored(COMMENT_COLOR)])
                }
                _ => Fragment::default(),
            },
            LineKind::Value => {
                let mut spans = Vec::new();
                if let Some(status) = line.pass_fail {
                    spans.push(self.glyphs.span(status));
                }
                let value = line.value.as_deref().filter(|_| !line.status_only);
                match (&line.label, value) {
                    (Some(label), Some(value)) => {
                        spans.push(Span::bold(label.as_str()));
                        spans.push(Span::plain(format!(": {value}")));
                    }
                    (Some(label), None) => spans.push(Span::bold(label.as_str())),
                    (None, Some(value)) => spans.push(Span::plain(value)),
                    (None, None) => {}
                }
                Fragment::new(spans)
            }
        }
    }

    /// Height of `line` at `font_size`; blank lines measure 0.
    pub fn height(&self, line: &Line, font_size: f32, width: f32, measure: &dyn Measure) -> f32 {
        let fragment = self.render(line);
        if fragment.is_empty() {
            return 0.0;
        }
        measure.measure_height(&fragment, font_size, width)
    }
}
