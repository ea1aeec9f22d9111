use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Everything that shapes a report besides the recorded data itself.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// Assessment categories in report order.
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub layout: LayoutOptions,
    #[serde(default)]
    pub fonts: FontPaths,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryConfig {
    pub key: String,
    /// Field names and sub-headers in display order. `_pass` and `_comment`
    /// fields are grouped with their base field.
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldEntry {
    Field(String),
    Header { header: String },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub column_count: usize,
    pub column_gutter: f32,
    /// Tried largest first until the assessments fit.
    pub font_candidates: Vec<f32>,
    pub title_font_size: f32,
    pub header_title_font_size: f32,
    pub detail_font_size: f32,
    pub line_height: f32,
    pub section_margin: f32,
    /// Space kept clear at the bottom of page one for the footer.
    pub footer_height: f32,
    pub footer_font_size: f32,
    /// Height reserved at the bottom of the last column when a photo is present.
    pub photo_height: f32,
    pub corner_image_size: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 36.0,
            column_count: 4,
            column_gutter: 10.0,
            font_candidates: vec![9.0, 8.0, 7.0, 6.0, 5.0],
            title_font_size: 10.0,
            header_title_font_size: 16.0,
            detail_font_size: 9.0,
            line_height: 1.2,
            section_margin: 6.0,
            footer_height: 48.0,
            footer_font_size: 7.0,
            photo_height: 140.0,
            corner_image_size: 72.0,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FontPaths {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub italic: Option<PathBuf>,
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let l = &self.layout;
        if l.column_count == 0 {
            return Err(Error::InvalidConfig("column_count must be at least 1".into()));
        }
        if l.font_candidates.is_empty() {
            return Err(Error::InvalidConfig("font_candidates must not be empty".into()));
        }
        if l.line_height <= 0.0 || l.title_font_size <= 0.0 {
            return Err(Error::InvalidConfig(
                "line_height and title_font_size must be positive".into(),
            ));
        }
        if l.footer_height <= 0.0 {
            return Err(Error::InvalidConfig("footer_height must be positive".into()));
        }
        let usable_w = l.page_width - 2.0 * l.margin;
        let usable_h = l.page_height - 2.0 * l.margin;
        if usable_w <= 0.0 || usable_h <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "margin {} leaves no room on a {}x{} page",
                l.margin, l.page_width, l.page_height
            )));
        }
        let mut seen = HashSet::new();
        for cat in &self.categories {
            if !seen.insert(cat.key.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "category '{}' listed twice",
                    cat.key
                )));
            }
        }
        Ok(())
    }
}
