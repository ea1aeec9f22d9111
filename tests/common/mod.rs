#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use inspection_pdf::{
    CategoryConfig, FieldEntry, Fragment, InspectionReport, Labels, Line, Measure, ReportConfig,
    Section,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every non-empty fragment is exactly one line tall, whatever the width.
pub struct OneLineMeasure {
    pub line_height: f32,
}

impl Default for OneLineMeasure {
    fn default() -> Self {
        Self { line_height: 1.2 }
    }
}

impl Measure for OneLineMeasure {
    fn measure_height(&self, fragment: &Fragment, font_size: f32, _width: f32) -> f32 {
        if fragment.is_empty() {
            0.0
        } else {
            font_size * self.line_height
        }
    }
}

/// Sections titled "Section N" holding `counts[N]` plain value lines.
pub fn synthetic_sections(counts: &[usize]) -> Vec<Section> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &n)| Section {
            title: format!("Section {i}"),
            lines: (0..n)
                .map(|j| Line::value(Some(format!("Field {i}.{j}")), Some("ok".into()), None))
                .collect(),
        })
        .collect()
}

pub fn field(name: &str) -> FieldEntry {
    FieldEntry::Field(name.to_string())
}

pub fn header(key: &str) -> FieldEntry {
    FieldEntry::Header {
        header: key.to_string(),
    }
}

pub fn category(key: &str, fields: Vec<FieldEntry>) -> CategoryConfig {
    CategoryConfig {
        key: key.to_string(),
        fields,
    }
}

pub const LABELS_JSON: &str = r#"{
    "pdf": {
        "title": "Play Equipment Inspection Certificate",
        "assessments": { "no_data": "No assessment data recorded" },
        "details": {
            "unit": "Unit",
            "inspector": "Inspector",
            "date": "Inspection date"
        }
    },
    "shared": {
        "yes": "Yes",
        "no": "No",
        "pass": "PASS",
        "fail": "FAIL",
        "not_applicable": "N/A"
    },
    "slide": {
        "title": "Slide",
        "fields": {
            "slide_platform_height": "Platform height",
            "slide_wall_height": "Wall height",
            "runout": "Runout",
            "clip_check": "Clip check"
        },
        "headers": { "walls": "Walls" }
    },
    "structure": {
        "title": "Structure",
        "fields": {
            "seam_integrity": "Seam integrity",
            "uses_lifting_straps": "Lifting straps",
            "stitch_length": "Stitch length"
        }
    },
    "anchorage": {
        "title": "Anchorage",
        "fields": {
            "num_anchors": "Anchors",
            "anchor_type": "Anchor type"
        }
    },
    "materials": {
        "title": "Materials",
        "fields": { "fabric": "Fabric" }
    }
}"#;

pub fn sample_labels() -> Labels {
    Labels::from_json_str(LABELS_JSON).expect("sample labels parse")
}

pub const CONFIG_JSON: &str = r#"{
    "categories": [
        { "key": "slide", "fields": [
            "slide_platform_height",
            "slide_platform_height_comment",
            { "header": "slide.headers.walls" },
            "slide_wall_height",
            "slide_wall_height_pass",
            "runout_pass",
            "runout_comment",
            "clip_check_pass"
        ] },
        { "key": "structure", "fields": [
            "seam_integrity_pass",
            "seam_integrity_comment",
            "uses_lifting_straps",
            "stitch_length"
        ] },
        { "key": "anchorage", "fields": ["num_anchors", "num_anchors_pass", "anchor_type"] },
        { "key": "materials", "fields": ["fabric", "fabric_pass"] }
    ],
    "layout": { "column_count": 3 }
}"#;

pub fn sample_config() -> ReportConfig {
    ReportConfig::from_json_str(CONFIG_JSON).expect("sample config parses")
}

pub const REPORT_JSON: &str = r#"{
    "details": [
        { "label": "pdf.details.unit", "value": "Castle Deluxe 4x4" },
        { "label": "pdf.details.inspector", "value": "A. Inspector" },
        { "label": "pdf.details.date", "value": "2026-03-14" }
    ],
    "footer": "Certificate ref 2026-0042. Verify at the issuer's website.",
    "assessments": {
        "slide": {
            "slide_platform_height": 1.8,
            "slide_platform_height_comment": "Measured at centre",
            "slide_wall_height": 1.2,
            "slide_wall_height_pass": true,
            "runout_pass": "fail",
            "runout_comment": "Runout too short for platform height",
            "clip_check_pass": null
        },
        "structure": {
            "seam_integrity_pass": true,
            "seam_integrity_comment": "  ",
            "uses_lifting_straps": false,
            "stitch_length": 9
        },
        "anchorage": {
            "num_anchors": 6,
            "num_anchors_pass": "pass",
            "anchor_type": null
        }
    }
}"#;

pub fn sample_report() -> InspectionReport {
    serde_json::from_str(REPORT_JSON).expect("sample report parses")
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode png");
    buf
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 90, 160]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .expect("encode jpeg");
    buf
}

/// Output directory: tests/output/<name>/
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    std::fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
