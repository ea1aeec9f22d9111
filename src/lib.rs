mod blocks;
mod config;
mod error;
mod fonts;
mod labels;
mod model;
mod pdf;

pub use blocks::{
    FieldDescriptor, GroupedEntry, NO_DATA_KEY, NO_KEY, YES_KEY, base_name, build_section,
    build_sections, group_fields,
};
pub use config::{CategoryConfig, FieldEntry, FontPaths, LayoutOptions, ReportConfig};
pub use error::Error;
pub use labels::{LabelResolver, Labels};
pub use model::{
    Column, Detail, EmbeddedImage, FieldValue, Fragment, ImageFormat, InspectionReport, Line,
    LineKind, PassFail, Placed, PlacementEntry, PlacementResult, Point, Record, ReportImages,
    Section, Span, field_value,
};
pub use pdf::{
    COMMENT_COLOR, Canvas, ColumnGrid, CornerBox, FAIL_COLOR, FontCandidates, Measure,
    NOT_APPLICABLE_COLOR, PASS_COLOR, PackOptions, SectionRenderer, StatusGlyphs, aspect_ratio,
    corner_anchor, corner_anchor_with, estimate_height, fit_dimensions, load_image,
    load_image_file, load_report_images, pack, photo_anchor, total_capacity,
};

use std::path::Path;
use std::time::Instant;

/// Render one report to PDF bytes. Images must already be loaded.
pub fn render_report(
    report: &InspectionReport,
    images: &ReportImages,
    config: &ReportConfig,
    labels: &dyn LabelResolver,
) -> Result<Vec<u8>, Error> {
    config.validate()?;
    pdf::render(report, images, config, labels)
}

/// Load report, config and labels from JSON files, render, and write the PDF
/// to `output`. Image paths in the report resolve against the report's
/// directory.
pub fn render_report_to_pdf(
    report_path: &Path,
    config_path: &Path,
    labels_path: &Path,
    output: &Path,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let report: InspectionReport = serde_json::from_str(&std::fs::read_to_string(report_path)?)?;
    let config = ReportConfig::from_path(config_path)?;
    let labels = Labels::from_path(labels_path)?;
    let base_dir = report_path.parent().unwrap_or(Path::new("."));
    let images = load_report_images(&report, base_dir)?;
    let t_load = t0.elapsed();

    let bytes = render_report(&report, &images, &config, &labels)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_load.as_secs_f64() * 1000.0,
        (t_render - t_load).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}
