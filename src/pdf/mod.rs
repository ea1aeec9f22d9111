mod canvas;
mod columns;
mod images;
mod layout;
mod position;
mod section;

use std::collections::{HashMap, HashSet};

use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::blocks::build_sections;
use crate::config::ReportConfig;
use crate::error::Error;
use crate::fonts::{FontStyle, register_fonts};
use crate::labels::LabelResolver;
use crate::model::{Column, Fragment, InspectionReport, Placed, Point, ReportImages, Section, Span};

pub use canvas::{Canvas, Measure};
pub(crate) use canvas::PdfCanvas;
pub use columns::{
    ColumnGrid, FontCandidates, PackOptions, estimate_height, pack, total_capacity,
};
pub(crate) use images::embed_image;
pub use images::{load_image, load_image_file, load_report_images};
pub use position::{
    CornerBox, aspect_ratio, corner_anchor, corner_anchor_with, fit_dimensions, photo_anchor,
};
pub use section::{
    COMMENT_COLOR, FAIL_COLOR, NOT_APPLICABLE_COLOR, PASS_COLOR, SectionRenderer, StatusGlyphs,
};

/// Gray level of the rules under the header and above the footer.
const RULE_GRAY: f32 = 0.6;

/// Everything drawn outside the assessment columns, already localized.
struct Decorations {
    title: Fragment,
    details: Vec<Fragment>,
    footer: Option<Fragment>,
}

fn decorations(report: &InspectionReport, labels: &dyn LabelResolver) -> Result<Decorations, Error> {
    let title = Fragment::new(vec![Span::bold(labels.translate(&report.title)?)]);
    let details = report
        .details
        .iter()
        .map(|d| {
            Ok(Fragment::new(vec![
                Span::bold(labels.translate(&d.label)?),
                Span::plain(format!(": {}", d.value)),
            ]))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let footer = report
        .footer
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| Fragment::new(vec![Span::plain(f)]));
    Ok(Decorations {
        title,
        details,
        footer,
    })
}

fn collect_chars<'a>(
    fragments: impl IntoIterator<Item = &'a Fragment>,
    used: &mut HashMap<FontStyle, HashSet<char>>,
) {
    for fragment in fragments {
        for span in &fragment.spans {
            used.entry(FontStyle::of(span))
                .or_default()
                .extend(span.text.chars());
        }
    }
}

fn section_fragments(sections: &[Section], renderer: &SectionRenderer) -> Vec<Fragment> {
    sections
        .iter()
        .flat_map(|s| {
            std::iter::once(renderer.title(&s.title))
                .chain(s.lines.iter().map(|l| renderer.render(l)))
        })
        .collect()
}

/// Draw the header block and return the y where the columns may start.
fn draw_header(canvas: &mut PdfCanvas<'_>, deco: &Decorations, config: &ReportConfig) -> f32 {
    let l = &config.layout;
    let width = l.page_width - 2.0 * l.margin;
    let mut y = l.page_height - l.margin;

    canvas.draw_text(&deco.title, Point { x: l.margin, y }, width, l.header_title_font_size);
    y -= canvas.measure_height(&deco.title, l.header_title_font_size, width);

    for detail in &deco.details {
        canvas.draw_text(detail, Point { x: l.margin, y }, width, l.detail_font_size);
        y -= canvas.measure_height(detail, l.detail_font_size, width);
    }

    y -= l.section_margin / 2.0;
    canvas.draw_rule(l.margin, l.page_width - l.margin, y, RULE_GRAY);
    y - l.section_margin / 2.0
}

fn draw_footer(canvas: &mut PdfCanvas<'_>, footer: &Fragment, config: &ReportConfig) {
    let l = &config.layout;
    let width = l.page_width - 2.0 * l.margin;
    let rule_y = l.margin + l.footer_height - l.section_margin / 2.0;
    canvas.draw_rule(l.margin, l.page_width - l.margin, rule_y, RULE_GRAY);
    let top = rule_y - l.section_margin / 2.0;
    canvas.draw_text(footer, Point { x: l.margin, y: top }, width, l.footer_font_size);
}

fn corner_box(config: &ReportConfig) -> CornerBox {
    CornerBox {
        size: config.layout.corner_image_size,
        margin: config.layout.margin,
    }
}

fn draw_corner(canvas: &mut PdfCanvas<'_>, images: &ReportImages, config: &ReportConfig, first_page: bool) {
    let Some(corner) = &images.corner else {
        return;
    };
    let l = &config.layout;
    let cb = corner_box(config);
    let (x, y) = corner_anchor_with(l.page_width, l.footer_height, first_page, &cb);
    let (w, h) = fit_dimensions(
        corner.pixel_width as f32,
        corner.pixel_height as f32,
        cb.size,
        cb.size,
    );
    // Right-aligned inside the box.
    canvas.draw_image(corner, Point { x: x + cb.size - w, y }, w, h);
}

fn draw_photo(canvas: &mut PdfCanvas<'_>, images: &ReportImages, last: &Column, config: &ReportConfig) {
    let Some(photo) = &images.photo else {
        return;
    };
    let strip = config.layout.photo_height;
    let size = fit_dimensions(
        photo.pixel_width as f32,
        photo.pixel_height as f32,
        last.width,
        strip,
    );
    let (x, y) = photo_anchor(last, strip, size);
    canvas.draw_image(photo, Point { x, y }, size.0, size.1);
}

/// Additional photos stacked top to bottom, one equal slot each.
fn draw_photo_page(canvas: &mut PdfCanvas<'_>, images: &ReportImages, config: &ReportConfig) {
    let l = &config.layout;
    let width = l.page_width - 2.0 * l.margin;
    let bottom = if images.corner.is_some() {
        l.margin + l.corner_image_size + l.section_margin
    } else {
        l.margin
    };
    let top = l.page_height - l.margin;
    let n = images.additional.len() as f32;
    let slot = ((top - bottom) - l.section_margin * (n - 1.0)) / n;

    let mut y = top;
    for photo in &images.additional {
        let (w, h) = fit_dimensions(
            photo.pixel_width as f32,
            photo.pixel_height as f32,
            width,
            slot,
        );
        let x = l.margin + (width - w) / 2.0;
        canvas.draw_image(photo, Point { x, y: y - h }, w, h);
        y -= slot + l.section_margin;
    }
}

/// Lay out and write one inspection report. All state lives in this call.
pub(crate) fn render(
    report: &InspectionReport,
    images: &ReportImages,
    config: &ReportConfig,
    labels: &dyn LabelResolver,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let l = &config.layout;
    let candidates = FontCandidates::new(l.font_candidates.iter().copied())?;
    let options = PackOptions {
        title_font_size: l.title_font_size,
        section_margin: l.section_margin,
    };

    let sections = build_sections(&config.categories, &report.assessments, labels)?;
    let renderer = SectionRenderer::new(StatusGlyphs::from_labels(labels)?);
    let deco = decorations(report, labels)?;
    let t_build = t0.elapsed();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };
    let catalog_id = alloc();
    let pages_id = alloc();

    let mut used_chars: HashMap<FontStyle, HashSet<char>> = HashMap::new();
    collect_chars(&section_fragments(&sections, &renderer), &mut used_chars);
    collect_chars(
        std::iter::once(&deco.title)
            .chain(&deco.details)
            .chain(deco.footer.as_ref()),
        &mut used_chars,
    );
    let fonts = register_fonts(&mut pdf, &config.fonts, &used_chars, &mut alloc)?;
    let t_fonts = t0.elapsed();

    let mut canvas = PdfCanvas::new(&fonts, l.line_height);
    let columns_top = draw_header(&mut canvas, &deco, config);

    let mut reserved = 0.0;
    if images.photo.is_some() {
        reserved += l.photo_height;
    }
    if images.corner.is_some() {
        reserved += l.corner_image_size;
    }
    let area_bottom = l.margin + l.footer_height;
    let grid = ColumnGrid {
        left: l.margin,
        top: columns_top,
        width: l.page_width - 2.0 * l.margin,
        height: (columns_top - area_bottom).max(0.0),
        column_count: l.column_count,
        gutter: l.column_gutter,
        reserved_last_column_height: reserved,
    };
    let columns = grid.columns();

    let plan = pack(&sections, &columns, &candidates, &options, &renderer, &canvas);
    log::debug!(
        "render: {} sections at {}pt, {} placements",
        sections.len(),
        plan.font_size,
        plan.placements.len()
    );
    if !plan.fits {
        log::warn!(
            "render: assessments exceed {:.0}pt of column space even at {}pt",
            total_capacity(&columns),
            plan.font_size
        );
    }
    if plan.dropped > 0 {
        log::warn!("render: {} items did not fit and were dropped", plan.dropped);
    }
    let t_pack = t0.elapsed();

    for entry in &plan.placements {
        let size = match entry.content {
            Placed::Title(_) => options.title_font_size,
            Placed::Line(_) => entry.font_size,
        };
        let width = columns[entry.column_index].width;
        canvas.draw_text(
            entry.content.fragment(),
            Point { x: entry.x, y: entry.y },
            width,
            size,
        );
    }
    if let Some(last) = columns.last() {
        draw_photo(&mut canvas, images, last, config);
    }
    draw_corner(&mut canvas, images, config, true);
    if let Some(footer) = &deco.footer {
        draw_footer(&mut canvas, footer, config);
    }

    if !images.additional.is_empty() {
        canvas.new_page();
        draw_photo_page(&mut canvas, images, config);
        draw_corner(&mut canvas, images, config, false);
    }
    let output = canvas.finish();
    let t_draw = t0.elapsed();

    let image_xobjects: Vec<(String, Ref)> = output
        .images
        .iter()
        .map(|(name, img)| Ok((name.clone(), embed_image(&mut pdf, img, &mut alloc)?)))
        .collect::<Result<_, Error>>()?;

    let n = output.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let info_id = alloc();

    for (i, c) in output.pages.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let font_pairs = fonts.resource_pairs();
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, l.page_width, l.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let title = deco.title.text();
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr(concat!("inspection-pdf ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();
    let t_write = t0.elapsed();

    log::info!(
        "Render phases: build={:.1}ms, fonts={:.1}ms, pack={:.1}ms, draw={:.1}ms, write={:.1}ms ({} pages, {} bytes)",
        t_build.as_secs_f64() * 1000.0,
        (t_fonts - t_build).as_secs_f64() * 1000.0,
        (t_pack - t_fonts).as_secs_f64() * 1000.0,
        (t_draw - t_pack).as_secs_f64() * 1000.0,
        (t_write - t_draw).as_secs_f64() * 1000.0,
        n,
        bytes.len(),
    );

    Ok(bytes)
}
