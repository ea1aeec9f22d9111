//! Newspaper-style column packing for assessment sections.
//!
//! Packing runs in two phases. The font search compares the summed height of
//! all content against the pooled height of all columns; the placement walk
//! then fills columns top to bottom without ever splitting or reordering
//! content. Because content cannot reflow, a size that passes the pooled check
//! can still leave items past the last column. Those items are dropped and
//! counted rather than failing the report.

use crate::error::Error;
use crate::model::{Column, Line, Placed, PlacementEntry, PlacementResult, Section};

use super::canvas::Measure;
use super::section::SectionRenderer;

/// Tolerance for float accumulation when checking remaining column height.
const FIT_EPSILON: f32 = 0.01;

/// Body font sizes to try, largest first.
#[derive(Clone, Debug, PartialEq)]
pub struct FontCandidates(Vec<f32>);

impl FontCandidates {
    /// Sorted descending and deduplicated. Rejects an empty list and
    /// non-positive or non-finite sizes.
    pub fn new(sizes: impl IntoIterator<Item = f32>) -> Result<Self, Error> {
        let mut sizes: Vec<f32> = sizes.into_iter().collect();
        if sizes.is_empty() {
            return Err(Error::InvalidConfig("no font size candidates".into()));
        }
        if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(Error::InvalidConfig(format!("invalid font size candidate {bad}")));
        }
        sizes.sort_by(|a, b| b.total_cmp(a));
        sizes.dedup();
        Ok(Self(sizes))
    }

    pub fn largest(&self) -> f32 {
        self.0[0]
    }

    pub fn smallest(&self) -> f32 {
        self.0[self.0.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for FontCandidates {
    fn default() -> Self {
        Self(vec![9.0, 8.0, 7.0, 6.0, 5.0])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackOptions {
    /// Section titles are measured and drawn at this size regardless of the
    /// chosen body size.
    pub title_font_size: f32,
    /// Vertical gap after each section.
    pub section_margin: f32,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            title_font_size: 10.0,
            section_margin: 6.0,
        }
    }
}

/// Equal-width columns over a rectangular area. The last column gives up
/// `reserved_last_column_height` at its bottom (photo strip).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnGrid {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub column_count: usize,
    pub gutter: f32,
    pub reserved_last_column_height: f32,
}

impl ColumnGrid {
    pub fn column_width(&self) -> f32 {
        if self.column_count == 0 {
            return 0.0;
        }
        let gutters = self.gutter * (self.column_count - 1) as f32;
        ((self.width - gutters) / self.column_count as f32).max(0.0)
    }

    pub fn columns(&self) -> Vec<Column> {
        let w = self.column_width();
        (0..self.column_count)
            .map(|index| {
                let reserved = if index + 1 == self.column_count {
                    self.reserved_last_column_height
                } else {
                    0.0
                };
                Column {
                    index,
                    x: self.left + index as f32 * (w + self.gutter),
                    top_y: self.top,
                    height: (self.height - reserved).max(0.0),
                    width: w,
                }
            })
            .collect()
    }
}

enum Item<'a> {
    Title(&'a str),
    Line(&'a Line),
    Margin,
}

/// Title, lines, margin per section, in section order.
fn flatten(sections: &[Section]) -> Vec<Item<'_>> {
    sections
        .iter()
        .flat_map(|s| {
            std::iter::once(Item::Title(&s.title))
                .chain(s.lines.iter().map(Item::Line))
                .chain(std::iter::once(Item::Margin))
        })
        .collect()
}

fn item_heights(
    items: &[Item<'_>],
    font_size: f32,
    width: f32,
    options: &PackOptions,
    renderer: &SectionRenderer,
    measure: &dyn Measure,
) -> Vec<f32> {
    items
        .iter()
        .map(|item| match item {
            Item::Title(title) => {
                measure.measure_height(&renderer.title(title), options.title_font_size, width)
            }
            Item::Line(line) => renderer.height(line, font_size, width, measure),
            Item::Margin => options.section_margin,
        })
        .collect()
}

/// Sum of all column heights, ignoring how content splits between them.
pub fn total_capacity(columns: &[Column]) -> f32 {
    columns.iter().map(|c| c.height).sum()
}

/// Narrowest column; content is measured once at this width.
fn measure_width(columns: &[Column]) -> f32 {
    columns
        .iter()
        .map(|c| c.width)
        .fold(f32::INFINITY, f32::min)
}

/// Height of all content at `font_size` when measured at `width`.
pub fn estimate_height(
    sections: &[Section],
    font_size: f32,
    width: f32,
    options: &PackOptions,
    renderer: &SectionRenderer,
    measure: &dyn Measure,
) -> f32 {
    let items = flatten(sections);
    item_heights(&items, font_size, width, options, renderer, measure)
        .iter()
        .sum()
}

/// Pick a body font size and place every section into `columns`.
///
/// Returns the largest candidate whose pooled estimate fits, or the smallest
/// candidate with `fits == false`. Never fails.
pub fn pack(
    sections: &[Section],
    columns: &[Column],
    candidates: &FontCandidates,
    options: &PackOptions,
    renderer: &SectionRenderer,
    measure: &dyn Measure,
) -> PlacementResult {
    let items = flatten(sections);

    if columns.is_empty() {
        let dropped = items.iter().filter(|i| !matches!(i, Item::Margin)).count();
        log::warn!("pack: no columns, dropping {dropped} items");
        return PlacementResult {
            font_size: candidates.smallest(),
            placements: Vec::new(),
            fits: false,
            dropped,
        };
    }

    let width = measure_width(columns);
    let capacity = total_capacity(columns);

    let mut chosen: Option<(f32, Vec<f32>)> = None;
    for font_size in candidates.iter() {
        let heights = item_heights(&items, font_size, width, options, renderer, measure);
        let estimate: f32 = heights.iter().sum();
        log::debug!("pack: {font_size}pt needs {estimate:.1}pt of {capacity:.1}pt");
        if estimate <= capacity {
            chosen = Some((font_size, heights));
            break;
        }
    }
    let fits = chosen.is_some();
    let (font_size, heights) = chosen.unwrap_or_else(|| {
        let smallest = candidates.smallest();
        let heights = item_heights(&items, smallest, width, options, renderer, measure);
        (smallest, heights)
    });

    let (placements, dropped) = place(&items, &heights, columns, font_size, renderer);

    PlacementResult {
        font_size,
        placements,
        fits,
        dropped,
    }
}

/// Single walk over the content stream at the chosen size.
fn place(
    items: &[Item<'_>],
    heights: &[f32],
    columns: &[Column],
    font_size: f32,
    renderer: &SectionRenderer,
) -> (Vec<PlacementEntry>, usize) {
    let mut placements = Vec::new();
    let mut col = 0;
    let mut y = columns[0].top_y;

    for (idx, (item, &h)) in items.iter().zip(heights).enumerate() {
        if h <= 0.0 {
            continue;
        }
        let remaining = y - columns[col].bottom();
        if h > remaining + FIT_EPSILON {
            // Margins advance like any other item and then take their space
            // at the top of the new column.
            col += 1;
            if col >= columns.len() {
                let dropped = items[idx..]
                    .iter()
                    .zip(&heights[idx..])
                    .filter(|(i, h)| !matches!(i, Item::Margin) && **h > 0.0)
                    .count();
                return (placements, dropped);
            }
            y = columns[col].top_y;
        }

        let content = match item {
            Item::Title(title) => Placed::Title(renderer.title(title)),
            Item::Line(line) => Placed::Line(renderer.render(line)),
            Item::Margin => {
                y -= h;
                continue;
            }
        };
        placements.push(PlacementEntry {
            content,
            column_index: col,
            x: columns[col].x,
            y,
            font_size,
            height: h,
        });
        y -= h;
    }
    (placements, 0)
}
