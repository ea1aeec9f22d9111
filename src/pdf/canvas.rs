use pdf_writer::{Content, Name};

use crate::fonts::{FontSet, FontStyle};
use crate::model::{EmbeddedImage, Fragment, Point};

use super::layout::{build_fragment_lines, render_lines};

/// Height of wrapped text. Everything the packer knows about text size comes
/// through here.
pub trait Measure {
    /// Height of `fragment` wrapped to `width` at `font_size`. Empty fragments
    /// measure 0.
    fn measure_height(&self, fragment: &Fragment, font_size: f32, width: f32) -> f32;
}

/// Drawing surface. Text is positioned by its top-left corner, images by their
/// bottom-left corner (PDF user space, y grows upwards).
pub trait Canvas: Measure {
    fn draw_text(&mut self, fragment: &Fragment, at: Point, width: f32, font_size: f32);
    fn draw_image(&mut self, image: &EmbeddedImage, at: Point, width: f32, height: f32);
}

/// Pages drawn so far plus the images they reference by XObject name.
pub(crate) struct CanvasOutput {
    pub(crate) pages: Vec<Content>,
    pub(crate) images: Vec<(String, EmbeddedImage)>,
}

pub(crate) struct PdfCanvas<'f> {
    fonts: &'f FontSet,
    line_height: f32,
    current: Content,
    finished: Vec<Content>,
    images: Vec<(String, EmbeddedImage)>,
}

impl<'f> PdfCanvas<'f> {
    pub(crate) fn new(fonts: &'f FontSet, line_height: f32) -> Self {
        Self {
            fonts,
            line_height,
            current: Content::new(),
            finished: Vec::new(),
            images: Vec::new(),
        }
    }

    pub(crate) fn new_page(&mut self) {
        self.finished
            .push(std::mem::replace(&mut self.current, Content::new()));
    }

    pub(crate) fn draw_rule(&mut self, x1: f32, x2: f32, y: f32, gray: f32) {
        self.current.save_state();
        self.current.set_stroke_gray(gray);
        self.current.set_line_width(0.5);
        self.current.move_to(x1, y);
        self.current.line_to(x2, y);
        self.current.stroke();
        self.current.restore_state();
    }

    pub(crate) fn finish(mut self) -> CanvasOutput {
        self.finished.push(self.current);
        CanvasOutput {
            pages: self.finished,
            images: self.images,
        }
    }

    fn image_name(&mut self, image: &EmbeddedImage) -> String {
        if let Some((name, _)) = self.images.iter().find(|(_, img)| img.data == image.data) {
            return name.clone();
        }
        let name = format!("Im{}", self.images.len() + 1);
        self.images.push((name.clone(), image.clone()));
        name
    }
}

impl Measure for PdfCanvas<'_> {
    fn measure_height(&self, fragment: &Fragment, font_size: f32, width: f32) -> f32 {
        if fragment.is_empty() {
            return 0.0;
        }
        let lines = build_fragment_lines(fragment, self.fonts, font_size, width);
        lines.len() as f32 * font_size * self.line_height
    }
}

impl Canvas for PdfCanvas<'_> {
    fn draw_text(&mut self, fragment: &Fragment, at: Point, width: f32, font_size: f32) {
        if fragment.is_empty() {
            return;
        }
        let lines = build_fragment_lines(fragment, self.fonts, font_size, width);
        let line_pitch = font_size * self.line_height;
        // Center the ascent within the first line's pitch.
        let ascent = font_size * self.fonts.get(FontStyle::Regular).ascender_ratio;
        let first_baseline = at.y - (line_pitch - font_size) / 2.0 - ascent;
        render_lines(
            &mut self.current,
            &lines,
            self.fonts,
            at.x,
            first_baseline,
            font_size,
            line_pitch,
        );
    }

    fn draw_image(&mut self, image: &EmbeddedImage, at: Point, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let name = self.image_name(image);
        self.current.save_state();
        self.current.transform([width, 0.0, 0.0, height, at.x, at.y]);
        self.current.x_object(Name(name.as_bytes()));
        self.current.restore_state();
    }
}
