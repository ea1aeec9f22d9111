use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontSet, FontStyle};
use crate::model::Fragment;

pub(super) struct WordChunk {
    pub(super) style: FontStyle,
    pub(super) text: String,
    pub(super) color: Option<[u8; 3]>,
    pub(super) x_offset: f32, // x relative to line start
}

pub(super) struct TextLine {
    pub(super) chunks: Vec<WordChunk>,
}

fn finish_line(chunks: &mut Vec<WordChunk>) -> TextLine {
    TextLine {
        chunks: std::mem::take(chunks),
    }
}

/// Greedy word wrap of a fragment at one font size.
/// No space is inserted between spans unless the preceding span ended with
/// whitespace or the next one starts with it ("Slide" + ": 2m" → "Slide: 2m").
/// A word wider than `max_width` gets a line of its own and overflows.
pub(super) fn build_fragment_lines(
    fragment: &Fragment,
    fonts: &FontSet,
    font_size: f32,
    max_width: f32,
) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<WordChunk> = Vec::new();
    let mut current_x: f32 = 0.0;
    let mut prev_ended_with_ws = false;
    let mut prev_space_w: f32 = 0.0;

    for span in &fragment.spans {
        let style = FontStyle::of(span);
        let entry = fonts.get(style);
        let space_w = entry.space_width(font_size);
        let starts_with_ws = span.text.starts_with(char::is_whitespace);

        for (i, word) in span.text.split_whitespace().enumerate() {
            let ww = entry.word_width(word, font_size);
            let need_space = !current.is_empty() && (i > 0 || starts_with_ws || prev_ended_with_ws);
            // The space belongs to whichever span owns the whitespace.
            let gap = match (need_space, i > 0 || starts_with_ws) {
                (false, _) => 0.0,
                (true, true) => space_w,
                (true, false) => prev_space_w,
            };

            if !current.is_empty() && current_x + gap + ww > max_width {
                lines.push(finish_line(&mut current));
                current_x = 0.0;
            } else {
                current_x += gap;
            }

            current.push(WordChunk {
                style,
                text: word.to_string(),
                color: span.color,
                x_offset: current_x,
            });
            current_x += ww;
        }

        if !span.text.is_empty() {
            prev_ended_with_ws = span.text.ends_with(char::is_whitespace);
            prev_space_w = space_w;
        }
    }

    if !current.is_empty() {
        lines.push(finish_line(&mut current));
    }
    lines
}

/// Draw pre-built lines left-aligned starting at `x`.
pub(super) fn render_lines(
    content: &mut Content,
    lines: &[TextLine],
    fonts: &FontSet,
    x: f32,
    first_baseline_y: f32,
    font_size: f32,
    line_pitch: f32,
) {
    let mut current_color: Option<[u8; 3]> = None;
    let mut current_style: Option<FontStyle> = None;

    content.begin_text();
    let mut td_x = 0.0_f32;
    let mut td_y = 0.0_f32;
    for (line_num, line) in lines.iter().enumerate() {
        let y = first_baseline_y - line_num as f32 * line_pitch;
        for chunk in &line.chunks {
            if chunk.color != current_color {
                match chunk.color {
                    Some([r, g, b]) => {
                        content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                    }
                    None => {
                        content.set_fill_gray(0.0);
                    }
                }
                current_color = chunk.color;
            }

            let entry = fonts.get(chunk.style);
            if current_style != Some(chunk.style) {
                content.set_font(Name(entry.pdf_name.as_bytes()), font_size);
                current_style = Some(chunk.style);
            }

            let cx = x + chunk.x_offset;
            content.next_line(cx - td_x, y - td_y);
            td_x = cx;
            td_y = y;
            content.show(Str(&entry.encode(&chunk.text)));
        }
    }
    content.end_text();

    if current_color.is_some() {
        content.set_fill_gray(0.0);
    }
}
