use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::FontPaths;
use crate::error::Error;
use crate::model::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FontStyle {
    Regular,
    Bold,
    Italic,
}

impl FontStyle {
    pub(crate) const ALL: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic];

    /// Bold wins over italic; there is no bold-italic face.
    pub(crate) fn of(span: &Span) -> Self {
        if span.bold {
            FontStyle::Bold
        } else if span.italic {
            FontStyle::Italic
        } else {
            FontStyle::Regular
        }
    }

    fn builtin_name(self) -> &'static [u8] {
        match self {
            FontStyle::Regular => b"Helvetica",
            FontStyle::Bold => b"Helvetica-Bold",
            FontStyle::Italic => b"Helvetica-Oblique",
        }
    }

    fn pdf_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
        }
    }
}

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    widths_1000: Vec<f32>,
    pub(crate) ascender_ratio: f32,
    char_to_gid: Option<HashMap<char, u16>>,
    char_widths_1000: Option<HashMap<char, f32>>,
}

impl FontEntry {
    /// Width of a single character in 1000-units. Embedded fonts answer from
    /// their per-char cache; everything else goes through the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(w) = self.char_widths_1000.as_ref().and_then(|m| m.get(&ch)) {
            return *w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    pub(crate) fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn space_width(&self, font_size: f32) -> f32 {
        self.char_width_1000(' ') * font_size / 1000.0
    }

    /// Bytes for a `Tj` string in this font's encoding.
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// The three faces a report is drawn with.
pub(crate) struct FontSet {
    regular: FontEntry,
    bold: FontEntry,
    italic: FontEntry,
}

impl FontSet {
    pub(crate) fn get(&self, style: FontStyle) -> &FontEntry {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    pub(crate) fn resource_pairs(&self) -> Vec<(String, Ref)> {
        FontStyle::ALL
            .iter()
            .map(|&s| {
                let e = self.get(s);
                (e.pdf_name.clone(), e.font_ref)
            })
            .collect()
    }
}

/// Register all three faces. `used_chars` drives subsetting of embedded fonts.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    paths: &FontPaths,
    used_chars: &HashMap<FontStyle, HashSet<char>>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<FontSet, Error> {
    let empty = HashSet::new();
    let mut register = |style: FontStyle, path: &Option<PathBuf>| {
        let chars = used_chars.get(&style).unwrap_or(&empty);
        register_font(&mut *pdf, style, path.as_deref(), chars, &mut *alloc)
    };
    Ok(FontSet {
        regular: register(FontStyle::Regular, &paths.regular)?,
        bold: register(FontStyle::Bold, &paths.bold)?,
        italic: register(FontStyle::Italic, &paths.italic)?,
    })
}

fn register_font(
    pdf: &mut Pdf,
    style: FontStyle,
    path: Option<&Path>,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<FontEntry, Error> {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();
    let pdf_name = style.pdf_name().to_string();

    let Some(path) = path else {
        pdf.type1_font(font_ref)
            .base_font(Name(style.builtin_name()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        return Ok(FontEntry {
            pdf_name,
            font_ref,
            widths_1000: helvetica_widths(style == FontStyle::Bold),
            ascender_ratio: 0.718,
            char_to_gid: None,
            char_widths_1000: None,
        });
    };

    let resolved = resolve_font_path(path)
        .ok_or_else(|| Error::Font(format!("font file not found: {}", path.display())))?;
    let file = std::fs::File::open(&resolved)?;
    let data = unsafe { Mmap::map(&file) }?;
    let font_name = resolved
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Embedded")
        .to_string();

    let metrics = embed_truetype(pdf, font_ref, &font_name, &data, used_chars, alloc)
        .ok_or_else(|| Error::Font(format!("cannot parse font file {}", resolved.display())))?;

    log::debug!(
        "register_font: {style:?} from {} ({} glyphs) → {:.1}ms",
        resolved.display(),
        metrics.char_to_gid.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    Ok(FontEntry {
        pdf_name,
        font_ref,
        widths_1000: metrics.widths_1000,
        ascender_ratio: metrics.ascender_ratio,
        char_to_gid: Some(metrics.char_to_gid),
        char_widths_1000: Some(metrics.char_widths_1000),
    })
}

/// Directories searched for relative font file names: `INSPECTION_PDF_FONTS`
/// first, then the platform font directories.
fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    if let Ok(val) = std::env::var("INSPECTION_PDF_FONTS") {
        dirs.extend(
            std::env::split_paths(&val).filter(|p| !p.as_os_str().is_empty()),
        );
    }

    #[cfg(target_os = "macos")]
    {
        dirs.extend(["/Library/Fonts".into(), "/System/Library/Fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn resolve_font_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }
    font_directories()
        .into_iter()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

/// Windows-1252 bytes 0x80..=0x9F that do not map straight to a codepoint.
const WINANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

fn winansi_to_char(byte: u8) -> char {
    WINANSI_HIGH
        .iter()
        .find(|(b, _)| *b == byte)
        .map(|(_, c)| *c)
        .unwrap_or(byte as char)
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F | 0x00A0..=0x00FF => c as u8,
        _ => WINANSI_HIGH
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(b, _)| *b)
            .unwrap_or(0),
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes. Unmappable chars
/// are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match c as u32 {
            0x0000..=0x001F => Some(c as u8),
            _ => Some(char_to_winansi(c)).filter(|&b| b != 0),
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| char_to_gid.get(&ch).copied().unwrap_or(0).to_be_bytes())
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
/// The bold face runs roughly 5% wider.
fn helvetica_widths(bold: bool) -> Vec<f32> {
    let scale = if bold { 1.05 } else { 1.0 };
    (32u8..=255u8)
        .map(|b| {
            let w = match b {
                32 => 278.0,                          // space
                33..=47 => 333.0,                     // punctuation
                48..=57 => 556.0,                     // digits
                58..=64 => 333.0,                     // more punctuation
                73 | 74 => 278.0,                     // I J (narrow uppercase)
                77 => 833.0,                          // M (wide)
                65..=90 => 667.0,                     // uppercase A-Z (average)
                91..=96 => 333.0,                     // brackets etc.
                102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
                109 | 119 => 833.0,                   // m w (wide)
                97..=122 => 556.0,                    // lowercase a-z (average)
                _ => 556.0,
            };
            w * scale
        })
        .collect()
}

struct TrueTypeMetrics {
    widths_1000: Vec<f32>,
    ascender_ratio: f32,
    char_to_gid: HashMap<char, u16>,
    char_widths_1000: HashMap<char, f32>,
}

/// Embed a TrueType/OpenType font as a Type0 CIDFont with Identity-H encoding,
/// subsetted to `used_chars`.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<TrueTypeMetrics> {
    let face = Face::parse(font_data, 0).ok()?;
    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let advance = |ch: char| {
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(|adv| to_1000(adv as f32))
    };

    let widths_1000: Vec<f32> = (32u8..=255u8)
        .map(|byte| advance(winansi_to_char(byte)).unwrap_or(0.0))
        .collect();

    // Space is always needed for measuring, even if never drawn.
    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut char_widths_1000 = HashMap::new();
    for &ch in used_chars.iter().chain(std::iter::once(&' ')) {
        if let Some(gid) = face.glyph_index(ch) {
            char_to_gid.insert(ch, remapper.remap(gid.0));
            char_widths_1000.insert(ch, advance(ch).unwrap_or(0.0));
        }
    }

    let subset_data = subsetter::subset(font_data, 0, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
        font_data.to_vec()
    });

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");
    let bb = face.global_bounding_box();
    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(
            to_1000(bb.x_min as f32),
            to_1000(bb.y_min as f32),
            to_1000(bb.x_max as f32),
            to_1000(bb.y_max as f32),
        ))
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(face.capital_height().map(|h| to_1000(h as f32)).unwrap_or(700.0))
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .map(|(ch, &new_gid)| (new_gid, char_widths_1000.get(ch).copied().unwrap_or(0.0)))
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    pdf.stream(tounicode_ref, cmap.finish().as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(TrueTypeMetrics {
        widths_1000,
        ascender_ratio: face.ascender() as f32 / units,
        char_to_gid,
        char_widths_1000,
    })
}
