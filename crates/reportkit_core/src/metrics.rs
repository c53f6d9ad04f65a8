//! Text measurement backends for the layout engine.
//!
//! Spreadsheets are measured in character-width units; documents in
//! millimetres using the AFM advance widths of the standard Helvetica faces,
//! applied to the exact WinAnsi bytes the document renderer will emit.

use crate::conf::N_WIDTH_NON_ASCII_FACTOR;

/// Points per millimetre.
pub const N_PT_PER_MM: f64 = 72.0 / 25.4;

/// Helvetica advance widths for bytes `0x20..=0x7E` (1/1000 em).
const TUP_HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold advance widths for bytes `0x20..=0x7E` (1/1000 em).
const TUP_HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

const N_WIDTH_FALLBACK: u16 = 556;

/// Font face used for a measured string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumFontWeight {
    Regular,
    Bold,
}

/// Width of rendered text in the caller's output units.
pub trait TextMeasure {
    fn measure(&self, text: &str, weight: EnumFontWeight) -> f64;
}

/// Character-width units, as used for spreadsheet column widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharUnitMeasure;

impl TextMeasure for CharUnitMeasure {
    fn measure(&self, text: &str, _weight: EnumFontWeight) -> f64 {
        estimate_unicode_string_width(text) as f64
    }
}

/// Helvetica widths in millimetres; labels and body use separate sizes.
#[derive(Debug, Clone, Copy)]
pub struct HelveticaMeasure {
    /// Font size (pt) used for bold text.
    pub font_size_label: f64,
    /// Font size (pt) used for regular text.
    pub font_size_body: f64,
}

impl HelveticaMeasure {
    pub fn new(font_size_label: f64, font_size_body: f64) -> Self {
        Self {
            font_size_label,
            font_size_body,
        }
    }

    /// Width in points of `text` at `font_size`.
    pub fn measure_pt(text: &str, weight: EnumFontWeight, font_size: f64) -> f64 {
        let n_units: u32 = encode_winansi(text)
            .into_iter()
            .map(|byte| u32::from(derive_glyph_width(byte, weight)))
            .sum();
        f64::from(n_units) / 1000.0 * font_size
    }

    /// Width in millimetres of `text` at `font_size`.
    pub fn measure_mm(text: &str, weight: EnumFontWeight, font_size: f64) -> f64 {
        Self::measure_pt(text, weight, font_size) / N_PT_PER_MM
    }
}

impl TextMeasure for HelveticaMeasure {
    fn measure(&self, text: &str, weight: EnumFontWeight) -> f64 {
        let n_font_size = match weight {
            EnumFontWeight::Regular => self.font_size_body,
            EnumFontWeight::Bold => self.font_size_label,
        };
        Self::measure_mm(text, weight, n_font_size)
    }
}

/// Rough display width: ASCII counts 1, everything else 1.6.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * N_WIDTH_NON_ASCII_FACTOR).round() as usize
}

////////////////////////////////////////////////////////////////////////////////
// #region WinAnsi

/// Encode text for the standard 14 fonts. Line breaks and tabs become spaces;
/// characters outside WinAnsi become `?`.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars().map(encode_winansi_char).collect()
}

/// Whether `chr` has a WinAnsi glyph (line breaks and tabs count as spaces).
pub fn is_winansi_encodable(chr: char) -> bool {
    chr == '?' || encode_winansi_char(chr) != b'?'
}

fn encode_winansi_char(chr: char) -> u8 {
    match chr {
        '\n' | '\r' | '\t' => b' ',
        ' '..='~' => chr as u8,
        '\u{A0}'..='\u{FF}' => chr as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}

/// Advance width (1/1000 em) of one WinAnsi byte.
pub fn derive_glyph_width(byte: u8, weight: EnumFontWeight) -> u16 {
    let tup_widths = match weight {
        EnumFontWeight::Regular => &TUP_HELVETICA_WIDTHS,
        EnumFontWeight::Bold => &TUP_HELVETICA_BOLD_WIDTHS,
    };
    match byte {
        0x20..=0x7E => tup_widths[usize::from(byte - 0x20)],
        0x85 | 0x97 | 0x99 => 1000,
        0x96 | 0x80 => 556,
        0x95 => 350,
        0x82 | 0x91 | 0x92 => match weight {
            EnumFontWeight::Regular => 222,
            EnumFontWeight::Bold => 278,
        },
        0x84 | 0x93 | 0x94 => match weight {
            EnumFontWeight::Regular => 333,
            EnumFontWeight::Bold => 500,
        },
        0xA0 => tup_widths[0],
        0xC6 => 1000,
        0xE6 => 889,
        0xD7 | 0xF7 => 584,
        _ => match derive_latin1_base(byte) {
            Some(base) => tup_widths[usize::from(base - 0x20)],
            None => N_WIDTH_FALLBACK,
        },
    }
}

/// Unaccented ASCII letter sharing the advance width of a Latin-1 letter.
fn derive_latin1_base(byte: u8) -> Option<u8> {
    let base = match byte {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD0 => b'D',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xDE => b'P',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xEC..=0xEF => b't',
        0xF0 | 0xF2..=0xF6 | 0xF8 => b'o',
        0xF1 => b'n',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        0xFE => b'p',
        _ => return None,
    };
    Some(base)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
