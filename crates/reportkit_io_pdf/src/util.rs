//! Stateless helper utilities used by the PDF writer kernel.

use reportkit_core::metrics::N_PT_PER_MM;
use reportkit_core::spec::EnumColumnAlign;

use crate::conf::{C_ELLIPSIS, N_FOOTER_RESERVE_MM, N_HEIGHT_ROW_MM, N_PAGE_HEIGHT_MM};

/// Tolerance for millimetre comparisons.
const N_EPS_MM: f64 = 1e-9;

////////////////////////////////////////////////////////////////////////////////
// #region Units

/// Millimetres to points.
pub fn derive_pt(mm: f64) -> f32 {
    (mm * N_PT_PER_MM) as f32
}

/// Distance from the top edge (mm) to a PDF y coordinate (pt).
pub fn derive_y_pt(mm_from_top: f64) -> f32 {
    derive_pt(N_PAGE_HEIGHT_MM - mm_from_top)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Pagination

/// Whether a body row starting at `cursor_top` ends above the footer reserve.
pub fn if_row_fits(cursor_top: f64) -> bool {
    cursor_top + N_HEIGHT_ROW_MM <= N_PAGE_HEIGHT_MM - N_FOOTER_RESERVE_MM + N_EPS_MM
}

/// Body rows that fit below `cursor_top` on one page.
pub fn derive_row_capacity(cursor_top: f64) -> usize {
    let n_free = N_PAGE_HEIGHT_MM - N_FOOTER_RESERVE_MM - cursor_top;
    if n_free < N_HEIGHT_ROW_MM - N_EPS_MM {
        return 0;
    }
    ((n_free + N_EPS_MM) / N_HEIGHT_ROW_MM).floor() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Text

/// Fit `text` into `width_max` on one line.
///
/// Returns the text to draw and whether it was shortened. Shortened text is
/// the longest whole-word prefix plus `"..."`, or failing that the longest
/// character prefix plus `"..."`. A column too narrow for even `"..."` still
/// gets a bare `"..."`, overflowing into the cell padding, so clipped data
/// stays visible.
pub fn truncate_to_width<F>(text: &str, width_max: f64, measure: F) -> (String, bool)
where
    F: Fn(&str) -> f64,
{
    if measure(text) <= width_max {
        return (text.to_string(), false);
    }
    if measure(C_ELLIPSIS) > width_max {
        return (C_ELLIPSIS.to_string(), true);
    }

    let l_idx_breaks: Vec<usize> = text
        .char_indices()
        .filter(|(_, chr)| chr.is_whitespace())
        .map(|(n_idx, _)| n_idx)
        .collect();
    for n_idx in l_idx_breaks.into_iter().rev() {
        let c_prefix = text[..n_idx].trim_end();
        if c_prefix.is_empty() {
            continue;
        }
        let c_candidate = format!("{c_prefix}{C_ELLIPSIS}");
        if measure(&c_candidate) <= width_max {
            return (c_candidate, true);
        }
    }

    // Character fallback: binary search on the prefix length.
    let l_idx_ends: Vec<usize> = text
        .char_indices()
        .map(|(n_idx, chr)| n_idx + chr.len_utf8())
        .collect();
    let (mut n_lo, mut n_hi) = (0usize, l_idx_ends.len());
    while n_lo < n_hi {
        let n_mid = (n_lo + n_hi).div_ceil(2);
        let c_candidate = format!("{}{C_ELLIPSIS}", &text[..l_idx_ends[n_mid - 1]]);
        if measure(&c_candidate) <= width_max {
            n_lo = n_mid;
        } else {
            n_hi = n_mid - 1;
        }
    }
    let c_prefix = match n_lo {
        0 => "",
        n_len => text[..l_idx_ends[n_len - 1]].trim_end(),
    };
    (format!("{c_prefix}{C_ELLIPSIS}"), true)
}

/// Left x of a text run of `width_text` inside a cell.
pub fn derive_aligned_x(
    x_cell: f64,
    width_cell: f64,
    width_text: f64,
    padding_side: f64,
    align: EnumColumnAlign,
) -> f64 {
    match align {
        EnumColumnAlign::Left => x_cell + padding_side,
        EnumColumnAlign::Center => x_cell + (width_cell - width_text) / 2.0,
        EnumColumnAlign::Right => x_cell + width_cell - padding_side - width_text,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use reportkit_core::metrics::{EnumFontWeight, HelveticaMeasure};

    fn measure_chars(text: &str) -> f64 {
        text.chars().count() as f64
    }

    #[test]
    fn test_truncate_keeps_fitting_text() {
        assert_eq!(
            truncate_to_width("Silla", 10.0, measure_chars),
            ("Silla".to_string(), false)
        );
    }

    #[test]
    fn test_truncate_prefers_word_boundary() {
        let (c_text, if_cut) =
            truncate_to_width("Reporte de inventario general", 16.0, measure_chars);
        assert!(if_cut);
        assert_eq!(c_text, "Reporte de...");
    }

    #[test]
    fn test_truncate_falls_back_to_chars() {
        assert_eq!(
            truncate_to_width("abcdefghij", 6.0, measure_chars),
            ("abc...".to_string(), true)
        );
        assert_eq!(
            truncate_to_width("Supercalifragilistic word", 10.0, measure_chars),
            ("Superca...".to_string(), true)
        );
        assert_eq!(
            truncate_to_width("abcdef", 3.0, measure_chars),
            ("...".to_string(), true)
        );
    }

    #[test]
    fn test_truncate_keeps_bare_ellipsis_in_tiny_columns() {
        assert_eq!(
            truncate_to_width("abcdef", 2.0, measure_chars),
            ("...".to_string(), true)
        );
        assert_eq!(
            truncate_to_width("abc", 0.45, |text: &str| {
                HelveticaMeasure::measure_mm(text, EnumFontWeight::Regular, 8.0)
            }),
            ("...".to_string(), true)
        );
    }

    #[test]
    fn test_truncate_long_text_in_narrow_column() {
        let c_raw = "lorem ipsum dolor ".repeat(12);
        let c_raw = c_raw.trim_end();
        assert!(c_raw.chars().count() > 200);
        let n_width_max = 30.0 - 4.0;
        let measure = |text: &str| HelveticaMeasure::measure_mm(text, EnumFontWeight::Regular, 8.0);

        let (c_text, if_cut) = truncate_to_width(c_raw, n_width_max, measure);
        assert!(if_cut);
        assert!(c_text.ends_with("..."));
        assert!(c_text.len() < c_raw.len());
        assert!(measure(&c_text) <= n_width_max);
    }

    #[test]
    fn test_row_capacity() {
        // 192 mm usable; 24 rows of 7 mm from the top margin plus header band.
        assert_eq!(derive_row_capacity(24.0), 24);
        assert_eq!(derive_row_capacity(59.0), 19);
        assert_eq!(derive_row_capacity(190.0), 0);
        assert!(if_row_fits(185.0));
        assert!(!if_row_fits(185.5));
    }

    #[test]
    fn test_aligned_x() {
        assert_eq!(derive_aligned_x(10.0, 30.0, 10.0, 2.0, EnumColumnAlign::Left), 12.0);
        assert_eq!(derive_aligned_x(10.0, 30.0, 10.0, 2.0, EnumColumnAlign::Right), 28.0);
        assert_eq!(derive_aligned_x(10.0, 30.0, 10.0, 2.0, EnumColumnAlign::Center), 20.0);
    }
}
