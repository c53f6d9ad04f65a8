//! Stateless helper utilities shared by both renderer kernels.

use std::any::Any;

////////////////////////////////////////////////////////////////////////////////
// #region Colors

/// Parse `#RRGGBB` / `RRGGBB` into an RGB triple.
pub fn parse_hex_rgb(value: &str) -> Option<(u8, u8, u8)> {
    let c_hex = value.trim();
    let c_hex = c_hex.strip_prefix('#').unwrap_or(c_hex);
    if c_hex.len() != 6 || !c_hex.chars().all(|chr| chr.is_ascii_hexdigit()) {
        return None;
    }
    let n_rgb = u32::from_str_radix(c_hex, 16).ok()?;
    Some((
        ((n_rgb >> 16) & 0xFF) as u8,
        ((n_rgb >> 8) & 0xFF) as u8,
        (n_rgb & 0xFF) as u8,
    ))
}

/// Normalize `value` to `#RRGGBB`, or return `default` when missing/invalid.
pub fn resolve_hex_color(value: Option<&str>, default: &str) -> String {
    let Some(c_value) = value else {
        return default.to_string();
    };
    match parse_hex_rgb(c_value) {
        Some((r, g, b)) => format!("#{r:02X}{g:02X}{b:02X}"),
        None => {
            tracing::warn!(color = c_value, fallback = default, "invalid branding color");
            default.to_string()
        }
    }
}

/// RGB triple scaled to `0.0..=1.0` for PDF color operators.
pub fn derive_unit_rgb(value: &str) -> (f32, f32, f32) {
    let (r, g, b) = parse_hex_rgb(value).unwrap_or((0, 0, 0));
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Names

/// Lowercase `title` and collapse whitespace runs into `_`.
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Replace newlines/tabs with spaces; cells are always drawn on one line.
pub fn flatten_single_line(text: &str) -> String {
    if !text.contains(['\n', '\r', '\t']) {
        return text.to_string();
    }
    text.chars()
        .map(|chr| if matches!(chr, '\n' | '\r' | '\t') { ' ' } else { chr })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Panics

/// Best-effort text from a `catch_unwind` payload.
pub fn derive_panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(val) = payload.downcast_ref::<&str>() {
        return (*val).to_string();
    }
    if let Some(val) = payload.downcast_ref::<String>() {
        return val.clone();
    }
    "unexpected internal error".to_string()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
