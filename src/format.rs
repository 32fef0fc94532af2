//! Human-readable byte-size rendering for status messages and panels.

const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Formats a byte count with base-1024 units and two decimal places.
pub fn format_bytes(bytes: u64) -> String {
    format_bytes_with(bytes, 2)
}

/// Formats a byte count with base-1024 units, rounding to `decimals`
/// places (negative values clamp to zero). Trailing zeros are trimmed,
/// so 1536 bytes renders as "1.5 KB" and 1024 as "1 KB".
pub fn format_bytes_with(bytes: u64, decimals: i32) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let precision = decimals.max(0) as usize;
    let exponent = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let mut rendered = format!("{scaled:.precision$}");
    if rendered.contains('.') {
        while rendered.ends_with('0') {
            rendered.pop();
        }
        if rendered.ends_with('.') {
            rendered.pop();
        }
    }

    format!("{rendered} {}", UNITS[exponent])
}
