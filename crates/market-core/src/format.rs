//! Abbreviated rendering of large magnitudes (volume, market cap).

const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Render `n` as a short human-readable string, e.g. `1.50M` or `2.50T`.
///
/// Values below one thousand are printed as whole numbers (truncated).
/// Zero, NaN and infinities render as `"0"`.
pub fn format_magnitude(n: f64) -> String {
    if n == 0.0 || !n.is_finite() {
        return "0".to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let abs = n.abs();

    for (scale, suffix) in SCALES {
        if abs >= scale {
            return format!("{}{:.2}{}", sign, abs / scale, suffix);
        }
    }

    let whole = abs.trunc() as i64;
    if whole == 0 {
        return "0".to_string();
    }
    format!("{}{}", sign, whole)
}
