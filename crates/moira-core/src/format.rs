//! Metric value formatting.

/// Rendered in place of a missing value.
pub const PLACEHOLDER: &str = "—";

const SUFFIXES: [&str; 9] = ["", " K", " M", " G", " T", " P", " E", " Z", " Y"];

/// Renders a metric value with a power-of-1000 suffix.
///
/// The magnitude is the largest `x` with `1000^x <= |value|`; the value is
/// divided by `1000^x`, printed with two decimals, and trailing zeros and a
/// trailing point are cut. Missing and non-finite values render as
/// [`PLACEHOLDER`], or as an empty string when `placeholder` is false.
#[must_use]
pub fn round_value(value: Option<f64>, placeholder: bool) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return if placeholder {
            PLACEHOLDER.to_string()
        } else {
            String::new()
        };
    };
    if value.abs() < f64::EPSILON {
        return "0".to_string();
    }

    let magnitude = value.abs();
    let mut x = 0;
    while x + 1 < SUFFIXES.len() && 1000_f64.powi(x as i32 + 1) <= magnitude {
        x += 1;
    }

    let scaled = if x == 0 {
        value
    } else {
        value / 1000_f64.powi(x as i32)
    };
    let fixed = format!("{scaled:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{}", SUFFIXES[x])
}
