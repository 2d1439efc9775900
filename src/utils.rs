//! Value formatting helpers shared by the exporter and the CLI.

/// Render a float the way the dataset tooling prints it: shortest round-trip
/// digits, a trailing `.0` on integral values, and a signed two-digit exponent
/// outside `[1e-4, 1e16)`.
///
/// Examples: `52.0`, `-0.87`, `1e-05`, `1.5e+16`, `nan`, `-inf`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // `Debug` already switches to exponent form at the same thresholds.
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Insert thousands separators into an unsigned count.
pub fn format_count(value: usize) -> String {
    let raw = value.to_string();
    let mut grouped_reversed = String::with_capacity(raw.len() + (raw.len() / 3));
    for (idx, ch) in raw.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            grouped_reversed.push(',');
        }
        grouped_reversed.push(ch);
    }
    grouped_reversed.chars().rev().collect()
}
