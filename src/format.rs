/// Render a byte count as a two-decimal gibibyte string, e.g. `"7.64"`.
/// The dashboard expects bare numbers in GB without a unit suffix.
pub fn format_gb(bytes: u64) -> String {
    const GB: u64 = 1024 * 1024 * 1024;
    format!("{:.2}", bytes as f64 / GB as f64)
}

/// Render a percentage as a two-decimal string, e.g. `"80.00"`.
pub fn format_pct(pct: f64) -> String {
    format!("{pct:.2}")
}

/// Round to two decimal places for numeric wire fields.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
