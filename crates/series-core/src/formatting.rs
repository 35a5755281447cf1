/// Render one series cell as a plain decimal.
///
/// Uses the shortest representation that round-trips, never scientific
/// notation. Integral values carry no fractional part.
///
/// # Examples
///
/// ```
/// use series_core::formatting::format_series_value;
///
/// assert_eq!(format_series_value(1200.0), "1200");
/// assert_eq!(format_series_value(0.0), "0");
/// assert_eq!(format_series_value(-0.0), "0");
/// assert_eq!(format_series_value(122.5), "122.5");
/// ```
pub fn format_series_value(value: f64) -> String {
    if value == 0.0 {
        // Covers -0.0 as well.
        return "0".to_string();
    }
    format!("{}", value)
}

/// Join a series into newline-separated text, one value per line, without a
/// trailing newline.
///
/// # Examples
///
/// ```
/// use series_core::formatting::join_series;
///
/// assert_eq!(join_series(&[500.0, 0.0, 1.5]), "500\n0\n1.5");
/// assert_eq!(join_series(&[]), "");
/// ```
pub fn join_series(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_series_value(*v))
        .collect::<Vec<_>>()
        .join("\n")
}
