/// Cut long free text for terminal display, on a char boundary, with a
/// trailing ellipsis. Text at or under the limit passes through untouched.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Forecast cell rendering: two decimals, "—" for a hole left by a short
/// series.
pub fn fmt_price(value: f64) -> String {
    format!("{value:.2}")
}

pub fn fmt_opt_price(value: Option<f64>) -> String {
    value.map(fmt_price).unwrap_or_else(|| "—".into())
}
