pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Trimmed cell text with invisible markers removed, case preserved.
pub(crate) fn clean_cell(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Lenient numeric cell reader: blanks, text and non-finite values yield
/// `None`. Thousands separators and a trailing `%` are tolerated.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let cleaned = clean_cell(value).replace(',', "");
    let trimmed = cleaned.trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}
