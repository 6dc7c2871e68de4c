//! Markup and size helpers shared by the form, the preview and the validator.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static EMPTY_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<p>(\s|&nbsp;|<br\s*/?>)*</p>").expect("valid regex")
});

static FILE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(B|KB|MB|GB)?\s*$").expect("valid regex")
});

/// Upload limit applied when a field carries no usable `file_size`.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Escapes special HTML characters in a string.
///
/// Every value that reaches the preview or a form control goes through here,
/// record data included.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Removes every tag and collapses `&nbsp;`, leaving the visible text.
pub fn strip_markup(input: &str) -> String {
    TAG.replace_all(input, "").replace("&nbsp;", " ")
}

/// True when rich text shows nothing once markup is removed.
///
/// `<p><br></p>` is what an editor leaves behind after clearing its content,
/// so it counts as empty.
pub fn is_rich_text_empty(input: &str) -> bool {
    strip_markup(input).trim().is_empty()
}

/// Drops empty paragraphs and turns markup-only content into `""`.
pub fn normalize_rich_text(input: &str) -> String {
    if is_rich_text_empty(input) {
        return String::new();
    }
    EMPTY_PARAGRAPH.replace_all(input, "").trim().to_string()
}

/// Parses a size such as `"10MB"` or `"512 kb"` into bytes.
///
/// Bare numbers are bytes. Anything unparsable yields
/// [`DEFAULT_MAX_FILE_SIZE`].
pub fn parse_file_size(input: &str) -> u64 {
    let Some(caps) = FILE_SIZE.captures(input) else {
        return DEFAULT_MAX_FILE_SIZE;
    };
    let Ok(amount) = caps[1].parse::<f64>() else {
        return DEFAULT_MAX_FILE_SIZE;
    };
    let unit = caps
        .get(2)
        .map_or("B".to_string(), |m| m.as_str().to_ascii_uppercase());
    let factor = match unit.as_str() {
        "KB" => 1024_f64,
        "MB" => 1024_f64 * 1024.0,
        "GB" => 1024_f64 * 1024.0 * 1024.0,
        _ => 1.0,
    };
    (amount * factor).round() as u64
}

/// Formats a byte count for display (`"1.5 MB"`, `"0 Bytes"`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[rstest]
    #[case("<p><br></p>", true)]
    #[case("<p>&nbsp;</p>", true)]
    #[case("", true)]
    #[case("<p>Hi</p>", false)]
    fn rich_text_emptiness(#[case] input: &str, #[case] empty: bool) {
        assert_eq!(is_rich_text_empty(input), empty);
    }

    #[test]
    fn normalization_drops_empty_paragraphs() {
        assert_eq!(
            normalize_rich_text("<p>Hello</p><p><br></p><p> </p>"),
            "<p>Hello</p>"
        );
        assert_eq!(normalize_rich_text("<p><br/></p>"), "");
    }

    #[rstest]
    #[case("10MB", 10 * 1024 * 1024)]
    #[case("512 kb", 512 * 1024)]
    #[case("2048", 2048)]
    #[case("1.5GB", 1_610_612_736)]
    #[case("huge", DEFAULT_MAX_FILE_SIZE)]
    fn file_sizes(#[case] input: &str, #[case] bytes: u64) {
        assert_eq!(parse_file_size(input), bytes);
    }

    #[test]
    fn formats_sizes_with_two_decimals() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }
}
