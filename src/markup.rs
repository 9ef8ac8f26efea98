use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());
static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

/// Expand the limited markup allowed in microblog content into HTML.
/// Angle brackets are escaped first, then `![alt](url)` images, `[text](url)`
/// links, and line breaks. Pure text transform; the renderer injects the
/// result.
pub fn render_microblog(text: &str) -> String {
    let safe = text.replace('<', "&lt;").replace('>', "&gt;");
    let safe = IMAGE_PATTERN.replace_all(
        &safe,
        "<div class=\"weibo-media\"><img src=\"$2\" alt=\"$1\"></div>",
    );
    // image syntax was consumed above, so what is left is plain links
    let safe = LINK_PATTERN.replace_all(&safe, "<a href=\"$2\" target=\"_blank\">$1</a>");
    safe.replace('\n', "<br>")
}

/// Human-readable timestamp for post headers. Unparseable input is shown
/// as-is rather than dropped.
pub fn format_date(iso: &str) -> String {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(iso) {
        return stamp.format("%B %-d, %Y, %-I:%M %p").to_string();
    }
    if let Ok(day) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return day.format("%B %-d, %Y").to_string();
    }
    iso.to_owned()
}
