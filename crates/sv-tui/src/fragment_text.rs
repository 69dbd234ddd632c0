//! Plain-text rendering of HTML view fragments
//!
//! The terminal cannot lay out HTML, so fragments are reduced to readable
//! lines: scripts and styles are dropped, block-level tags become line
//! breaks, table cells are separated by spaces, and the remaining markup is
//! stripped.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("valid script/style regex")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<br\s*/?>|</?(p|div|tr|li|ul|ol|dl|dt|dd|h[1-6]|table|thead|tbody|section|header|footer|form|fieldset|label)\b[^>]*>",
    )
    .expect("valid block regex")
});

static CELL_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>").expect("valid cell regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\x0c]+").expect("valid whitespace regex"));

/// Reduce an HTML fragment to non-empty text lines
pub fn fragment_lines(html: &str) -> Vec<String> {
    let text = SCRIPT_OR_STYLE.replace_all(html, "");
    let text = COMMENT.replace_all(&text, "");
    let text = CELL_END.replace_all(&text, "  ");
    let text = BLOCK_BREAK.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");

    text.lines()
        .map(|line| decode_entities(SPACES.replace_all(line, " ").trim()))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Decode the handful of entities templates commonly emit
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_tags_become_lines() {
        let lines = fragment_lines("<div><h2>Patient</h2><p>Age: 67</p><p>Gender: Male</p></div>");
        assert_eq!(lines, vec!["Patient", "Age: 67", "Gender: Male"]);
    }

    #[test]
    fn test_scripts_and_styles_are_dropped() {
        let html = "<style>.x { color: red }</style><p>Visible</p><script>\nalert(1);\n</script>";
        assert_eq!(fragment_lines(html), vec!["Visible"]);
    }

    #[test]
    fn test_table_cells_are_separated() {
        let html = "<table><tr><th>ID</th><th>Name</th></tr><tr><td>P-1</td><td>Ada</td></tr></table>";
        assert_eq!(fragment_lines(html), vec!["ID Name", "P-1 Ada"]);
    }

    #[test]
    fn test_entities_are_decoded_once() {
        let lines = fragment_lines("<p>Smoking &amp; alcohol &lt;5&gt; &amp;lt;</p>");
        assert_eq!(lines, vec!["Smoking & alcohol <5> &lt;"]);
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let lines = fragment_lines("<p>\n   Risk:\t\t High   </p><br/><!-- note -->");
        assert_eq!(lines, vec!["Risk: High"]);
    }

    #[test]
    fn test_empty_fragment() {
        assert!(fragment_lines("").is_empty());
        assert!(fragment_lines("<div></div>").is_empty());
    }
}
