use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// Turn review markup into a single line of plain text.
///
/// `<br>` variants become newlines, the markup is run through the HTML
/// parser (decodes entities, drops residual tags), then `clean_text` folds
/// the lines. The result is plain text: escaped brackets come out as literal
/// `<` and `>`, so feed it to `clean_text`, never back into this function.
pub fn sanitize_content(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }

    let with_newlines = LINE_BREAK_RE.replace_all(markup, "\n");
    clean_text(&decode_markup(&with_newlines))
}

/// Fold already-plain text onto one line: every whitespace run holding a
/// newline becomes one space, ends trimmed. `<` and `&` are left alone.
/// A no-op on the output of `sanitize_content` and on its own output.
pub fn clean_text(text: &str) -> String {
    NEWLINE_RUN_RE.replace_all(text, " ").trim().to_string()
}

fn decode_markup(markup: &str) -> String {
    if !markup.contains(['<', '&']) {
        return markup.to_string();
    }
    let fragment = Html::parse_fragment(markup);
    fragment.root_element().text().collect()
}

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_breaks_become_single_spaces() {
        assert_eq!(sanitize_content("Great game<br>10/10<BR/>would play<br />again"), "Great game 10/10 would play again");
        assert_eq!(sanitize_content("first<br><br>\n  <br>second"), "first second");
    }

    #[test]
    fn entities_decoded_and_tags_stripped() {
        let raw = "  Tom &amp; Jerry &quot;classic&quot; <b>bold</b> <i>move</i>&#33;\n";
        assert_eq!(sanitize_content(raw), "Tom & Jerry \"classic\" bold move!");
    }

    #[test]
    fn non_tag_angle_brackets_survive() {
        assert_eq!(sanitize_content("I <3 this game"), "I <3 this game");
    }

    #[test]
    fn idempotent_on_clean_text() {
        let inputs = [
            "Great game<br>10/10",
            "Tom &amp; Jerry <span class=\"bb_spoiler\">spoiler</span>",
            "很好玩<br/>真的",
            "",
            "   ",
        ];
        for input in inputs {
            let once = sanitize_content(input);
            assert_eq!(sanitize_content(&once), once, "input: {input:?}");
            assert_eq!(clean_text(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn escaped_brackets_survive_recleaning() {
        let once = sanitize_content("I &lt;3 this &lt;spoiler&gt;boss dies&lt;/spoiler&gt;");
        assert_eq!(once, "I <3 this <spoiler>boss dies</spoiler>");
        assert_eq!(clean_text(&once), once);

        let once = sanitize_content("it's &lt;so good, trust me");
        assert_eq!(once, "it's <so good, trust me");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn clean_text_folds_lines_only() {
        assert_eq!(clean_text("  one\r\n two \n\nthree "), "one two three");
        assert_eq!(clean_text("a <b>bold</b> &amp; claim"), "a <b>bold</b> &amp; claim");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn empty_markup() {
        assert_eq!(sanitize_content(""), "");
        assert_eq!(sanitize_content("<br><br>"), "");
    }

    #[test]
    fn normalize_ws_collapses_runs() {
        assert_eq!(normalize_ws("  Posted \t 11\n February  "), "Posted 11 February");
    }
}
