//! Lightweight markdown-like syntax to SSML.
//!
//! | Input        | Output                                  |
//! |--------------|-----------------------------------------|
//! | `**word**`   | `<emphasis>word</emphasis>`             |
//! | `...`        | `<break time="1s"/>`                    |
//! | `_word_`     | `<prosody rate="slow">word</prosody>`   |
//!
//! Rules run one after another as plain substitutions, in the order above.
//! Nesting is whatever that order yields: `**_hi_**` becomes an emphasis
//! wrapping a slowed span, while `_**hi**_` becomes the reverse.

use regex::Regex;
use std::sync::OnceLock;

pub const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";
pub const SSML_VERSION: &str = "1.0";

struct Rules {
    emphasis: Regex,
    pause: Regex,
    slow: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| Rules {
        emphasis: Regex::new(r"\*\*(.*?)\*\*").expect("static emphasis pattern"),
        pause: Regex::new(r"\.{3}").expect("static pause pattern"),
        slow: Regex::new(r"_(.*?)_").expect("static slow pattern"),
    })
}

/// Rewrites the markup and wraps the result in a `<speak>` document.
///
/// `&`, `<` and `>` in the input are escaped first, so user text never
/// introduces tags of its own. Spans of different kinds that overlap rather
/// than nest come out as crossed tags, e.g. `**a_b** c_`.
pub fn normalize_markup(text: &str) -> String {
    let rules = rules();
    let body = escape_text(text);
    let body = rules
        .emphasis
        .replace_all(&body, "<emphasis>${1}</emphasis>");
    let body = rules.pause.replace_all(&body, r#"<break time="1s"/>"#);
    let body = rules
        .slow
        .replace_all(&body, r#"<prosody rate="slow">${1}</prosody>"#);

    format!(
        "<?xml version=\"1.0\"?>\n<speak version=\"{SSML_VERSION}\" xmlns=\"{SSML_NAMESPACE}\">{body}</speak>"
    )
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(doc: &str) -> &str {
        let start = doc.find('>').and_then(|i| doc[i + 1..].find('>').map(|j| i + j + 2));
        let start = start.expect("speak start tag");
        let end = doc.rfind("</speak>").expect("speak end tag");
        &doc[start..end]
    }

    #[test]
    fn wraps_plain_text_in_speak_root() {
        let doc = normalize_markup("hello there");
        assert!(doc.starts_with("<?xml version=\"1.0\"?>"));
        assert!(doc.contains(
            "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\">"
        ));
        assert!(doc.ends_with("</speak>"));
        assert_eq!(body(&doc), "hello there");
    }

    #[test]
    fn applies_all_three_rules() {
        let doc = normalize_markup("**hi** there...bye _slow_");
        assert_eq!(
            body(&doc),
            r#"<emphasis>hi</emphasis> there<break time="1s"/>bye <prosody rate="slow">slow</prosody>"#
        );
    }

    #[test]
    fn emphasis_is_non_greedy() {
        let doc = normalize_markup("**a** and **b**");
        assert_eq!(body(&doc), "<emphasis>a</emphasis> and <emphasis>b</emphasis>");
    }

    #[test]
    fn longer_dot_runs_leave_a_remainder() {
        let doc = normalize_markup("wait....");
        assert_eq!(body(&doc), r#"wait<break time="1s"/>."#);
        let doc = normalize_markup("end.");
        assert_eq!(body(&doc), "end.");
    }

    #[test]
    fn nested_markup_follows_rule_order() {
        let doc = normalize_markup("**_hi_**");
        assert_eq!(
            body(&doc),
            r#"<emphasis><prosody rate="slow">hi</prosody></emphasis>"#
        );
        let doc = normalize_markup("_**hi**_");
        assert_eq!(
            body(&doc),
            r#"<prosody rate="slow"><emphasis>hi</emphasis></prosody>"#
        );
    }

    #[test]
    fn overlapping_spans_cross_tags() {
        let doc = normalize_markup("**a_b** c_");
        assert_eq!(
            body(&doc),
            r#"<emphasis>a<prosody rate="slow">b</emphasis> c</prosody>"#
        );
    }

    #[test]
    fn unmatched_markers_pass_through() {
        let doc = normalize_markup("a ** b _ c");
        assert_eq!(body(&doc), "a ** b _ c");
    }

    #[test]
    fn escapes_reserved_characters() {
        let doc = normalize_markup("fish & <chips>");
        assert_eq!(body(&doc), "fish &amp; &lt;chips&gt;");
    }
}
