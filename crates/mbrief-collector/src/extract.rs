//! Paragraph harvesting from source-page HTML.

use regex::Regex;

/// Paragraphs at or below this length are discarded as navigation chrome.
const MIN_PARAGRAPH_CHARS: usize = 40;

/// Pull readable paragraph text out of a page.
///
/// Strips script/style/noscript blocks, collects the inner text of every
/// `<p>` element, drops paragraphs of 40 chars or fewer, and joins the rest
/// with newlines.
#[must_use]
pub fn extract_paragraphs(html: &str) -> String {
    let stripped = strip_blocks(html);
    let paragraph_re = Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid paragraph regex");

    let mut paragraphs = Vec::new();
    for cap in paragraph_re.captures_iter(&stripped) {
        if let Some(inner) = cap.get(1) {
            let text = normalize_inner_text(inner.as_str());
            if text.chars().count() > MIN_PARAGRAPH_CHARS {
                paragraphs.push(text);
            }
        }
    }
    paragraphs.join("\n")
}

/// Remove script, style, and noscript blocks wholesale.
fn strip_blocks(html: &str) -> String {
    let re = Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>")
        .expect("valid block regex");
    re.replace_all(html, " ").into_owned()
}

/// Flatten markup inside a paragraph to plain text.
fn normalize_inner_text(inner: &str) -> String {
    let tag_re = Regex::new(r"(?s)<[^>]*>").expect("valid tag regex");
    let no_tags = tag_re.replace_all(inner, " ");
    let decoded = decode_entities(&no_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the handful of entities that matter for news copy.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_survive_and_short_ones_drop() {
        let html = "<html><body>\
                    <p>Too short to keep.</p>\
                    <p>The NIFTY 50 index advanced strongly in afternoon trade on Friday.</p>\
                    </body></html>";
        let text = extract_paragraphs(html);
        assert_eq!(
            text,
            "The NIFTY 50 index advanced strongly in afternoon trade on Friday."
        );
    }

    #[test]
    fn script_and_style_blocks_are_removed() {
        let html = "<script>var x = '<p>fake paragraph inside script block text</p>';</script>\
                    <style>.p { color: red; }</style>\
                    <p>Real paragraph content about market movement and daily volumes.</p>";
        let text = extract_paragraphs(html);
        assert_eq!(
            text,
            "Real paragraph content about market movement and daily volumes."
        );
    }

    #[test]
    fn nested_markup_flattens_to_spaced_text() {
        let html = "<p>Shares of <b>HDFC Bank</b> rose after the &amp; quarterly results beat.</p>";
        let text = extract_paragraphs(html);
        assert_eq!(
            text,
            "Shares of HDFC Bank rose after the & quarterly results beat."
        );
    }

    #[test]
    fn multiple_paragraphs_join_with_newlines() {
        let html = "<p>First long paragraph about the market holding steady today.</p>\
                    <p>Second long paragraph about banking shares slipping slightly.</p>";
        let text = extract_paragraphs(html);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn empty_html_yields_empty_text() {
        assert_eq!(extract_paragraphs(""), "");
    }
}
