//! Plain-text extraction from WordprocessingML parts.
//!
//! Word stores every run of text in its own `<w:t>` element and drops the
//! whitespace between paragraphs, so concatenating the text nodes yields
//! `"Heading textNext paragraph"`. [`insert_word_breaks`] puts a line break
//! back wherever a lowercase letter or digit runs straight into an uppercase
//! letter. It misses uppercase-to-uppercase and punctuation boundaries, and
//! the output format depends on it doing exactly that.

use crate::{ItemizeError, Result};
use roxmltree::{Document, Node, ParsingOptions};
use unicode_general_category::{get_general_category, GeneralCategory};

/// Extract the text content of an XML document, with word breaks inserted.
///
/// Every text node below the root element is concatenated in document order;
/// markup, comments and processing instructions contribute nothing.
///
/// # Errors
///
/// Returns [`ItemizeError::MalformedXml`] when `xml` is not UTF-8 or is not a
/// well-formed XML document.
///
/// ```
/// let text = docx_itemizer::extract_text(b"<w:t xmlns:w=\"urn:w\">fooBar2Baz</w:t>").unwrap();
/// assert_eq!(text, "foo\nBar2\nBaz");
/// ```
pub fn extract_text(xml: &[u8]) -> Result<String> {
    let source = std::str::from_utf8(xml)
        .map_err(|e| ItemizeError::MalformedXml(format!("not UTF-8: {e}")))?;
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(source, options)
        .map_err(|e| ItemizeError::MalformedXml(e.to_string()))?;

    let mut collected = String::new();
    collect_text(doc.root_element(), &mut collected);

    Ok(insert_word_breaks(&collected))
}

fn collect_text(node: Node<'_, '_>, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                out.push_str(text);
            }
        } else if child.is_element() {
            collect_text(child, out);
        }
    }
}

/// Insert `'\n'` between every lowercase→uppercase and digit→uppercase pair.
///
/// Pairs are judged on the input text, so each qualifying boundary gets
/// exactly one break.
///
/// ```
/// use docx_itemizer::insert_word_breaks;
///
/// assert_eq!(insert_word_breaks("helloWorld"), "hello\nWorld");
/// assert_eq!(insert_word_breaks("NASA Report"), "NASA Report");
/// ```
pub fn insert_word_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();

    while let Some(current) = chars.next() {
        out.push(current);
        if let Some(&next) = chars.peek() {
            if next.is_uppercase() && (current.is_lowercase() || is_decimal_digit(current)) {
                out.push('\n');
            }
        }
    }

    out
}

/// Decimal digits of any script (`Nd`). Fractions and numeral letters such
/// as `½` or `Ⅷ` are numeric but are not digits.
fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || get_general_category(c) == GeneralCategory::DecimalNumber
}
