//! HTML to Markdown-flavoured plain text.
//!
//! The conversion is a fixed sequence of rewrite passes over the raw markup.
//! Later passes rely on the earlier ones having run: lists are numbered before
//! the generic `<li>` tags could be stripped, and entities are decoded only
//! after every tag is gone so that `&lt;b&gt;` never turns into markup.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Named entities understood by [`decode_entities`], applied in this order.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&hellip;", "..."),
    ("&copy;", "\u{a9}"),
    ("&reg;", "\u{ae}"),
    ("&trade;", "\u{2122}"),
    ("&#39;", "'"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&ldquo;", "\u{201c}"),
    ("&rdquo;", "\u{201d}"),
    ("&bull;", "\u{2022}"),
    ("&sect;", "\u{a7}"),
];

struct Rules {
    pre: Regex,
    link: Regex,
    bold: Regex,
    italic: Regex,
    headings: Vec<(Regex, String)>,
    ordered_list: Regex,
    unordered_list: Regex,
    list_item: Regex,
    line_break: Regex,
    paragraph_close: Regex,
    paragraph_open: Regex,
    inline_code: Regex,
    blockquote: Regex,
    any_tag: Regex,
    decimal_ref: Regex,
    hex_ref: Regex,
    blank_runs: Regex,
    horizontal_space: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("valid HTML rewrite regex");
        Rules {
            pre: re(r"(?is)<pre[^>]*>(.*?)</pre>"),
            link: re(r#"(?i)<a\s+(?:[^>]*?\s+)?href="([^"]*)"[^>]*>(.*?)</a>"#),
            bold: re(r"(?i)<b>(.*?)</b>|<strong>(.*?)</strong>"),
            italic: re(r"(?i)<i>(.*?)</i>|<em>(.*?)</em>"),
            headings: (1..=6)
                .map(|level| {
                    (
                        re(&format!(r"(?i)<h{level}>(.*?)</h{level}>")),
                        "#".repeat(level),
                    )
                })
                .collect(),
            ordered_list: re(r"(?is)<ol[^>]*>(.*?)</ol>"),
            unordered_list: re(r"(?is)<ul[^>]*>(.*?)</ul>"),
            list_item: re(r"(?i)<li[^>]*>(.*?)</li>"),
            line_break: re(r"(?i)<br\s*/?>"),
            paragraph_close: re(r"(?i)</p>"),
            paragraph_open: re(r"(?i)<p[^>]*>"),
            inline_code: re(r"(?i)<code>(.*?)</code>"),
            blockquote: re(r"(?is)<blockquote[^>]*>(.*?)</blockquote>"),
            any_tag: re(r"<[^>]*>"),
            decimal_ref: re(r"&#(\d+);"),
            hex_ref: re(r"(?i)&#x([0-9a-f]+);"),
            blank_runs: re(r"\n{4,}"),
            horizontal_space: re(r"[ \t]+"),
        }
    })
}

/// Convert an HTML fragment to Markdown-like plain text.
///
/// The output is meant for reading, not for another round of conversion.
pub fn to_markdown(html: &str) -> String {
    let r = rules();

    let mut text = r
        .pre
        .replace_all(html, "\n```\n${1}\n```\n")
        .into_owned();
    text = r.link.replace_all(&text, "[${2}](${1})").into_owned();
    text = wrap_alternatives(&r.bold, &text, "**");
    text = wrap_alternatives(&r.italic, &text, "*");

    for (heading, hashes) in &r.headings {
        text = heading
            .replace_all(&text, |caps: &Captures| format!("\n{hashes} {}\n", &caps[1]))
            .into_owned();
    }

    // Ordered lists first: both list kinds share the <li> markup.
    text = r
        .ordered_list
        .replace_all(&text, |caps: &Captures| {
            let mut counter = 0usize;
            let items = r.list_item.replace_all(&caps[1], |li: &Captures| {
                counter += 1;
                format!("{counter}. {}\n", &li[1])
            });
            format!("\n{items}\n")
        })
        .into_owned();
    text = r
        .unordered_list
        .replace_all(&text, |caps: &Captures| {
            let items = r.list_item.replace_all(&caps[1], "- ${1}\n");
            format!("\n{items}\n")
        })
        .into_owned();

    text = r.line_break.replace_all(&text, "\n").into_owned();
    text = r.paragraph_close.replace_all(&text, "\n\n").into_owned();
    text = r.paragraph_open.replace_all(&text, "").into_owned();
    text = r.inline_code.replace_all(&text, "`${1}`").into_owned();

    text = r
        .blockquote
        .replace_all(&text, |caps: &Captures| {
            let quoted: Vec<String> = caps[1]
                .trim()
                .split('\n')
                .map(|line| format!("> {}", line.trim()))
                .collect();
            format!("\n{}\n", quoted.join("\n"))
        })
        .into_owned();

    text = r.any_tag.replace_all(&text, "").into_owned();
    text = decode_entities(&text);

    text = collapse_blank_runs(&text);
    text = r.horizontal_space.replace_all(&text, " ").into_owned();

    text.trim().to_string()
}

/// Decode the named entities of [`NAMED_ENTITIES`] and numeric references.
///
/// Numeric references may name any Unicode scalar value, including the
/// supplementary planes (`&#x1F600;` is a single emoji). References to
/// surrogates or values past U+10FFFF are left as written.
pub fn decode_entities(text: &str) -> String {
    let r = rules();

    let mut decoded = text.to_string();
    for (entity, replacement) in NAMED_ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }

    decoded = r
        .decimal_ref
        .replace_all(&decoded, |caps: &Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    r.hex_ref
        .replace_all(&decoded, |caps: &Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Collapse every run of four or more newlines to exactly three.
pub fn collapse_blank_runs(text: &str) -> String {
    rules()
        .blank_runs
        .replace_all(text, "\n\n\n")
        .into_owned()
}

/// Wrap whichever alternative matched in `marker`.
fn wrap_alternatives(re: &Regex, text: &str, marker: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        let inner = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        format!("{marker}{inner}{marker}")
    })
    .into_owned()
}
