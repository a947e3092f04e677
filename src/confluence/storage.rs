//! Confluence storage-format (XHTML) helpers.

use crate::db::models::Requester;

const BLOCK_TAGS: &[&str] = &[
    "p", "br", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
    "table", "ul", "ol",
];

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Comment body announcing a finished video.
pub fn video_comment_html(video_url: &str, requested_by: Option<&Requester>) -> String {
    let url = escape_html(video_url);
    let mut html = format!(
        "<p>🎬 <strong>Your video is ready!</strong></p><p><a href=\"{url}\">Watch the generated video</a></p>"
    );

    if let Some(requester) = requested_by {
        html.push_str(&format!(
            "<p><em>Requested by: {}</em></p>",
            escape_html(&requester.display_name)
        ));
    }

    html
}

/// Flatten storage-format XHTML into plain text, one block per line.
pub fn storage_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        rest = &rest[start..];

        if let Some(cdata) = rest.strip_prefix("<![CDATA[") {
            let end = cdata.find("]]>").unwrap_or(cdata.len());
            text.push_str(&cdata[..end]);
            rest = cdata.get(end + 3..).unwrap_or("");
            continue;
        }

        let end = match rest.find('>') {
            Some(end) => end,
            None => {
                rest = "";
                break;
            }
        };

        if is_block_tag(&rest[1..end]) {
            text.push('\n');
        }
        rest = &rest[end + 1..];
    }
    text.push_str(rest);

    decode_entities(&text)
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_block_tag(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_includes_link_and_requester() {
        let requester = Requester {
            account_id: "557058:abc".to_string(),
            display_name: "Sam <Doe>".to_string(),
        };
        let html = video_comment_html("https://cdn.example.com/v.mp4?a=1&b=2", Some(&requester));

        assert!(html.contains("href=\"https://cdn.example.com/v.mp4?a=1&amp;b=2\""));
        assert!(html.contains("Requested by: Sam &lt;Doe&gt;"));
    }

    #[test]
    fn test_comment_without_requester() {
        let html = video_comment_html("https://cdn.example.com/v.mp4", None);
        assert!(html.contains("https://cdn.example.com/v.mp4"));
        assert!(!html.contains("Requested by"));
    }

    #[test]
    fn test_storage_to_text() {
        let html = "<h1>Release&nbsp;plan</h1><p>Ship <strong>v2</strong> &amp; notify</p><ul><li>QA</li><li>Docs</li></ul>";
        assert_eq!(storage_to_text(html), "Release plan\nShip v2 & notify\nQA\nDocs");
    }

    #[test]
    fn test_storage_to_text_keeps_cdata() {
        let html = "<p>Run:</p><ac:plain-text-body><![CDATA[make > out.txt]]></ac:plain-text-body>";
        assert_eq!(storage_to_text(html), "Run:\nmake > out.txt");
    }

    #[test]
    fn test_storage_to_text_unclosed_tag() {
        assert_eq!(storage_to_text("<p>Hello</p><br"), "Hello");
        assert_eq!(storage_to_text("plain text"), "plain text");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }
}
