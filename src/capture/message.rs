//! Header and body extraction for captured messages

/// A message decomposed into headers of interest and body parts.
///
/// Derived from the raw transcript of one completed transaction; immutable
/// once built. Missing headers map to fixed fallback values so a summary can
/// always be produced.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    /// Subject header, or "no subject"
    pub subject: String,
    /// Date header, or "no date"
    pub date: String,
    /// Declared Content-Type, or "text/plain"
    pub content_type: String,
    /// Body parts. A multipart message yields one entry per declared part;
    /// anything else yields exactly one part equal to the whole payload.
    pub parts: Vec<BodyPart>,
}

/// One part of a message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPart {
    /// Content type declared for this part
    pub content_type: String,
    /// Part content. Decoding of the wire bytes is lossy-by-substitution,
    /// so this is always present even for malformed input.
    pub text: String,
}

impl BodyPart {
    /// Whether this part is plain text or HTML
    pub fn is_text(&self) -> bool {
        let lower = self.content_type.to_ascii_lowercase();
        lower.starts_with("text/plain") || lower.starts_with("text/html")
    }
}

impl ParsedMessage {
    /// Parse a raw message transcript: a header block up to the first blank
    /// line, followed by the payload.
    pub fn parse(raw: &str) -> Self {
        let (headers, payload) = split_header_block(raw);

        let subject = header_value(headers, "Subject").unwrap_or_else(|| "no subject".to_owned());
        let date = header_value(headers, "Date").unwrap_or_else(|| "no date".to_owned());
        let content_type =
            header_value(headers, "Content-Type").unwrap_or_else(|| "text/plain".to_owned());

        let parts = match boundary_param(&content_type) {
            Some(boundary) => split_multipart(payload, &boundary),
            None => vec![BodyPart {
                content_type: content_type.clone(),
                text: payload.to_owned(),
            }],
        };

        Self {
            subject,
            date,
            content_type,
            parts,
        }
    }

    /// All text parts (plain and HTML) concatenated, for display
    pub fn text_body(&self) -> String {
        self.parts
            .iter()
            .filter(|part| part.is_text())
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Split a transcript into the header block and the payload after the first
/// blank line. A transcript without a blank line is all headers.
fn split_header_block(raw: &str) -> (&str, &str) {
    match raw.split_once("\n\n") {
        Some((headers, payload)) => (headers, payload),
        None => (raw, ""),
    }
}

/// Look up a header by name, case-insensitively
fn header_value(headers: &str, name: &str) -> Option<String> {
    for line in headers.lines() {
        if let Some((key, value)) = line.split_once(':')
            && key.trim().eq_ignore_ascii_case(name)
        {
            return Some(value.trim().to_owned());
        }
    }
    None
}

/// Extract the boundary parameter from a multipart content type. Returns
/// None for non-multipart types.
fn boundary_param(content_type: &str) -> Option<String> {
    if !content_type.to_ascii_lowercase().contains("multipart") {
        return None;
    }
    for param in content_type.split(';') {
        let param = param.trim();
        if let Some(prefix) = param.get(..9)
            && prefix.eq_ignore_ascii_case("boundary=")
        {
            return Some(param[9..].trim_matches('"').to_owned());
        }
    }
    None
}

/// Split a multipart payload on its boundary delimiter, visiting every
/// declared part. Each part carries its own small header block; a part
/// without a Content-Type defaults to text/plain.
fn split_multipart(payload: &str, boundary: &str) -> Vec<BodyPart> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();

    let mut sections = payload.split(delimiter.as_str());
    // Everything before the first delimiter is the preamble.
    sections.next();

    for section in sections {
        if section.starts_with("--") {
            // Closing delimiter; the rest is epilogue.
            break;
        }
        let section = section.strip_prefix('\n').unwrap_or(section);
        let (headers, text) = split_header_block(section);
        let content_type =
            header_value(headers, "Content-Type").unwrap_or_else(|| "text/plain".to_owned());
        let text = text.strip_suffix('\n').unwrap_or(text);
        parts.push(BodyPart {
            content_type,
            text: text.to_owned(),
        });
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_message() {
        let raw = "Subject: Hi\nDate: Mon, 24 Aug 2026 10:00:00 +0000\n\nhello world";
        let message = ParsedMessage::parse(raw);

        assert_eq!(message.subject, "Hi");
        assert_eq!(message.date, "Mon, 24 Aug 2026 10:00:00 +0000");
        assert_eq!(message.content_type, "text/plain");
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].text, "hello world");
        assert_eq!(message.text_body(), "hello world");
    }

    #[test]
    fn test_missing_headers_use_fallbacks() {
        let message = ParsedMessage::parse("\nbody only");
        assert_eq!(message.subject, "no subject");
        assert_eq!(message.date, "no date");
        assert_eq!(message.content_type, "text/plain");
    }

    #[test]
    fn test_headers_case_insensitive() {
        let raw = "SUBJECT: shouting\ncontent-type: text/html\n\n<p>hi</p>";
        let message = ParsedMessage::parse(raw);
        assert_eq!(message.subject, "shouting");
        assert_eq!(message.content_type, "text/html");
        assert_eq!(message.parts[0].content_type, "text/html");
    }

    #[test]
    fn test_no_blank_line_means_no_payload() {
        let message = ParsedMessage::parse("Subject: only headers");
        assert_eq!(message.subject, "only headers");
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].text, "");
    }

    #[test]
    fn test_multipart_visits_every_part() {
        let raw = concat!(
            "Subject: Mixed\n",
            "Content-Type: multipart/mixed; boundary=\"sep\"\n",
            "\n",
            "preamble to ignore\n",
            "--sep\n",
            "Content-Type: text/plain\n",
            "\n",
            "plain part\n",
            "--sep\n",
            "Content-Type: text/html\n",
            "\n",
            "<p>html part</p>\n",
            "--sep\n",
            "Content-Type: application/octet-stream\n",
            "\n",
            "binary-ish part\n",
            "--sep--\n",
            "epilogue\n",
        );
        let message = ParsedMessage::parse(raw);

        assert_eq!(message.parts.len(), 3);
        assert_eq!(message.parts[0].content_type, "text/plain");
        assert_eq!(message.parts[0].text, "plain part");
        assert_eq!(message.parts[1].content_type, "text/html");
        assert_eq!(message.parts[1].text, "<p>html part</p>");
        assert_eq!(message.parts[2].content_type, "application/octet-stream");
        assert!(!message.parts[2].is_text());
        assert_eq!(message.text_body(), "plain part\n<p>html part</p>");
    }

    #[test]
    fn test_multipart_unquoted_boundary() {
        let raw = concat!(
            "Content-Type: multipart/alternative; boundary=xyz\n",
            "\n",
            "--xyz\n",
            "\n",
            "part without its own content type\n",
            "--xyz--\n",
        );
        let message = ParsedMessage::parse(raw);
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].content_type, "text/plain");
        assert_eq!(message.parts[0].text, "part without its own content type");
    }

    #[test]
    fn test_multipart_without_boundary_is_single_part() {
        let raw = "Content-Type: multipart/mixed\n\nwhole payload";
        let message = ParsedMessage::parse(raw);
        assert_eq!(message.parts.len(), 1);
        assert_eq!(message.parts[0].text, "whole payload");
    }

    #[test]
    fn test_boundary_param_parsing() {
        assert_eq!(
            boundary_param("multipart/mixed; boundary=\"abc\""),
            Some("abc".to_owned())
        );
        assert_eq!(
            boundary_param("multipart/mixed; charset=utf-8; BOUNDARY=abc"),
            Some("abc".to_owned())
        );
        assert_eq!(boundary_param("text/plain; boundary=abc"), None);
        assert_eq!(boundary_param("multipart/mixed"), None);
    }

    #[test]
    fn test_replacement_characters_survive_parsing() {
        // Undecodable wire bytes arrive here already substituted with
        // U+FFFD; parsing must pass them through untouched.
        let raw = "Subject: bad bytes\n\nhe\u{FFFD}llo";
        let message = ParsedMessage::parse(raw);
        assert_eq!(message.parts[0].text, "he\u{FFFD}llo");
    }
}
