//! Conventional Commits parser
//!
//! Parses messages following the Conventional Commits specification:
//! https://www.conventionalcommits.org/

use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

use super::types::{Footer, Header, Note, ParsedMessage, BREAKING_CHANGE};
use super::CommitGrammar;

/// Regex for the header line
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[A-Za-z][\w-]*)(?:\((?P<scope>[^()\r\n]*)\))?(?P<breaking>!)?: (?P<subject>.+)$",
    )
    .expect("Invalid regex")
});

/// Regex for footer lines; a breaking-change value may start on the next line
static FOOTER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<breaking>BREAKING[ -]CHANGE):[ \t]*(?P<note>.*)|(?P<token>[A-Za-z][\w-]*)(?:: (?P<value>.*)| (?P<reference>#.*)))$",
    )
    .expect("Invalid regex")
});

/// Regex for breaking-change footers, which may appear anywhere in the body
static BREAKING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BREAKING[ -]CHANGE:").expect("Invalid regex"));

/// Parser for the Conventional Commits format
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalParser;

impl ConventionalParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    fn parse_header(line: &str) -> Option<Header> {
        let caps = HEADER_REGEX.captures(line.trim_end())?;

        Some(Header {
            commit_type: caps.name("type")?.as_str().to_lowercase(),
            scope: caps
                .name("scope")
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            breaking_marker: caps.name("breaking").is_some(),
            subject: caps.name("subject")?.as_str().trim().to_string(),
        })
    }

    fn parse_footer(line: &str) -> Option<Footer> {
        let caps = FOOTER_REGEX.captures(line.trim_end())?;
        let token = caps.name("breaking").or_else(|| caps.name("token"))?;
        let value = caps
            .name("note")
            .or_else(|| caps.name("value"))
            .or_else(|| caps.name("reference"))?;

        Some(Footer {
            token: token.as_str().to_string(),
            value: value.as_str().trim().to_string(),
        })
    }

    /// Split the lines after the header into body text and footers.
    ///
    /// Footers start at a breaking-change line, or at a token line that opens
    /// a paragraph. Once footers have started, lines that are not a new token
    /// continue the previous footer.
    fn parse_body<'a>(lines: impl Iterator<Item = &'a str>) -> (Option<String>, Vec<Footer>) {
        let mut body_lines: Vec<&str> = Vec::new();
        let mut footers: Vec<Footer> = Vec::new();
        let mut previous_blank = true;

        for line in lines {
            let blank = line.trim().is_empty();
            let in_footer = !footers.is_empty();

            let footer = if BREAKING_REGEX.is_match(line) || in_footer || previous_blank {
                Self::parse_footer(line)
            } else {
                None
            };

            match footer {
                Some(footer) => footers.push(footer),
                None if in_footer => {
                    if let Some(last) = footers.last_mut() {
                        if !blank {
                            if !last.value.is_empty() {
                                last.value.push('\n');
                            }
                            last.value.push_str(line.trim());
                        }
                    }
                }
                None => body_lines.push(line),
            }

            previous_blank = blank;
        }

        let body = body_lines.join("\n").trim().to_string();
        ((!body.is_empty()).then_some(body), footers)
    }
}

impl CommitGrammar for ConventionalParser {
    fn parse(&self, message: &str) -> ParsedMessage {
        let mut lines = message.lines();
        let header = lines.next().and_then(Self::parse_header);
        let (body, footers) = Self::parse_body(lines);

        let mut notes: Vec<Note> = footers
            .iter()
            .filter(|f| f.is_breaking())
            .map(|f| Note {
                title: BREAKING_CHANGE.to_string(),
                text: f.value.clone(),
            })
            .collect();

        if let Some(header) = header.as_ref().filter(|h| h.breaking_marker) {
            if notes.is_empty() {
                notes.push(Note {
                    title: BREAKING_CHANGE.to_string(),
                    text: header.subject.clone(),
                });
            }
        }

        trace!(
            conventional = header.is_some(),
            footers = footers.len(),
            notes = notes.len(),
            "parsed commit message"
        );

        ParsedMessage {
            header,
            body,
            footers,
            notes,
        }
    }
}
