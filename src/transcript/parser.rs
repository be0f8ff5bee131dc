//! Line-oriented transcript parser.

use super::Utterance;
use regex::Regex;
use std::sync::LazyLock;

static DEFAULT_PARSER: LazyLock<TranscriptParser> = LazyLock::new(TranscriptParser::new);

/// Parse a raw transcript with the default parser.
pub fn parse(raw: &str) -> Vec<Utterance> {
    DEFAULT_PARSER.parse(raw)
}

/// Parser for `m:ss` timestamped transcripts.
///
/// Accepts both layouts seen in exported captions:
///
/// ```text
/// 0:14
/// hi everyone do you live in a city
/// 0:17 town do you commute to school
/// ```
///
/// Bracketed annotations such as `[Music]` are not speech and are dropped.
pub struct TranscriptParser {
    timestamp_regex: Regex,
}

impl TranscriptParser {
    pub fn new() -> Self {
        // ASCII digits only; seconds are not bounded to < 60
        let timestamp_regex =
            Regex::new(r"^([0-9]+):([0-9]+)\s*(.*)$").expect("Invalid timestamp regex");

        Self { timestamp_regex }
    }

    /// Split a trimmed line into its timestamp and trailing text, if it has one.
    fn match_timestamp<'a>(&self, line: &'a str) -> Option<(u64, &'a str)> {
        let caps = self.timestamp_regex.captures(line)?;
        let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
        let seconds: u64 = caps.get(2)?.as_str().parse().ok()?;
        let start = minutes.checked_mul(60)?.checked_add(seconds)?;
        let text = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
        Some((start, text))
    }

    /// Convert a raw transcript into ordered utterances.
    ///
    /// Lines without a timestamp continue the most recent one, even when that
    /// timestamp only introduced an annotation.
    pub fn parse(&self, raw: &str) -> Vec<Utterance> {
        let mut utterances = Vec::new();
        let mut current: Option<u64> = None;

        for line in raw.split(is_line_break) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.match_timestamp(line) {
                Some((start, text)) => {
                    current = Some(start);
                    if !text.is_empty() && !is_annotation(text) {
                        utterances.push(Utterance::new(start, text));
                    }
                }
                None => {
                    if let Some(start) = current {
                        if !is_annotation(line) {
                            utterances.push(Utterance::new(start, line));
                        }
                    }
                }
            }
        }

        utterances
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Line boundaries, including lone `\r` and the Unicode line and paragraph separators.
///
/// A `\r\n` pair yields an empty piece between its halves, which `parse` skips.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_annotation(text: &str) -> bool {
    text.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_split_layout() {
        let raw = "0:00\n[Music]\n0:14\nhello world\n0:17\nhow are you";
        let utterances = parse(raw);

        assert_eq!(
            utterances,
            vec![
                Utterance::new(14, "hello world"),
                Utterance::new(17, "how are you"),
            ]
        );
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let raw = "0:00\r[Music]\r0:14\rhello world\r0:17\rhow are you";
        assert_eq!(
            parse(raw),
            vec![
                Utterance::new(14, "hello world"),
                Utterance::new(17, "how are you"),
            ]
        );

        let crlf = "0:00\r\n[Music]\r\n0:14\r\nhello world\r\n0:17\r\nhow are you";
        assert_eq!(parse(crlf), parse(raw));
    }

    #[test]
    fn test_unicode_line_separators() {
        let raw = "0:14 hello\u{2028}0:17 there\u{2029}0:20 again\u{85}1:00 done";
        let utterances = parse(raw);

        assert_eq!(
            utterances,
            vec![
                Utterance::new(14, "hello"),
                Utterance::new(17, "there"),
                Utterance::new(20, "again"),
                Utterance::new(60, "done"),
            ]
        );
    }

    #[test]
    fn test_parse_inline_layout() {
        let raw = "0:05 first line\n1:02 second line\n10:00 third line";
        let utterances = parse(raw);

        assert_eq!(utterances.len(), 3);
        assert_eq!(utterances[0].start, 5);
        assert_eq!(utterances[1].start, 62);
        assert_eq!(utterances[2].start, 600);
        assert_eq!(utterances[2].text, "third line");
    }

    #[test]
    fn test_seconds_not_bounded() {
        let utterances = parse("1:75 late");
        assert_eq!(utterances, vec![Utterance::new(135, "late")]);
    }

    #[test]
    fn test_brackets_suppressed() {
        let raw = "0:01 [Applause]\n0:02\n[Laughter]\nreal words\n0:03 [Music] trailing";
        let utterances = parse(raw);

        assert_eq!(utterances, vec![Utterance::new(2, "real words")]);
        assert!(utterances.iter().all(|u| !u.text.starts_with('[')));
    }

    #[test]
    fn test_text_before_first_timestamp_dropped() {
        let raw = "intro with no time\n0:10\nspoken";
        let utterances = parse(raw);

        assert_eq!(utterances, vec![Utterance::new(10, "spoken")]);
    }

    #[test]
    fn test_continuation_lines_share_timestamp() {
        let raw = "0:30\nline one\nline two\n\n   line three   ";
        let utterances = parse(raw);

        assert_eq!(utterances.len(), 3);
        assert!(utterances.iter().all(|u| u.start == 30));
        assert_eq!(utterances[2].text, "line three");
    }

    #[test]
    fn test_continuation_after_annotation_timestamp() {
        // The annotation's timestamp still becomes the current one.
        let raw = "0:10 hello\n0:40 [Music]\nafter the music";
        let utterances = parse(raw);

        assert_eq!(utterances[1], Utterance::new(40, "after the music"));
    }

    #[test]
    fn test_no_timestamps_yields_nothing() {
        assert!(parse("just some\nplain text").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_overflowing_timestamp_is_continuation() {
        let raw = "0:01 start\n99999999999999999999:00 huge";
        let utterances = parse(raw);

        assert_eq!(utterances.len(), 2);
        assert_eq!(utterances[1].start, 1);
        assert_eq!(utterances[1].text, "99999999999999999999:00 huge");
    }
}
