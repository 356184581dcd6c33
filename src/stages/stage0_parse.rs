use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::TranscriptTurn;

/// Line formats the parser recognises, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// `[0:15] Alice: text`
    BracketedTimestamp,
    /// `Alice  0:15` header, text on the next line
    SpeakerThenTimestamp,
    /// `0:15 Alice` header, text on the next line
    TimestampThenSpeaker,
    /// `Alice: text`
    SpeakerColon,
}

/// A successful match: the turn and the index of the last line it consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub turn: TranscriptTurn,
    pub last_line: usize,
    pub format: LineFormat,
}

/// One entry in the parser's pattern table
pub struct LinePattern {
    pub format: LineFormat,
    matcher: fn(&[&str], usize) -> Option<LineMatch>,
}

impl LinePattern {
    /// Try this pattern against `lines[index]` (and possibly a following line)
    pub fn try_match(&self, lines: &[&str], index: usize) -> Option<LineMatch> {
        (self.matcher)(lines, index)
    }
}

const TIMESTAMP: &str = r"\d{1,2}:\d{2}(?::\d{2})?";

static BRACKETED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\[({TIMESTAMP})\]\s*([^:\[\]]{{1,50}}?)\s*:(.*)$"))
        .expect("Invalid regex")
});

static SPEAKER_TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^([^:\[\]]{{1,50}}?)\s+({TIMESTAMP})$")).expect("Invalid regex")
});

static TIMESTAMP_SPEAKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({TIMESTAMP})\s+([^:\[\]]{{1,50}})$")).expect("Invalid regex")
});

static BARE_TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\[?{TIMESTAMP}\]?$")).expect("Invalid regex"));

static SPEAKER_COLON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:\[\]]{1,50}?)\s*:(.*)$").expect("Invalid regex"));

/// The pattern table, tried top to bottom for every unconsumed line
pub static LINE_PATTERNS: [LinePattern; 4] = [
    LinePattern {
        format: LineFormat::BracketedTimestamp,
        matcher: match_bracketed,
    },
    LinePattern {
        format: LineFormat::SpeakerThenTimestamp,
        matcher: match_speaker_then_timestamp,
    },
    LinePattern {
        format: LineFormat::TimestampThenSpeaker,
        matcher: match_timestamp_then_speaker,
    },
    LinePattern {
        format: LineFormat::SpeakerColon,
        matcher: match_speaker_colon,
    },
];

/// Parse raw transcript text into turns
///
/// Line-oriented and order-preserving. Each non-blank line is tried against
/// [`LINE_PATTERNS`]; the first match wins. Lines matching nothing are
/// appended to the previous turn, or dropped if there is none yet. Never fails.
pub fn parse_transcript(raw: &str) -> Vec<TranscriptTurn> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut turns: Vec<TranscriptTurn> = Vec::new();
    let mut dropped = 0usize;
    let mut index = 0usize;

    while index < lines.len() {
        let line = lines[index].trim();
        if line.is_empty() {
            index += 1;
            continue;
        }

        let matched = LINE_PATTERNS
            .iter()
            .find_map(|pattern| pattern.try_match(&lines, index));

        match matched {
            Some(m) => {
                turns.push(m.turn);
                index = m.last_line + 1;
            }
            None => {
                match turns.last_mut() {
                    Some(previous) => previous.append_text(line),
                    None => dropped += 1,
                }
                index += 1;
            }
        }
    }

    if dropped > 0 {
        debug!("Dropped {} leading lines with no recognised format", dropped);
    }

    turns
}

fn match_bracketed(lines: &[&str], index: usize) -> Option<LineMatch> {
    let line = lines[index].trim();
    let caps = BRACKETED_RE.captures(line)?;
    let speaker = caps[2].trim();
    let text = caps[3].trim();
    if speaker.is_empty() || text.is_empty() {
        return None;
    }

    Some(LineMatch {
        turn: TranscriptTurn::with_timestamp(speaker, text, &caps[1]),
        last_line: index,
        format: LineFormat::BracketedTimestamp,
    })
}

fn match_speaker_then_timestamp(lines: &[&str], index: usize) -> Option<LineMatch> {
    let line = lines[index].trim();
    let caps = SPEAKER_TIMESTAMP_RE.captures(line)?;
    let (text, last_line) = text_line_after(lines, index)?;
    let speaker = caps[1].trim();
    if speaker.is_empty() {
        return None;
    }

    Some(LineMatch {
        turn: TranscriptTurn::with_timestamp(speaker, text, &caps[2]),
        last_line,
        format: LineFormat::SpeakerThenTimestamp,
    })
}

fn match_timestamp_then_speaker(lines: &[&str], index: usize) -> Option<LineMatch> {
    let line = lines[index].trim();
    let caps = TIMESTAMP_SPEAKER_RE.captures(line)?;
    let (text, last_line) = text_line_after(lines, index)?;
    let speaker = caps[2].trim();
    if speaker.is_empty() {
        return None;
    }

    Some(LineMatch {
        turn: TranscriptTurn::with_timestamp(speaker, text, &caps[1]),
        last_line,
        format: LineFormat::TimestampThenSpeaker,
    })
}

fn match_speaker_colon(lines: &[&str], index: usize) -> Option<LineMatch> {
    let line = lines[index].trim();
    let caps = SPEAKER_COLON_RE.captures(line)?;
    if splits_timestamp(&caps[1], &caps[2]) {
        return None;
    }
    let speaker = caps[1].trim();
    let text = caps[2].trim();
    if speaker.is_empty() || text.is_empty() {
        return None;
    }

    Some(LineMatch {
        turn: TranscriptTurn::new(speaker, text),
        last_line: index,
        format: LineFormat::SpeakerColon,
    })
}

/// Whether the colon between `speaker` and `text` is the one inside a timestamp
///
/// `Alice 0:03` would otherwise read as speaker `Alice 0` saying `03`. Times
/// later in the text (`Client: see you at 10:30`) don't matter.
fn splits_timestamp(speaker: &str, text: &str) -> bool {
    let speaker_ends_in_digit = speaker.chars().last().is_some_and(|c| c.is_ascii_digit());
    let mut text_chars = text.chars();
    let text_starts_with_minutes = matches!(
        (text_chars.next(), text_chars.next()),
        (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit()
    );
    speaker_ends_in_digit && text_starts_with_minutes
}

/// The next non-blank line after a two-line header, unless it is a header itself
fn text_line_after<'a>(lines: &[&'a str], header: usize) -> Option<(&'a str, usize)> {
    let (offset, next) = lines
        .iter()
        .copied()
        .enumerate()
        .skip(header + 1)
        .map(|(i, l)| (i, l.trim()))
        .find(|(_, l)| !l.is_empty())?;

    if is_header_like(next) {
        return None;
    }

    Some((next, offset))
}

/// Whether a line looks like the start of a new turn rather than turn text
pub fn is_header_like(line: &str) -> bool {
    let line = line.trim();
    BRACKETED_RE.is_match(line)
        || SPEAKER_TIMESTAMP_RE.is_match(line)
        || TIMESTAMP_SPEAKER_RE.is_match(line)
        || BARE_TIMESTAMP_RE.is_match(line)
}
