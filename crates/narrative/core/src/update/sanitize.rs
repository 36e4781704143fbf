//! Script sanitization and language conformance.
//!
//! The generator is asked for Korean prose but regularly leaks other scripts,
//! raw field names, and bracketed internal identifiers. Sanitization removes
//! foreign-script characters outright; conformance measures how Korean the
//! remainder is, after masking structural residue so that a leaked field name
//! does not count as foreign prose twice.
use serde::{Deserialize, Serialize};

/// Wire field names masked before measuring conformance.
const WIRE_FIELD_NAMES: [&str; 9] = [
    "survivorStatusChanges",
    "relationshipDeltas",
    "shouldAdvanceTime",
    "flagsAcquired",
    "statDeltas",
    "nextPrompt",
    "narrative",
    "choiceA",
    "choiceB",
];

/// Unicode ranges a text policy cares about.
///
/// `sanctioned` ranges count as native prose for conformance and for choice
/// validation. `stripped` ranges are removed from every inbound text field.
/// Characters in neither set (ASCII, digits, punctuation) pass through but
/// count against conformance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPolicy {
    sanctioned: Vec<(u32, u32)>,
    stripped: Vec<(u32, u32)>,
}

impl ScriptPolicy {
    /// Policy for Korean narratives: Hangul is sanctioned; CJK ideographs,
    /// kana, and a handful of other scripts the generator likes to fall back
    /// into are stripped.
    pub fn korean() -> Self {
        Self {
            sanctioned: vec![
                (0x1100, 0x11FF),  // Hangul jamo
                (0x3130, 0x318F),  // Hangul compatibility jamo
                (0xA960, 0xA97F),  // Hangul jamo extended-A
                (0xAC00, 0xD7A3),  // Hangul syllables
                (0xD7B0, 0xD7FF),  // Hangul jamo extended-B
            ],
            stripped: vec![
                (0x0370, 0x03FF),  // Greek
                (0x0400, 0x04FF),  // Cyrillic
                (0x0590, 0x05FF),  // Hebrew
                (0x0600, 0x06FF),  // Arabic
                (0x0900, 0x097F),  // Devanagari
                (0x0E00, 0x0E7F),  // Thai
                (0x3040, 0x30FF),  // Hiragana and katakana
                (0x3400, 0x4DBF),  // CJK extension A
                (0x4E00, 0x9FFF),  // CJK unified ideographs
            ],
        }
    }

    pub fn is_sanctioned(&self, c: char) -> bool {
        in_ranges(&self.sanctioned, c)
    }

    pub fn is_stripped(&self, c: char) -> bool {
        in_ranges(&self.stripped, c)
    }
}

impl Default for ScriptPolicy {
    fn default() -> Self {
        Self::korean()
    }
}

fn in_ranges(ranges: &[(u32, u32)], c: char) -> bool {
    let cp = c as u32;
    ranges.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Result of sanitizing one text field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedText {
    pub text: String,
    /// Foreign-script characters removed.
    pub removed: usize,
}

/// Strips foreign-script characters, collapses whitespace, and drops
/// sentences left empty by the stripping.
pub fn sanitize_text(text: &str, policy: &ScriptPolicy) -> SanitizedText {
    let mut removed = 0;
    let kept: String = text
        .chars()
        .filter(|&c| {
            if policy.is_stripped(c) {
                removed += 1;
                false
            } else {
                true
            }
        })
        .collect();

    let collapsed = collapse_whitespace(&kept);
    let text = drop_empty_sentences(&collapsed).trim().to_owned();
    SanitizedText { text, removed }
}

/// Language conformance of `text` in `0.0..=1.0`.
///
/// Structural residue (wire field names, bracketed identifiers) is masked
/// first. The ratio then counts sanctioned-script characters among what is
/// left, ignoring whitespace, punctuation, and digits. Empty input is
/// vacuously conformant.
pub fn conformance(text: &str, policy: &ScriptPolicy) -> f64 {
    let masked = strip_identifier_tokens(&mask_wire_fields(text));
    let mut total = 0usize;
    let mut native = 0usize;
    for c in masked.chars() {
        if c.is_whitespace() || c.is_ascii_digit() || is_punctuation(c) {
            continue;
        }
        total += 1;
        if policy.is_sanctioned(c) {
            native += 1;
        }
    }
    if total == 0 {
        1.0
    } else {
        native as f64 / total as f64
    }
}

/// True if the text contains a bracketed all-uppercase identifier such as
/// `[FLAG_ACQUIRED]`.
pub(crate) fn contains_identifier_token(text: &str) -> bool {
    let mut rest = text;
    while let Some(start) = rest.find('[') {
        let tail = &rest[start + 1..];
        if identifier_len(tail).is_some() {
            return true;
        }
        rest = tail;
    }
    false
}

/// Removes bracketed all-uppercase identifiers, brackets included.
fn strip_identifier_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('[') {
        let tail = &rest[start + 1..];
        match identifier_len(tail) {
            Some(len) => {
                out.push_str(&rest[..start]);
                rest = &tail[len + 1..];
            }
            None => {
                out.push_str(&rest[..=start]);
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// If `tail` starts with `IDENT]`, returns the byte length of `IDENT`.
/// The identifier must be uppercase ASCII, digits, or underscores, with at
/// least one letter.
fn identifier_len(tail: &str) -> Option<usize> {
    let end = tail.find(']')?;
    let inner = &tail[..end];
    let shaped = !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && inner.chars().any(|c| c.is_ascii_uppercase());
    shaped.then_some(end)
}

fn mask_wire_fields(text: &str) -> String {
    let mut masked = text.to_owned();
    for field in WIRE_FIELD_NAMES {
        if masked.contains(field) {
            masked = masked.replace(field, "");
        }
    }
    masked
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Drops sentence segments with no real content, e.g. the lone `.` left
/// behind when a fully foreign sentence was stripped. A run of terminators
/// (`...`) stays attached to the sentence before it.
fn drop_empty_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut segment = String::new();
    let mut has_content = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        segment.push(c);
        if is_terminator(c) {
            let run_ends = chars.peek().is_none_or(|&next| !is_terminator(next));
            if run_ends {
                if has_content {
                    out.push_str(&segment);
                }
                segment.clear();
                has_content = false;
            }
        } else if !c.is_whitespace() && !is_punctuation(c) {
            has_content = true;
        }
    }
    if has_content {
        out.push_str(&segment);
    }
    out
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…' | '。' | '!' | '?')
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '。' | '、' | '「' | '」' | '『' | '』' | '·' | '…' | '—' | '–' | '‘' | '’' | '“'
                | '”' | '!' | '?' | ',' | '.' | ':' | ';' | '~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_foreign_scripts_and_counts_removals() {
        let policy = ScriptPolicy::korean();
        let out = sanitize_text("그는 조용히 говорил 고개를 끄덕였다.", &policy);
        assert_eq!(out.removed, 7);
        assert_eq!(out.text, "그는 조용히 고개를 끄덕였다.");
    }

    #[test]
    fn drops_sentences_left_empty_by_stripping() {
        let policy = ScriptPolicy::korean();
        let out = sanitize_text("문이 열렸다. 危険だ。 모두 숨어야 한다.", &policy);
        assert_eq!(out.text, "문이 열렸다. 모두 숨어야 한다.");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let policy = ScriptPolicy::korean();
        let out = sanitize_text("밤이   깊었다.\n\n아무도  없었다.", &policy);
        assert_eq!(out.text, "밤이 깊었다. 아무도 없었다.");
    }

    #[test]
    fn ellipsis_survives_sentence_collapse() {
        let policy = ScriptPolicy::korean();
        let out = sanitize_text("그들은 기다렸다... 아무 일도 없었다.", &policy);
        assert_eq!(out.text, "그들은 기다렸다... 아무 일도 없었다.");
    }

    #[test]
    fn pure_korean_text_is_fully_conformant() {
        let policy = ScriptPolicy::korean();
        let ratio = conformance("새벽까지 비가 내렸다.", &policy);
        assert!((ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn masked_field_names_do_not_lower_conformance() {
        let policy = ScriptPolicy::korean();
        let leaked = "narrative 필드를 갱신했다. statDeltas 적용 완료.";
        let clean = "필드를 갱신했다. 적용 완료.";
        assert_eq!(conformance(leaked, &policy), conformance(clean, &policy));
    }

    #[test]
    fn bracketed_identifiers_are_masked_not_counted() {
        let policy = ScriptPolicy::korean();
        let ratio = conformance("[FLAG_ACQUIRED] 무전기를 고쳤다.", &policy);
        assert!((ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn latin_prose_lowers_conformance() {
        let policy = ScriptPolicy::korean();
        let ratio = conformance("The detector failed 완전히", &policy);
        assert!(ratio < 0.5, "ratio was {ratio}");
    }

    #[test]
    fn empty_text_is_vacuously_conformant() {
        let policy = ScriptPolicy::korean();
        assert_eq!(conformance("", &policy), 1.0);
        assert_eq!(conformance("5, 10...", &policy), 1.0);
    }

    #[test]
    fn identifier_detection_requires_uppercase_shape() {
        assert!(contains_identifier_token("경고 [SYSTEM_ALERT] 발생"));
        assert!(contains_identifier_token("[E2]"));
        assert!(!contains_identifier_token("대괄호 [안내] 문구"));
        assert!(!contains_identifier_token("숫자만 [123] 있는 경우"));
        assert!(!contains_identifier_token("빈 [] 괄호"));
        assert!(!contains_identifier_token("괄호 없음"));
    }
}
