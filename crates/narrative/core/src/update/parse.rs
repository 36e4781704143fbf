//! Shape recovery for raw generator responses.
//!
//! Generators wrap JSON in code fences, preface it with prose, or write
//! `+5` where JSON wants `5`. Recovery is best effort and purely textual;
//! whatever survives it must still deserialize as [`ProposedUpdate`].
use super::{ProposedUpdate, UpdateError};

/// Parses a raw generator response into a [`ProposedUpdate`].
pub fn parse_update(raw: &str) -> Result<ProposedUpdate, UpdateError> {
    let unfenced = strip_code_fences(raw);
    let object = extract_object(unfenced)?;
    let normalized = normalize_plus_numerals(object);
    let proposed = serde_json::from_str(&normalized)?;
    Ok(proposed)
}

/// Removes a surrounding markdown code fence, if present.
fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let without_close = without_open.strip_suffix("```").unwrap_or(without_open);
    without_close.trim()
}

/// Slices from the first `{` to the last `}`, discarding wrapper prose.
fn extract_object(text: &str) -> Result<&str, UpdateError> {
    let start = text.find('{').ok_or(UpdateError::MissingObject)?;
    let end = text.rfind('}').ok_or(UpdateError::MissingObject)?;
    if end < start {
        return Err(UpdateError::MissingObject);
    }
    Ok(&text[start..=end])
}

/// Drops a leading `+` from numerals in value position (`"x": +5`), which
/// strict JSON rejects. String contents are left untouched.
fn normalize_plus_numerals(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;
    // Last significant char seen outside strings.
    let mut prev = '\0';
    let mut chars = json.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '+' if matches!(prev, ':' | ',' | '[' | '{')
                && chars.peek().is_some_and(char::is_ascii_digit) =>
            {
                // skip the sign; the digits follow
            }
            _ => {
                if !c.is_whitespace() {
                    prev = c;
                }
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_payload() {
        let raw = "```json\n{\"narrative\": \"조용한 밤이었다.\"}\n```";
        let update = parse_update(raw).unwrap();
        assert_eq!(update.narrative.as_deref(), Some("조용한 밤이었다."));
    }

    #[test]
    fn parses_payload_wrapped_in_prose() {
        let raw = "물론입니다! 다음은 업데이트입니다:\n{\"statDeltas\": {\"morale\": 3}}\n도움이 되길 바랍니다.";
        let update = parse_update(raw).unwrap();
        let deltas = update.stat_deltas.unwrap();
        assert_eq!(deltas.get("morale").and_then(|v| v.as_i64()), Some(3));
    }

    #[test]
    fn normalizes_plus_signed_numerals() {
        let raw = r#"{"statDeltas": {"morale": +5, "threat": -2}, "relationshipDeltas": [{"a": "민준", "b": "리더", "delta": +3}]}"#;
        let update = parse_update(raw).unwrap();
        let deltas = update.stat_deltas.unwrap();
        assert_eq!(deltas.get("morale").and_then(|v| v.as_i64()), Some(5));
        assert_eq!(deltas.get("threat").and_then(|v| v.as_i64()), Some(-2));
        let rels = update.relationship_deltas.unwrap();
        assert_eq!(rels[0].delta.as_ref().and_then(|v| v.as_i64()), Some(3));
    }

    #[test]
    fn plus_inside_string_values_is_preserved() {
        let raw = r#"{"narrative": "기온이 +5도까지 올랐다."}"#;
        let update = parse_update(raw).unwrap();
        assert_eq!(update.narrative.as_deref(), Some("기온이 +5도까지 올랐다."));
    }

    #[test]
    fn missing_fields_become_none() {
        let update = parse_update("{}").unwrap();
        assert!(update.narrative.is_none());
        assert!(update.stat_deltas.is_none());
        assert!(update.should_advance_time.is_none());
    }

    #[test]
    fn null_fields_become_none() {
        let raw = r#"{"narrative": null, "nextPrompt": null, "flagsAcquired": null}"#;
        let update = parse_update(raw).unwrap();
        assert!(update.narrative.is_none());
        assert!(update.next_prompt.is_none());
        assert!(update.flags_acquired.is_none());
    }

    #[test]
    fn response_without_object_is_rejected() {
        assert!(matches!(
            parse_update("죄송합니다, 응답을 생성할 수 없습니다."),
            Err(UpdateError::MissingObject)
        ));
        assert!(matches!(
            parse_update("[1, 2, 3]"),
            Err(UpdateError::MissingObject)
        ));
    }

    #[test]
    fn unbalanced_braces_are_rejected() {
        assert!(matches!(
            parse_update("} 깨진 응답 {"),
            Err(UpdateError::MissingObject)
        ));
    }

    #[test]
    fn broken_json_is_a_shape_error() {
        assert!(matches!(
            parse_update(r#"{"narrative": "unterminated}"#),
            Err(UpdateError::Shape(_))
        ));
    }
}
