//! Player-choice validation.
//!
//! Choices the generator proposes must read as actionable Korean sentences.
//! A choice that fails any check is replaced with a generic fallback rather
//! than failing the turn.
use crate::config::EngineConfig;

use super::sanitize::{ScriptPolicy, contains_identifier_token};

/// Sentence endings that mark a Korean clause as actionable: declarative,
/// polite, interrogative, propositive, and nominalized forms.
pub const CHOICE_SUFFIXES: [char; 5] = ['다', '요', '까', '자', '기'];

/// Which of the two choice slots is being validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ChoiceSlot {
    ChoiceA,
    ChoiceB,
}

/// One reason a proposed choice was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceFault {
    #[error("{len} chars is too short")]
    TooShort { len: usize },
    #[error("{len} chars is too long")]
    TooLong { len: usize },
    #[error("does not end in an actionable suffix")]
    NoActionSuffix,
    #[error("contains a bracketed internal identifier")]
    IdentifierLeak,
    #[error("only {count} sanctioned-script chars")]
    TooFewScriptChars { count: usize },
}

/// Checks one choice against every rule. An empty result means the choice
/// is usable as-is.
pub fn check_choice(choice: &str, policy: &ScriptPolicy) -> Vec<ChoiceFault> {
    let trimmed = choice.trim();
    let mut faults = Vec::new();

    let len = trimmed.chars().count();
    if len < EngineConfig::CHOICE_MIN_CHARS {
        faults.push(ChoiceFault::TooShort { len });
    } else if len > EngineConfig::CHOICE_MAX_CHARS {
        faults.push(ChoiceFault::TooLong { len });
    }

    if !ends_with_action_suffix(trimmed) {
        faults.push(ChoiceFault::NoActionSuffix);
    }

    if contains_identifier_token(trimmed) {
        faults.push(ChoiceFault::IdentifierLeak);
    }

    let count = trimmed.chars().filter(|&c| policy.is_sanctioned(c)).count();
    if count < EngineConfig::CHOICE_MIN_SCRIPT_CHARS {
        faults.push(ChoiceFault::TooFewScriptChars { count });
    }

    faults
}

/// Generic safe choices substituted when a proposed choice is rejected.
pub fn fallback_choices() -> (String, String) {
    (
        "주변을 신중하게 살피며 상황을 지켜본다".to_owned(),
        "동료들과 함께 다음 행동을 조용히 준비한다".to_owned(),
    )
}

/// True if the choice ends in one of [`CHOICE_SUFFIXES`], ignoring trailing
/// punctuation.
fn ends_with_action_suffix(choice: &str) -> bool {
    choice
        .trim_end_matches(['.', '!', '?', '…', '~', '!', '?', ' '])
        .chars()
        .next_back()
        .is_some_and(|last| CHOICE_SUFFIXES.contains(&last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ScriptPolicy {
        ScriptPolicy::korean()
    }

    #[test]
    fn well_formed_choices_pass() {
        for choice in [
            "무전기를 수리할 부품을 찾아 나선다",
            "모두에게 식량을 아껴 쓰자고 제안한다.",
            "위험하지만 밖으로 나가 볼까?",
        ] {
            assert!(check_choice(choice, &policy()).is_empty(), "{choice}");
        }
    }

    #[test]
    fn fallback_choices_pass_their_own_checks() {
        let (a, b) = fallback_choices();
        assert!(check_choice(&a, &policy()).is_empty());
        assert!(check_choice(&b, &policy()).is_empty());
    }

    #[test]
    fn too_short_choice_is_rejected() {
        let faults = check_choice("나간다", &policy());
        assert!(faults.contains(&ChoiceFault::TooShort { len: 3 }));
    }

    #[test]
    fn over_long_choice_is_rejected() {
        let long = "아주 ".repeat(30) + "멀리 떠난다";
        let faults = check_choice(&long, &policy());
        assert!(
            faults
                .iter()
                .any(|f| matches!(f, ChoiceFault::TooLong { .. }))
        );
    }

    #[test]
    fn narration_without_action_suffix_is_rejected() {
        let faults = check_choice("조용히 기다리는 중인 사람들과 함께", &policy());
        assert!(faults.contains(&ChoiceFault::NoActionSuffix));
    }

    #[test]
    fn trailing_punctuation_does_not_hide_the_suffix() {
        assert!(ends_with_action_suffix("밖으로 나가 볼까?"));
        assert!(ends_with_action_suffix("상황을 지켜본다..."));
        assert!(!ends_with_action_suffix("조용한 밤이었")); // no suffix at all
    }

    #[test]
    fn identifier_leak_is_rejected() {
        let faults = check_choice("[CHOICE_A] 문을 열고 밖으로 나가 본다", &policy());
        assert!(faults.contains(&ChoiceFault::IdentifierLeak));
    }

    #[test]
    fn mostly_latin_choice_is_rejected() {
        let faults = check_choice("Open the door and run away 다", &policy());
        assert!(faults.contains(&ChoiceFault::TooFewScriptChars { count: 1 }));
    }

    #[test]
    fn multiple_faults_are_all_reported() {
        let faults = check_choice("go west", &policy());
        assert!(faults.len() >= 3, "got {faults:?}");
    }
}
