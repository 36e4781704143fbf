//! Turn request rendering.
//!
//! One request per turn goes out to the update generator: an instruction
//! document (the rules of the exchange, including the response shape), a
//! summary of the current game state, and the player's chosen action. The
//! summary is prose-oriented but carries the exact stat ids as JSON so the
//! generator has no excuse to invent its own.

use narrative_core::{
    Clock, EndCondition, FlagValue, GameState, PlayerAction, Scenario, StatPolarity,
    SurvivorStatus, TimeUnit,
};

/// How many recent transcript entries the summary repeats back.
const RECENT_LOG_ENTRIES: usize = 3;

/// One turn's worth of request material for the update generator.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub instructions: String,
    pub state_summary: String,
    pub action: String,
}

impl TurnRequest {
    /// Renders the request for the current state and action.
    pub fn render(
        instructions: &str,
        scenario: &Scenario,
        state: &GameState,
        action: &PlayerAction,
    ) -> Self {
        Self {
            instructions: instructions.to_owned(),
            state_summary: state_summary(scenario, state),
            action: action.text.clone(),
        }
    }

    /// The full request document, ready to send as a single message.
    pub fn to_message(&self) -> String {
        format!(
            "{}\n\n{}\n\n[플레이어 행동]\n{}",
            self.instructions, self.state_summary, self.action
        )
    }
}

/// The default instruction document for Korean survival narratives.
///
/// Spells out the response contract the validation pipeline expects; a
/// well-behaved generator that follows it produces zero quality issues.
pub fn default_instructions() -> String {
    r#"당신은 한국어 생존 내러티브 게임의 진행자입니다.
아래의 현재 상황과 플레이어의 행동을 읽고, 다음 형식의 JSON 객체 하나로만 응답하십시오.

{
  "narrative": "<이번 턴의 결과 묘사. 한국어 산문>",
  "nextPrompt": {
    "text": "<다음 상황 설명>",
    "choiceA": "<선택지 A: 15~80자, '다/요/까/자/기'로 끝나는 문장>",
    "choiceB": "<선택지 B: 같은 규칙>"
  },
  "statDeltas": { "<스탯 id>": <정수 변화량> },
  "survivorStatusChanges": [ { "name": "<생존자 이름>", "newStatus": "alive|injured|missing|dead" } ],
  "relationshipDeltas": [ { "a": "<이름>", "b": "<이름>", "delta": <정수> } ],
  "flagsAcquired": [ "<획득한 플래그 이름>" ],
  "shouldAdvanceTime": true
}

규칙:
- 모든 서사와 선택지는 한국어로만 작성합니다. 다른 문자 체계를 섞지 마십시오.
- statDeltas에는 [스탯 id] 줄에 나온 id만 사용합니다.
- 같은 장면이 이어질 때만 shouldAdvanceTime을 false로 설정합니다.
- JSON 외의 텍스트, 마크다운 코드 펜스, 주석을 포함하지 마십시오."#
        .to_string()
}

fn state_summary(scenario: &Scenario, state: &GameState) -> String {
    let mut out = String::new();

    out.push_str("[현재 상황]\n");
    out.push_str(&clock_line(scenario, state));
    out.push('\n');

    out.push_str("\n[스탯]\n");
    for def in &scenario.stats {
        let value = state.stats.get(&def.id).copied().unwrap_or(def.initial);
        out.push_str(&format!(
            "- {}({}): {} / {}~{}",
            def.name, def.id, value, def.min, def.max
        ));
        if def.polarity == StatPolarity::HigherWorse {
            out.push_str(" (높을수록 위험)");
        }
        out.push('\n');
    }
    // exact ids, machine-readable
    let ids = serde_json::to_string(&state.stats).unwrap_or_else(|_| "{}".to_string());
    out.push_str(&format!("[스탯 id] {ids}\n"));

    out.push_str("\n[생존자]\n");
    if state.survivors.is_empty() {
        out.push_str("- 없음\n");
    }
    for survivor in &state.survivors {
        out.push_str(&format!(
            "- {}: {}\n",
            survivor.name,
            status_label(survivor.status)
        ));
    }

    out.push_str("\n[플래그]\n");
    if state.flags.is_empty() {
        out.push_str("- 없음\n");
    }
    for (name, value) in &state.flags {
        match value {
            FlagValue::Bool(_) => out.push_str(&format!("- {name}\n")),
            FlagValue::Count(n) => out.push_str(&format!("- {name}: {n}회\n")),
        }
    }

    if !state.relationships.is_empty() {
        out.push_str("\n[관계]\n");
        for (pair, score) in &state.relationships {
            out.push_str(&format!("- {pair}: {score:+}\n"));
        }
    }

    let recent: Vec<&str> = state
        .log
        .iter()
        .rev()
        .take(RECENT_LOG_ENTRIES)
        .map(|e| e.text.as_str())
        .collect();
    if !recent.is_empty() {
        out.push_str("\n[최근 서사]\n");
        for text in recent.iter().rev() {
            out.push_str(text);
            out.push('\n');
        }
    }

    out
}

fn clock_line(scenario: &Scenario, state: &GameState) -> String {
    match (&state.clock, &scenario.end_condition) {
        (
            Clock::Days { day },
            EndCondition::TimeLimit {
                value,
                unit: TimeUnit::Days,
            },
        ) => format!("{day}일차 (제한 {value}일)"),
        (Clock::Days { day }, _) => format!("{day}일차"),
        (Clock::Hours { remaining, .. }, _) => {
            format!("{}일차 / 남은 시간 {remaining}시간", state.day())
        }
    }
}

fn status_label(status: SurvivorStatus) -> &'static str {
    match status {
        SurvivorStatus::Alive => "무사",
        SurvivorStatus::Injured => "부상",
        SurvivorStatus::Missing => "실종",
        SurvivorStatus::Dead => "사망",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrative_core::{
        Comparator, Condition, EndingDef, FlagDef, FlagKind, LogEntry, LogKind, PairKey, StatDef,
        Survivor,
    };

    fn scenario() -> Scenario {
        Scenario {
            id: "shelter".into(),
            title: "마지막 대피소".into(),
            player_name: "수진".into(),
            survivors: vec!["민준".into(), "하은".into()],
            stats: vec![
                StatDef {
                    id: "morale".into(),
                    name: "사기".into(),
                    min: 0,
                    max: 100,
                    initial: 50,
                    polarity: StatPolarity::HigherBetter,
                },
                StatDef {
                    id: "threat".into(),
                    name: "위협".into(),
                    min: 0,
                    max: 100,
                    initial: 10,
                    polarity: StatPolarity::HigherWorse,
                },
            ],
            flags: vec![FlagDef {
                name: "supply_runs".into(),
                kind: FlagKind::Count,
                initial: 0,
            }],
            endings: vec![EndingDef {
                id: "rescue".into(),
                title: "구조".into(),
                conditions: vec![Condition::Stat {
                    stat: "morale".into(),
                    cmp: Comparator::AtLeast,
                    value: 80,
                }],
            }],
            end_condition: EndCondition::TimeLimit {
                value: 7,
                unit: TimeUnit::Days,
            },
        }
    }

    #[test]
    fn summary_carries_day_stats_and_roster() {
        let scenario = scenario();
        let state = GameState::from_scenario(&scenario);
        let request = TurnRequest::render(
            "지시문",
            &scenario,
            &state,
            &PlayerAction::new("무전기를 살핀다"),
        );

        assert!(request.state_summary.contains("1일차 (제한 7일)"));
        assert!(request.state_summary.contains("사기(morale): 50 / 0~100"));
        assert!(request.state_summary.contains("(높을수록 위험)"));
        assert!(request.state_summary.contains("- 민준: 무사"));
        assert!(request.state_summary.contains(r#""morale":50"#));
        assert_eq!(request.action, "무전기를 살핀다");
    }

    #[test]
    fn summary_reflects_statuses_flags_and_relationships() {
        let scenario = scenario();
        let mut state = GameState::from_scenario(&scenario);
        state.survivors[0].status = SurvivorStatus::Injured;
        state
            .flags
            .insert("supply_runs".into(), FlagValue::Count(2));
        state
            .relationships
            .insert(PairKey::new("수진", "민준"), 3);

        let summary = state_summary(&scenario, &state);
        assert!(summary.contains("- 민준: 부상"));
        assert!(summary.contains("- supply_runs: 2회"));
        assert!(summary.contains("- 민준-수진: +3"));
    }

    #[test]
    fn hour_clock_summary_shows_remaining_budget() {
        let mut scenario = scenario();
        scenario.end_condition = EndCondition::TimeLimit {
            value: 72,
            unit: TimeUnit::Hours,
        };
        let mut state = GameState::from_scenario(&scenario);
        if let Clock::Hours { remaining, .. } = &mut state.clock {
            *remaining = 47;
        }
        let summary = state_summary(&scenario, &state);
        assert!(summary.contains("2일차 / 남은 시간 47시간"));
    }

    #[test]
    fn recent_log_is_replayed_latest_last() {
        let scenario = scenario();
        let mut state = GameState::from_scenario(&scenario);
        for (i, text) in ["첫 장면.", "둘째 장면.", "셋째 장면.", "넷째 장면."]
            .iter()
            .enumerate()
        {
            state.log.push(LogEntry {
                kind: LogKind::Narrative,
                text: (*text).to_string(),
                day: i as u32 + 1,
            });
        }
        let summary = state_summary(&scenario, &state);
        assert!(!summary.contains("첫 장면."));
        let second = summary.find("둘째 장면.").unwrap();
        let fourth = summary.find("넷째 장면.").unwrap();
        assert!(second < fourth);
    }

    #[test]
    fn message_stitches_instructions_summary_and_action() {
        let scenario = scenario();
        let state = GameState::from_scenario(&scenario);
        let request = TurnRequest::render(
            &default_instructions(),
            &scenario,
            &state,
            &PlayerAction::new("문을 지킨다"),
        );
        let message = request.to_message();
        assert!(message.contains("statDeltas"));
        assert!(message.contains("choiceA"));
        assert!(message.contains("[플레이어 행동]\n문을 지킨다"));
    }

    #[test]
    fn empty_roster_renders_placeholder() {
        let mut scenario = scenario();
        scenario.survivors.clear();
        let state = GameState::from_scenario(&scenario);
        let summary = state_summary(&scenario, &state);
        assert!(summary.contains("[생존자]\n- 없음"));
    }

    #[test]
    fn dead_survivor_is_labelled() {
        let scenario = scenario();
        let mut state = GameState::from_scenario(&scenario);
        state.survivors[1] = Survivor {
            name: "하은".into(),
            status: SurvivorStatus::Dead,
        };
        let summary = state_summary(&scenario, &state);
        assert!(summary.contains("- 하은: 사망"));
    }
}
