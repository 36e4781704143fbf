use narrative_content::ScenarioLoader;
use narrative_core::{LogKind, PlayerAction, RouteAssessment, Scenario, SurvivorStatus};
use runtime::{
    Event, FileStateRepo, GeneratorError, NarrativeEvent, Runtime, RuntimeError,
    ScriptedGenerator, StateRepository, Topic, TurnEvent,
};

const SHELTER: &str = r#"
    id = "shelter"
    title = "마지막 대피소"
    player_name = "수진"
    survivors = ["민준", "하은"]

    [[stats]]
    id = "morale"
    name = "사기"
    min = 0
    max = 100
    initial = 50

    [[stats]]
    id = "threat"
    name = "위협"
    min = 0
    max = 100
    initial = 10
    polarity = "higher_worse"

    [[flags]]
    name = "radio_fixed"
    kind = "boolean"

    [[endings]]
    id = "rescue"
    title = "구조"

    [[endings.conditions]]
    kind = "flag"
    flag = "radio_fixed"

    [[endings.conditions]]
    kind = "stat"
    stat = "morale"
    cmp = "at_least"
    value = 60

    [end_condition]
    kind = "time_limit"
    value = 7
    unit = "days"
"#;

/// A well-formed response: valid prompt, one in-range delta.
const GOOD_TURN: &str = r#"{
    "narrative": "지하실에서 낡은 무전기를 발견했다.",
    "nextPrompt": {
        "text": "무전기에서 잡음이 흘러나온다.",
        "choiceA": "주파수를 천천히 끝까지 맞춰 본다",
        "choiceB": "소리를 줄이고 내일 다시 살펴본다"
    },
    "statDeltas": {"morale": 4}
}"#;

/// Same shape, but also completes both rescue conditions.
const ENDING_TURN: &str = r#"{
    "narrative": "무전기가 살아나고 구조대와 교신이 닿았다.",
    "nextPrompt": {
        "text": "구조 헬기가 오고 있다.",
        "choiceA": "옥상으로 올라가 신호를 보낸다",
        "choiceB": "모두를 깨워 짐을 챙기게 한다"
    },
    "statDeltas": {"morale": 4},
    "flagsAcquired": ["radio_fixed"]
}"#;

fn shelter() -> Scenario {
    ScenarioLoader::parse(SHELTER).expect("fixture scenario parses")
}

fn action() -> PlayerAction {
    PlayerAction::new("지하실을 수색해 본다")
}

async fn start(responses: Vec<&str>) -> Runtime {
    Runtime::builder()
        .scenario(shelter())
        .generator(ScriptedGenerator::new(responses))
        .build()
        .await
        .expect("runtime builds")
}

#[tokio::test]
async fn full_turn_commits_and_reports() {
    let runtime = start(vec![GOOD_TURN]).await;
    let handle = runtime.handle();

    let report = handle.submit_action(action()).await.unwrap();

    assert_eq!(report.turn, 1);
    assert_eq!(report.day, 2);
    assert_eq!(report.narrative, "지하실에서 낡은 무전기를 발견했다.");
    assert_eq!(report.prompt.choice_a, "주파수를 천천히 끝까지 맞춰 본다");
    assert!(report.issues.is_empty());
    assert!(report.ending.is_none());
    assert!(matches!(report.route, RouteAssessment::Undetermined));

    // mid-band +4 amplifies to +12
    assert_eq!(report.applied.len(), 1);
    assert_eq!(report.applied[0].requested, 4);
    assert_eq!(report.applied[0].applied, 12);
    assert_eq!(report.applied[0].value, 62);

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.day(), 2);
    assert_eq!(state.stats["morale"], 62);
    assert_eq!(state.prompt.text, "무전기에서 잡음이 흘러나온다.");
    assert_eq!(state.latest_narrative(), Some(report.narrative.as_str()));

    let stats = handle.session_stats().await.unwrap();
    assert_eq!(stats.turns_resolved, 1);
    assert_eq!(stats.turns_rejected, 0);
    assert_eq!(stats.generator_calls, 1);
    assert_eq!(stats.quality_issues, 0);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_response_leaves_state_untouched_and_retry_succeeds() {
    let runtime = start(vec!["쓸 만한 JSON이 전혀 아닌 응답", GOOD_TURN]).await;
    let handle = runtime.handle();

    let err = handle.submit_action(action()).await.unwrap_err();
    assert!(matches!(err, RuntimeError::MalformedUpdate(_)));

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.day(), 1);
    assert!(state.log.is_empty());
    assert_eq!(state.stats["morale"], 50);

    // the same action can simply be resubmitted
    let report = handle.submit_action(action()).await.unwrap();
    assert_eq!(report.turn, 1);

    let stats = handle.session_stats().await.unwrap();
    assert_eq!(stats.turns_rejected, 1);
    assert_eq!(stats.turns_resolved, 1);
    assert_eq!(stats.generator_calls, 2);
}

#[tokio::test]
async fn exhausted_generator_surfaces_its_own_error() {
    let runtime = start(vec![]).await;
    let handle = runtime.handle();

    let err = handle.submit_action(action()).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Generator(GeneratorError::Exhausted)
    ));

    // a transport failure is not a rejection
    let stats = handle.session_stats().await.unwrap();
    assert_eq!(stats.generator_calls, 1);
    assert_eq!(stats.turns_rejected, 0);
}

#[tokio::test]
async fn soft_quality_issues_do_not_block_the_turn() {
    let mixed = r#"{
        "narrative": "Everyone panicked 모두가 당황했다 and waited.",
        "nextPrompt": {
            "text": "다음은 어떻게 할까.",
            "choiceA": "주파수를 천천히 끝까지 맞춰 본다",
            "choiceB": "소리를 줄이고 내일 다시 살펴본다"
        }
    }"#;
    let runtime = start(vec![mixed]).await;
    let handle = runtime.handle();

    let report = handle.submit_action(action()).await.unwrap();
    assert_eq!(report.turn, 1);
    assert!(!report.issues.is_empty());

    let stats = handle.session_stats().await.unwrap();
    assert_eq!(stats.turns_resolved, 1);
    assert_eq!(stats.quality_issues, report.issues.len() as u64);
}

#[tokio::test]
async fn ending_trigger_is_reported_and_published() {
    let runtime = start(vec![ENDING_TURN]).await;
    let handle = runtime.handle();
    let mut narrative_rx = handle.subscribe(Topic::Narrative);

    let report = handle.submit_action(action()).await.unwrap();
    let ending = report.ending.expect("rescue should trigger");
    assert_eq!(ending.id, "rescue");
    assert_eq!(ending.title, "구조");

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.flags.len(), 1);
    assert_eq!(state.survivors[0].status, SurvivorStatus::Alive);

    // the narrative stream ends with the ending event
    let mut saw_ending = false;
    while let Ok(event) = narrative_rx.try_recv() {
        if let Event::Narrative(NarrativeEvent::EndingTriggered { ending }) = event {
            assert_eq!(ending.id, "rescue");
            saw_ending = true;
        }
    }
    assert!(saw_ending);
}

#[tokio::test]
async fn events_cover_both_topics_in_order() {
    let runtime = start(vec![GOOD_TURN]).await;
    let handle = runtime.handle();
    let mut turn_rx = handle.subscribe(Topic::Turn);
    let mut narrative_rx = handle.subscribe(Topic::Narrative);

    handle.submit_action(action()).await.unwrap();

    match turn_rx.recv().await.unwrap() {
        Event::Turn(TurnEvent::Resolved { turn, day, issues }) => {
            assert_eq!(turn, 1);
            assert_eq!(day, 2);
            assert_eq!(issues, 0);
        }
        other => panic!("expected a resolved turn, got {other:?}"),
    }

    // narrative entry, day break entry, then the day-advanced marker
    match narrative_rx.recv().await.unwrap() {
        Event::Narrative(NarrativeEvent::Entry { entry }) => {
            assert_eq!(entry.kind, LogKind::Narrative);
            assert_eq!(entry.day, 1);
        }
        other => panic!("expected a narrative entry, got {other:?}"),
    }
    match narrative_rx.recv().await.unwrap() {
        Event::Narrative(NarrativeEvent::Entry { entry }) => {
            assert_eq!(entry.kind, LogKind::DayBreak);
            assert_eq!(entry.day, 2);
        }
        other => panic!("expected a day break entry, got {other:?}"),
    }
    match narrative_rx.recv().await.unwrap() {
        Event::Narrative(NarrativeEvent::DayAdvanced { day }) => assert_eq!(day, 2),
        other => panic!("expected day advancement, got {other:?}"),
    }
}

#[tokio::test]
async fn rejection_is_published_on_the_turn_topic() {
    let runtime = start(vec!["JSON 없는 응답"]).await;
    let handle = runtime.handle();
    let mut turn_rx = handle.subscribe(Topic::Turn);

    let _ = handle.submit_action(action()).await.unwrap_err();

    match turn_rx.recv().await.unwrap() {
        Event::Turn(TurnEvent::Rejected { turn, reason }) => {
            assert_eq!(turn, 1);
            assert!(!reason.is_empty());
        }
        other => panic!("expected a rejected turn, got {other:?}"),
    }
}

#[tokio::test]
async fn progress_and_route_queries_reflect_play() {
    let runtime = start(vec![GOOD_TURN]).await;
    let handle = runtime.handle();

    let before = handle.ending_progress().await.unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id, "rescue");
    assert_eq!((before[0].met, before[0].total), (0, 2));

    handle.submit_action(action()).await.unwrap();

    // morale 62 satisfies one of rescue's two conditions
    let after = handle.ending_progress().await.unwrap();
    assert_eq!((after[0].met, after[0].total), (1, 2));

    // day 2 is still before the activation day
    let route = handle.dominant_route().await.unwrap();
    assert!(matches!(route, RouteAssessment::Undetermined));
}

#[tokio::test]
async fn file_repository_keeps_every_turn_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    let runtime = Runtime::builder()
        .scenario(shelter())
        .generator(ScriptedGenerator::new([GOOD_TURN, GOOD_TURN]))
        .repository(FileStateRepo::new(dir.path()).unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.submit_action(action()).await.unwrap();
    handle.submit_action(action()).await.unwrap();
    drop(handle);
    runtime.shutdown().await.unwrap();

    let repo = FileStateRepo::new(dir.path()).unwrap();
    assert_eq!(repo.list_turns().unwrap(), vec![1, 2]);
    let first = repo.load(1).unwrap().unwrap();
    assert_eq!(first.day(), 2);
    let second = repo.load(2).unwrap().unwrap();
    assert_eq!(second.day(), 3);
}

#[tokio::test]
async fn resumed_session_continues_turn_numbering() {
    let dir = tempfile::tempdir().unwrap();

    let runtime = Runtime::builder()
        .scenario(shelter())
        .generator(ScriptedGenerator::new([GOOD_TURN]))
        .repository(FileStateRepo::new(dir.path()).unwrap())
        .build()
        .await
        .unwrap();
    runtime.handle().submit_action(action()).await.unwrap();
    runtime.shutdown().await.unwrap();

    let repo = FileStateRepo::new(dir.path()).unwrap();
    let (turn, state) = repo.latest().unwrap().unwrap();
    assert_eq!(turn, 1);

    let resumed = Runtime::builder()
        .scenario(shelter())
        .generator(ScriptedGenerator::new([GOOD_TURN]))
        .repository(FileStateRepo::new(dir.path()).unwrap())
        .resume(turn, state)
        .build()
        .await
        .unwrap();
    let report = resumed.handle().submit_action(action()).await.unwrap();
    assert_eq!(report.turn, 2);
    assert_eq!(report.day, 3);
    resumed.shutdown().await.unwrap();

    let repo = FileStateRepo::new(dir.path()).unwrap();
    assert_eq!(repo.list_turns().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn building_without_scenario_or_generator_fails() {
    let err = Runtime::builder()
        .generator(ScriptedGenerator::new(Vec::<String>::new()))
        .build()
        .await;
    assert!(matches!(err, Err(RuntimeError::MissingScenario)));

    let err = Runtime::builder().scenario(shelter()).build().await;
    assert!(matches!(err, Err(RuntimeError::MissingGenerator)));
}

#[tokio::test]
async fn invalid_scenario_is_refused_at_build() {
    let mut scenario = shelter();
    scenario.stats[0].initial = 500;

    let err = Runtime::builder()
        .scenario(scenario)
        .generator(ScriptedGenerator::new(Vec::<String>::new()))
        .build()
        .await;
    assert!(matches!(err, Err(RuntimeError::InvalidScenario(_))));
}
