// ==========================================
// 运行编排器集成测试
// ==========================================
// 测试目标:
// 1. UNIFIED / MULTI_AGENT 正常路径
// 2. 分段降级仍产出报告
// 3. 任一生成调用失败 → 整体失败,无部分报告
// 4. 输入缺失/校验失败时不调用生成服务
// 5. 运行事件写入 run_log
// 6. 凭证不出现在错误文本与 run_log 中
// ==========================================


#[path = "helpers/mock_generation.rs"]
mod mock_generation;

use mock_generation::ScriptedClient;
use spinning_advisor::config::YieldPolicy;
use spinning_advisor::domain::types::{GenerationMode, RunStage, SectionSlot};
use spinning_advisor::domain::PLACEHOLDER_PROCESSING;
use spinning_advisor::engine::{parse_sections, AdvisoryOrchestrator, RunError, RunSettings};
use spinning_advisor::generation::{Credentials, GeminiClient, GenerationError};
use spinning_advisor::repository::RunLogRepository;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_helpers::{create_test_db, open_test_connection, sample_plant};

fn settings(mode: GenerationMode) -> RunSettings {
    RunSettings {
        model_id: "gemini-1.5-flash".to_string(),
        mode,
        credentials: Credentials::new("test-key"),
        call_timeout: Some(Duration::from_secs(5)),
        report_title: "SPINNING PROJECT REPORT".to_string(),
    }
}

fn orchestrator(client: &Arc<ScriptedClient>) -> AdvisoryOrchestrator<ScriptedClient> {
    AdvisoryOrchestrator::new(client.clone(), YieldPolicy::default())
}

// ==========================================
// 正常路径
// ==========================================

#[tokio::test]
async fn test_unified_run_produces_four_sections() {
    let client = Arc::new(ScriptedClient::text(
        "Fiber is premium ||| Set cylinder-flat 0.2 mm ||| TPI 21.909 ||| Sell to knitters",
    ));

    let report = orchestrator(&client)
        .run(sample_plant(), settings(GenerationMode::Unified))
        .await
        .unwrap();

    assert_eq!(client.call_count(), 1);
    assert_eq!(client.model_ids(), vec!["gemini-1.5-flash".to_string()]);
    assert!(!report.degraded);
    assert_eq!(report.section(SectionSlot::FiberAnalysis), "Fiber is premium");
    assert_eq!(report.section(SectionSlot::Strategy), "Sell to knitters");
    assert_eq!(report.metadata.mode, GenerationMode::Unified);
    assert_eq!(report.metadata.title, "SPINNING PROJECT REPORT");
    assert!((report.metrics.twist_per_inch - 21.909).abs() < 5e-4);

    assert_eq!(parse_sections(&report.document), Some(report.sections.clone()));
    assert!(report.document.contains("Raw Material: Giza 86"));
}

#[tokio::test]
async fn test_unified_run_without_delimiters_degrades() {
    let client = Arc::new(ScriptedClient::text("  One unstructured answer.  "));

    let report = orchestrator(&client)
        .run(sample_plant(), settings(GenerationMode::Unified))
        .await
        .unwrap();

    assert!(report.degraded);
    assert_eq!(report.section(SectionSlot::FiberAnalysis), "One unstructured answer.");
    for slot in &SectionSlot::ALL[1..] {
        assert_eq!(report.section(*slot), PLACEHOLDER_PROCESSING);
    }
}

#[tokio::test]
async fn test_multi_agent_calls_run_concurrently() {
    let client = Arc::new(ScriptedClient::per_topic(Vec::new()).with_delay(Duration::from_millis(100)));

    let report = orchestrator(&client)
        .run(sample_plant(), settings(GenerationMode::MultiAgent))
        .await
        .unwrap();

    assert_eq!(client.call_count(), 4);
    assert_eq!(client.max_in_flight(), 4);
    assert!(!report.degraded);

    // 响应按规范栏位顺序归位,与完成顺序无关
    for slot in SectionSlot::ALL.iter() {
        assert_eq!(report.section(*slot), format!("{} body", slot));
    }
}

// ==========================================
// 生成失败
// ==========================================

#[tokio::test]
async fn test_single_failed_topic_aborts_whole_run() {
    let client = Arc::new(ScriptedClient::per_topic(vec![(
        SectionSlot::Yield,
        Err(GenerationError::Transport("connection reset".to_string())),
    )]));

    let err = orchestrator(&client)
        .run(sample_plant(), settings(GenerationMode::MultiAgent))
        .await
        .unwrap_err();

    // 其余 3 个调用照常发出
    assert_eq!(client.call_count(), 4);
    assert_eq!(err.stage(), RunStage::Generation);
    match err {
        RunError::Generation { scope, source } => {
            assert_eq!(scope, "YIELD");
            assert_eq!(source, GenerationError::Transport("connection reset".to_string()));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_scope_lists_every_failed_topic() {
    let client = Arc::new(ScriptedClient::per_topic(vec![
        (SectionSlot::GaugeSettings, Err(GenerationError::Auth("bad key".to_string()))),
        (
            SectionSlot::Strategy,
            Err(GenerationError::EmptyResponse {
                model_id: "gemini-1.5-flash".to_string(),
            }),
        ),
    ]));

    let err = orchestrator(&client)
        .run(sample_plant(), settings(GenerationMode::MultiAgent))
        .await
        .unwrap_err();

    match err {
        RunError::Generation { scope, source } => {
            assert_eq!(scope, "GAUGE_SETTINGS,STRATEGY");
            assert_eq!(source.code(), "AUTH_ERROR");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unified_failure_has_unified_scope() {
    let client = Arc::new(ScriptedClient::always(Err(GenerationError::Auth(
        "401".to_string(),
    ))));

    let err = orchestrator(&client)
        .run(sample_plant(), settings(GenerationMode::Unified))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Generation { ref scope, .. } if scope == "UNIFIED"));
    assert!(err.user_message().starts_with("[GENERATION]"));
}

#[tokio::test]
async fn test_slow_call_times_out_as_transport_failure() {
    let client = Arc::new(ScriptedClient::text("A|||B|||C|||D").with_delay(Duration::from_millis(500)));
    let mut settings = settings(GenerationMode::Unified);
    settings.call_timeout = Some(Duration::from_millis(20));

    let err = orchestrator(&client)
        .run(sample_plant(), settings)
        .await
        .unwrap_err();

    match err {
        RunError::Generation { source, .. } => assert_eq!(source.code(), "TRANSPORT_ERROR"),
        other => panic!("unexpected error: {:?}", other),
    }
}

// ==========================================
// 输入检查
// ==========================================

#[tokio::test]
async fn test_missing_credentials_makes_no_calls() {
    let client = Arc::new(ScriptedClient::text("A|||B|||C|||D"));
    let mut settings = settings(GenerationMode::Unified);
    settings.credentials = None;

    let err = orchestrator(&client)
        .run(sample_plant(), settings)
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::MissingInput { field: "credentials" }));
    assert_eq!(err.stage(), RunStage::InputCheck);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_blank_fiber_makes_no_calls() {
    let client = Arc::new(ScriptedClient::text("A|||B|||C|||D"));
    let mut plant = sample_plant();
    plant.fiber_description = "  \t ".to_string();

    let err = orchestrator(&client)
        .run(plant, settings(GenerationMode::MultiAgent))
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::MissingInput { field: "fiber_description" }));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_numbers_fail_before_generation() {
    let client = Arc::new(ScriptedClient::text("A|||B|||C|||D"));
    let mut plant = sample_plant();
    plant.target_count_ne = 0.0;

    let err = orchestrator(&client)
        .run(plant, settings(GenerationMode::Unified))
        .await
        .unwrap_err();

    match err {
        RunError::Validation(ref v) => assert_eq!(v.field, "target_count_ne"),
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.stage(), RunStage::Calculation);
    assert_eq!(client.call_count(), 0);
}

// ==========================================
// 运行事件
// ==========================================

#[tokio::test]
async fn test_events_are_recorded_in_run_log() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));
    let run_log = Arc::new(RunLogRepository::new(conn));

    let client = Arc::new(ScriptedClient::text("no delimiters here"));
    let report = orchestrator(&client)
        .with_event_publisher(run_log.clone())
        .run(sample_plant(), settings(GenerationMode::Unified))
        .await
        .unwrap();

    let mut logs = run_log.list_recent(10).unwrap();
    logs.reverse();
    let events: Vec<&str> = logs.iter().map(|l| l.event_type.as_str()).collect();
    assert_eq!(
        events,
        vec![
            "RunStarted",
            "GenerationCompleted",
            "SegmentationDegraded",
            "ReportAssembled"
        ]
    );

    let run_id = logs[0].run_id.clone();
    assert!(logs.iter().all(|l| l.run_id == run_id));
    assert_eq!(run_log.find_by_run_id(&run_id).unwrap().len(), 4);

    let assembled = &logs[3];
    assert_eq!(assembled.report_id.as_deref(), Some(report.report_id()));
    assert_eq!(assembled.mode.as_deref(), Some("UNIFIED"));
    assert_eq!(
        assembled.payload_json.as_ref().and_then(|p| p["degraded"].as_bool()),
        Some(true)
    );
}

#[tokio::test]
async fn test_failed_run_is_recorded_with_stage() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));
    let run_log = Arc::new(RunLogRepository::new(conn));

    let client = Arc::new(ScriptedClient::text("A|||B|||C|||D"));
    let mut settings = settings(GenerationMode::Unified);
    settings.credentials = None;

    orchestrator(&client)
        .with_event_publisher(run_log.clone())
        .run(sample_plant(), settings)
        .await
        .unwrap_err();

    let logs = run_log.list_recent(10).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].event_type, "RunFailed");
    assert_eq!(logs[0].stage.as_deref(), Some("INPUT_CHECK"));
    assert!(logs[0].detail.as_deref().unwrap_or_default().contains("credentials"));
}

#[tokio::test]
async fn test_unreachable_service_keeps_api_key_out_of_errors_and_run_log() {
    const KEY: &str = "SUPERSECRETKEY123";

    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));
    let run_log = Arc::new(RunLogRepository::new(conn));

    let client = Arc::new(GeminiClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap());
    let mut settings = settings(GenerationMode::Unified);
    settings.credentials = Credentials::new(KEY);

    let err = AdvisoryOrchestrator::new(client, YieldPolicy::default())
        .with_event_publisher(run_log.clone())
        .run(sample_plant(), settings)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), RunStage::Generation);
    assert!(!err.to_string().contains(KEY));
    assert!(!err.user_message().contains(KEY));

    let logs = run_log.list_recent(10).unwrap();
    let failed = logs.iter().find(|l| l.event_type == "RunFailed").unwrap();
    assert!(failed.detail.is_some());
    for log in &logs {
        assert!(!log.detail.as_deref().unwrap_or_default().contains(KEY));
        let payload = log.payload_json.as_ref().map(|p| p.to_string()).unwrap_or_default();
        assert!(!payload.contains(KEY));
    }
}
