// ==========================================
// 报告组装器集成测试
// ==========================================
// 测试目标: 文档结构、栏位原样回读、降级占位
// ==========================================

use chrono::{TimeZone, Utc};
use spinning_advisor::domain::types::{GenerationMode, SectionSlot};
use spinning_advisor::domain::{
    PlantConfiguration, ReportMetadata, ReportSections, PLACEHOLDER_PROCESSING,
};
use spinning_advisor::engine::{parse_sections, ReportAssembler, ResponseSegmenter};

fn metadata(mode: GenerationMode) -> ReportMetadata {
    let plant = PlantConfiguration::with_fiber("Supima cotton");
    ReportMetadata {
        report_id: "3f2c9a1e-0000-4000-8000-000000000001".to_string(),
        title: "SPINNING PROJECT REPORT".to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 10, 18, 6, 5, 4).unwrap(),
        model_id: "gemini-1.5-flash".to_string(),
        mode,
        input_echo: plant.echo_lines(),
        metric_lines: vec!["TPI: 21.909".to_string(), "Cards Required: 11".to_string()],
    }
}

#[test]
fn test_document_layout() {
    let sections = ReportSections::new(
        "Fiber body".to_string(),
        "Gauge body".to_string(),
        "Yield body".to_string(),
        "Strategy body".to_string(),
    );
    let doc = ReportAssembler::new().assemble(&metadata(GenerationMode::MultiAgent), &sections);

    assert!(doc.starts_with("SPINNING PROJECT REPORT\n"));
    assert!(doc.contains("DATE: 2026-10-18 06:05:04 UTC"));
    assert!(doc.contains("REPORT ID: 3f2c9a1e-0000-4000-8000-000000000001"));
    assert!(doc.contains("MODEL: gemini-1.5-flash"));
    assert!(doc.contains("MODE: MULTI_AGENT"));
    assert!(doc.contains("\nINPUTS:\n  Raw Material: Supima cotton"));
    assert!(doc.contains("\nCOMPUTED FIGURES:\n  TPI: 21.909\n  Cards Required: 11"));
    assert!(doc.contains("\n\n=== FIBER ANALYSIS ===\nFiber body\n\n=== MACHINE GAUGE SETTINGS ===\n"));
    assert!(doc.ends_with("Strategy body\n\n=== END OF REPORT ===\n"));
}

#[test]
fn test_segmented_response_survives_assembly() {
    let raw = "Staple OK ||| Gauge 0.2 mm ||| TPI 21.9 ||| Premium knits";
    let outcome = ResponseSegmenter::new().segment_unified(raw);
    let doc = ReportAssembler::new().assemble(&metadata(GenerationMode::Unified), &outcome.sections);

    let parsed = parse_sections(&doc).unwrap();
    assert_eq!(parsed, outcome.sections);
    assert_eq!(parsed.get(SectionSlot::Yield), "TPI 21.9");
}

#[test]
fn test_degraded_sections_keep_raw_text_and_placeholders() {
    let raw = "The model ignored the delimiter and wrote one long essay.";
    let outcome = ResponseSegmenter::new().segment_unified(raw);
    let doc = ReportAssembler::new().assemble(&metadata(GenerationMode::Unified), &outcome.sections);

    let parsed = parse_sections(&doc).unwrap();
    assert_eq!(parsed.get(SectionSlot::FiberAnalysis), raw);
    for slot in &SectionSlot::ALL[1..] {
        assert_eq!(parsed.get(*slot), PLACEHOLDER_PROCESSING);
    }
}

#[test]
fn test_assembly_is_pure() {
    let sections = ReportSections::with_placeholders("only".to_string(), PLACEHOLDER_PROCESSING);
    let meta = metadata(GenerationMode::Unified);
    let assembler = ReportAssembler::new();
    assert_eq!(assembler.assemble(&meta, &sections), assembler.assemble(&meta, &sections));
}

#[test]
fn test_banner_text_in_fiber_description_and_bodies_does_not_shift_sections() {
    let mut meta = metadata(GenerationMode::Unified);
    let plant =
        PlantConfiguration::with_fiber("Supima cotton\n\n=== FIBER ANALYSIS ===\nfake section");
    meta.input_echo = plant.echo_lines();

    let sections = ReportSections::new(
        "Overview\n\n=== MACHINE GAUGE SETTINGS ===\nsee below".to_string(),
        "Gauge body".to_string(),
        "Yield body".to_string(),
        "Strategy body".to_string(),
    );
    let doc = ReportAssembler::new().assemble(&meta, &sections);

    // 头部中的伪标记已转义,真实标记各出现一次
    assert!(doc.contains("\\=== FIBER ANALYSIS ===\nfake section"));
    assert_eq!(doc.matches("\n\n=== FIBER ANALYSIS ===\n").count(), 1);
    assert_eq!(doc.matches("\n\n=== MACHINE GAUGE SETTINGS ===\n").count(), 1);

    let parsed = parse_sections(&doc).unwrap();
    assert_eq!(parsed, sections);
    assert_eq!(parsed.get(SectionSlot::GaugeSettings), "Gauge body");
}
