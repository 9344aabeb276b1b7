// ==========================================
// 纺纱工艺顾问 - 提示词构建器
// ==========================================
// 职责: 把工厂配置与计算指标渲染为发往生成服务的指令文本
// 红线: 纯文本构建,无网络、无副作用
//       提示词中引用的输入数值必须与输入原样一致（同一格式）
// ==========================================
// 模式:
// - UNIFIED: 1 个请求,要求 4 个栏位以 "|||" 分隔
// - MULTI_AGENT: 4 个请求,每个请求一个角色,只写一个栏位
// ==========================================

use crate::config::YieldPolicy;
use crate::domain::metrics::ComputedMetrics;
use crate::domain::plant::PlantConfiguration;
use crate::domain::prompt::PromptRequest;
use crate::domain::types::{GenerationMode, SectionSlot};
use crate::engine::segmenter::SECTION_DELIMITER;
use std::fmt::Write;

const RULE: &str = "------------------------------------------------------------------";

// ==========================================
// PromptBuilder
// ==========================================
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    mode: GenerationMode,
    policy: YieldPolicy,
}

impl PromptBuilder {
    pub fn new(mode: GenerationMode, policy: YieldPolicy) -> Self {
        Self { mode, policy }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// 构建请求序列
    ///
    /// # 返回
    /// - UNIFIED: 长度 1
    /// - MULTI_AGENT: 长度 4,按规范栏位顺序
    pub fn build(
        &self,
        plant: &PlantConfiguration,
        metrics: Option<&ComputedMetrics>,
        model_id: &str,
    ) -> Vec<PromptRequest> {
        match self.mode {
            GenerationMode::Unified => {
                vec![PromptRequest::unified(
                    self.unified_prompt(plant, metrics),
                    model_id,
                )]
            }
            GenerationMode::MultiAgent => SectionSlot::ALL
                .iter()
                .map(|slot| {
                    PromptRequest::for_topic(
                        self.topic_prompt(*slot, plant, metrics),
                        model_id,
                        *slot,
                    )
                })
                .collect(),
        }
    }

    // ==========================================
    // UNIFIED
    // ==========================================

    fn unified_prompt(&self, plant: &PlantConfiguration, metrics: Option<&ComputedMetrics>) -> String {
        let mut out = String::new();
        out.push_str("Act as the Technical Board of a ring-spinning mill.\n");
        out.push_str("Generate a full Spinning Project Report based on these inputs:\n\n");
        out.push_str(&input_block(plant));
        out.push_str(&metrics_block(metrics));

        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(
            out,
            "GENERATE {} SECTIONS. SEPARATE EACH SECTION WITH \"{}\".",
            SectionSlot::ALL.len(),
            SECTION_DELIMITER
        );
        let _ = writeln!(
            out,
            "Do not write \"{}\" anywhere else. Do not add a preamble.",
            SECTION_DELIMITER
        );
        let _ = writeln!(out, "{}\n", RULE);

        for (i, slot) in SectionSlot::ALL.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out, "{}\n", SECTION_DELIMITER);
            }
            let _ = writeln!(out, "SECTION {}: {}", i + 1, slot.title());
            for task in self.section_tasks(*slot, plant) {
                let _ = writeln!(out, "- {}", task);
            }
            out.push('\n');
        }

        out
    }

    // ==========================================
    // MULTI_AGENT
    // ==========================================

    fn topic_prompt(
        &self,
        slot: SectionSlot,
        plant: &PlantConfiguration,
        metrics: Option<&ComputedMetrics>,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Act as the {} of a ring-spinning mill.", role_for(slot));
        let _ = writeln!(
            out,
            "Write only the {} section of a Spinning Project Report.\n",
            slot.title()
        );
        out.push_str(&input_block(plant));
        out.push_str(&metrics_block(metrics));

        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "SECTION: {}", slot.title());
        for task in self.section_tasks(slot, plant) {
            let _ = writeln!(out, "- {}", task);
        }
        let _ = writeln!(out, "{}", RULE);
        out.push_str("Respond with plain text for this section only. Do not add a preamble.\n");

        out
    }

    // ==========================================
    // 栏位任务
    // ==========================================

    fn section_tasks(&self, slot: SectionSlot, plant: &PlantConfiguration) -> Vec<String> {
        match slot {
            SectionSlot::FiberAnalysis => vec![
                "Assess quality.".to_string(),
                "Identify spinning risks (neps, trash, moisture).".to_string(),
            ],
            SectionSlot::GaugeSettings => vec![
                "Blowroom Beater Settings.".to_string(),
                "Carding Settings (Cylinder-Flat gauge).".to_string(),
                "Drawframe Roller Distances.".to_string(),
                "Ring Frame Spacer Size & Break Draft.".to_string(),
            ],
            SectionSlot::Yield => vec![
                format!(
                    "Calculate TPI = {} * sqrt({}).",
                    plant.twist_multiplier, plant.target_count_ne
                ),
                format!(
                    "Calculate Grams/Spindle/Shift ({}hrs) = ({} * 60 * {} * {}/100) / TPI * {} / ({} * {}).",
                    self.policy.shift_hours,
                    plant.spindle_speed_rpm,
                    self.policy.shift_hours,
                    plant.ring_efficiency_pct,
                    self.policy.inches_to_meters,
                    self.policy.meters_per_gram_per_ne,
                    plant.target_count_ne
                ),
                format!(
                    "Calculate Total Ring Production (Tons/Day) for {} Spindles over {} shifts.",
                    plant.spindle_count, self.policy.shifts_per_day
                ),
                format!(
                    "Check if Blowroom ({} kg/hr) can feed this production.",
                    plant.blowroom_capacity_kg_hr
                ),
                "Check if Winding capacity balances with Ring Production.".to_string(),
            ],
            SectionSlot::Strategy => vec![
                "Best end-use application.".to_string(),
                "Market positioning (Low/Med/High).".to_string(),
            ],
        }
    }
}

fn role_for(slot: SectionSlot) -> &'static str {
    match slot {
        SectionSlot::FiberAnalysis => "Fiber Quality Scientist",
        SectionSlot::GaugeSettings => "Maintenance & Settings Engineer",
        SectionSlot::Yield => "Production Planning Manager",
        SectionSlot::Strategy => "Commercial Director",
    }
}

/// 用户原始输入块（数值格式与 PlantConfiguration::echo_lines 一致）
fn input_block(plant: &PlantConfiguration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "RAW MATERIAL: {}", plant.fiber_description.trim());
    let _ = writeln!(
        out,
        "TARGET: Ne {}, TM {}\n",
        plant.target_count_ne, plant.twist_multiplier
    );
    out.push_str("MACHINERY DATA:\n");
    let _ = writeln!(
        out,
        "- Blowroom: {} kg/hr @ {}% eff",
        plant.blowroom_capacity_kg_hr, plant.blowroom_efficiency_pct
    );
    let _ = writeln!(
        out,
        "- Carding: {} kg/hr/machine @ {}% eff",
        plant.card_production_kg_hr, plant.card_efficiency_pct
    );
    let _ = writeln!(
        out,
        "- Ring Frame: {} Spindles @ {} RPM @ {}% eff",
        plant.spindle_count, plant.spindle_speed_rpm, plant.ring_efficiency_pct
    );
    let _ = writeln!(
        out,
        "- Winding: {} Drums @ {} m/min @ {}% eff\n",
        plant.winding_drums, plant.winding_speed_m_min, plant.winding_efficiency_pct
    );
    out
}

fn metrics_block(metrics: Option<&ComputedMetrics>) -> String {
    let metrics = match metrics {
        Some(m) => m,
        None => return String::new(),
    };

    let mut out = String::from("LOCALLY COMPUTED FIGURES (verify against your own arithmetic):\n");
    for line in metrics.summary_lines() {
        let _ = writeln!(out, "- {}", line);
    }
    out.push('\n');
    out
}
