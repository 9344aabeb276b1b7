// ==========================================
// 纺纱工艺顾问 - 计算指标领域模型
// ==========================================
// 来源: 由 PlantConfiguration 确定性计算得出
// 消费方: 提示词构建、报告组装
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ComputedMetrics - 计算指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMetrics {
    // ===== 细纱 =====
    pub twist_per_inch: f64,                // 捻度 (TPI)
    pub grams_per_spindle_per_shift: f64,   // 单锭每班产量 (g)
    pub ring_production_kg_hr: f64,         // 细纱总产量 (kg/h)
    pub daily_tonnage: f64,                 // 日产量 (t/day)

    // ===== 产能平衡 (建议性) =====
    pub blowroom_feed_kg_hr: f64,      // 清花有效供给 (kg/h)
    pub blowroom_required_kg_hr: f64,  // 清花所需供给 (kg/h,含落棉)
    pub blowroom_balanced: bool,       // 清花能否供得上
    pub cards_required: u32,           // 所需梳棉机台数
    pub winding_capacity_kg_hr: f64,   // 络筒有效产能 (kg/h)
    pub winding_balanced: bool,        // 络筒能否消化细纱产量
}

impl ComputedMetrics {
    /// 指标摘要行（提示词与报告头部使用）
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("TPI: {:.3}", self.twist_per_inch),
            format!(
                "Grams/Spindle/Shift: {:.2} g",
                self.grams_per_spindle_per_shift
            ),
            format!("Ring Production: {:.2} kg/hr", self.ring_production_kg_hr),
            format!("Daily Output: {:.3} tons/day", self.daily_tonnage),
            format!(
                "Blowroom Feed: {:.2} kg/hr available vs {:.2} kg/hr required ({})",
                self.blowroom_feed_kg_hr,
                self.blowroom_required_kg_hr,
                balance_label(self.blowroom_balanced)
            ),
            format!("Cards Required: {}", self.cards_required),
            format!(
                "Winding Capacity: {:.2} kg/hr vs ring {:.2} kg/hr ({})",
                self.winding_capacity_kg_hr,
                self.ring_production_kg_hr,
                balance_label(self.winding_balanced)
            ),
        ]
    }
}

fn balance_label(balanced: bool) -> &'static str {
    if balanced {
        "BALANCED"
    } else {
        "SHORTFALL"
    }
}
