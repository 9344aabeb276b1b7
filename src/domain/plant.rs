// ==========================================
// 纺纱工艺顾问 - 工厂配置领域模型
// ==========================================
// 用途: 一次模拟运行的全部用户输入
// 生命周期: 每次运行创建一次,创建后不再修改
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PlantConfiguration - 工厂配置
// ==========================================
// 说明: 效率字段均为百分比(0~100),原样回显到提示词与报告中,
//       进入计算器前再换算为 0~1 的小数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfiguration {
    // ===== 原料 =====
    pub fiber_description: String, // 纤维规格描述 (自由文本)

    // ===== 目标 =====
    pub target_count_ne: f64,   // 目标支数 (Ne, 英制支数)
    pub twist_multiplier: f64,  // 捻系数 (TM)

    // ===== 清花 =====
    pub blowroom_capacity_kg_hr: f64, // 清花产能 (kg/h)
    pub blowroom_efficiency_pct: f64, // 清花效率 (%)

    // ===== 梳棉 =====
    pub card_production_kg_hr: f64, // 单台梳棉机产量 (kg/h)
    pub card_efficiency_pct: f64,   // 梳棉效率 (%)

    // ===== 细纱 =====
    pub spindle_count: u32,         // 细纱锭数
    pub spindle_speed_rpm: f64,     // 锭速 (rpm)
    pub ring_efficiency_pct: f64,   // 细纱效率 (%)

    // ===== 络筒 =====
    pub winding_drums: u32,          // 自动络筒锭数
    pub winding_speed_m_min: f64,    // 络筒速度 (m/min)
    pub winding_efficiency_pct: f64, // 络筒效率 (%)
}

impl PlantConfiguration {
    /// 典型环锭纺工厂的默认参数
    ///
    /// 纤维描述为空,需由调用方填写
    pub fn default_mill() -> Self {
        Self {
            fiber_description: String::new(),
            target_count_ne: 30.0,
            twist_multiplier: 4.0,
            blowroom_capacity_kg_hr: 800.0,
            blowroom_efficiency_pct: 85.0,
            card_production_kg_hr: 60.0,
            card_efficiency_pct: 100.0,
            spindle_count: 25_000,
            spindle_speed_rpm: 18_500.0,
            ring_efficiency_pct: 95.0,
            winding_drums: 600,
            winding_speed_m_min: 1_300.0,
            winding_efficiency_pct: 88.0,
        }
    }

    /// 以默认参数创建,并填写纤维描述
    pub fn with_fiber(fiber_description: impl Into<String>) -> Self {
        Self {
            fiber_description: fiber_description.into(),
            ..Self::default_mill()
        }
    }

    /// 纤维描述是否为空（仅空白也视为空）
    pub fn has_fiber_description(&self) -> bool {
        !self.fiber_description.trim().is_empty()
    }

    /// 关键输入回显（报告头部使用）
    ///
    /// 数值格式与提示词中保持一致
    pub fn echo_lines(&self) -> Vec<String> {
        vec![
            format!("Raw Material: {}", self.fiber_description.trim()),
            format!(
                "Target: Ne {}, TM {}",
                self.target_count_ne, self.twist_multiplier
            ),
            format!(
                "Blowroom: {} kg/hr @ {}% eff",
                self.blowroom_capacity_kg_hr, self.blowroom_efficiency_pct
            ),
            format!(
                "Carding: {} kg/hr/machine @ {}% eff",
                self.card_production_kg_hr, self.card_efficiency_pct
            ),
            format!(
                "Ring Frame: {} Spindles @ {} RPM @ {}% eff",
                self.spindle_count, self.spindle_speed_rpm, self.ring_efficiency_pct
            ),
            format!(
                "Winding: {} Drums @ {} m/min @ {}% eff",
                self.winding_drums, self.winding_speed_m_min, self.winding_efficiency_pct
            ),
        ]
    }
}
