// ==========================================
// 纺纱工艺顾问 - 报告领域模型
// ==========================================
// 不变量: 报告永远恰好 4 个栏位,按规范顺序排列
//         (纤维分析 → 隔距设置 → 产量 → 商业策略)
// ==========================================

use crate::domain::metrics::ComputedMetrics;
use crate::domain::plant::PlantConfiguration;
use crate::domain::types::{GenerationMode, SectionSlot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 统一模式分段不足时的占位文本
pub const PLACEHOLDER_PROCESSING: &str = "Processing...";

/// 多代理模式某栏位无响应时的占位文本
pub const PLACEHOLDER_ERROR: &str = "Error";

// ==========================================
// ReportSections - 固定 4 栏位
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSections {
    bodies: [String; 4],
}

impl ReportSections {
    /// 按规范顺序构造
    pub fn new(fiber: String, gauges: String, yield_body: String, strategy: String) -> Self {
        Self {
            bodies: [fiber, gauges, yield_body, strategy],
        }
    }

    pub fn from_array(bodies: [String; 4]) -> Self {
        Self { bodies }
    }

    /// 首栏位为给定文本,其余填充占位
    pub fn with_placeholders(first: String, placeholder: &str) -> Self {
        Self::new(
            first,
            placeholder.to_string(),
            placeholder.to_string(),
            placeholder.to_string(),
        )
    }

    pub fn get(&self, slot: SectionSlot) -> &str {
        &self.bodies[slot.index()]
    }

    /// 按规范顺序遍历 (栏位, 正文)
    pub fn iter(&self) -> impl Iterator<Item = (SectionSlot, &str)> {
        SectionSlot::ALL
            .iter()
            .map(move |slot| (*slot, self.bodies[slot.index()].as_str()))
    }

    pub fn as_array(&self) -> &[String; 4] {
        &self.bodies
    }

    pub fn into_array(self) -> [String; 4] {
        self.bodies
    }

    /// 含有占位文本的栏位数
    pub fn placeholder_count(&self) -> usize {
        self.bodies
            .iter()
            .filter(|b| b.as_str() == PLACEHOLDER_PROCESSING || b.as_str() == PLACEHOLDER_ERROR)
            .count()
    }
}

// ==========================================
// ReportMetadata - 报告头部信息
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub report_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub model_id: String,
    pub mode: GenerationMode,
    pub input_echo: Vec<String>,   // 关键输入回显
    pub metric_lines: Vec<String>, // 本地计算指标
}

// ==========================================
// Report - 最终报告
// ==========================================
// 生命周期: 成功运行后创建一次,导出或被新运行替代
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub plant: PlantConfiguration,
    pub metrics: ComputedMetrics,
    pub sections: ReportSections,
    pub degraded: bool, // 分段是否降级
    pub document: String, // 组装后的纯文本文档
}

impl Report {
    pub fn report_id(&self) -> &str {
        &self.metadata.report_id
    }

    pub fn section(&self, slot: SectionSlot) -> &str {
        self.sections.get(slot)
    }
}
