// ==========================================
// 纺纱工艺顾问 - 领域类型定义
// ==========================================
// 职责: 生成模式、报告栏位、运行阶段等枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 生成模式 (Generation Mode)
// ==========================================
// UNIFIED: 单次请求,四个栏位以分隔符拼接返回
// MULTI_AGENT: 四个独立请求,每个请求一个角色/主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationMode {
    Unified,
    MultiAgent,
}

impl GenerationMode {
    /// 该模式下生成的请求数量
    pub fn request_count(&self) -> usize {
        match self {
            GenerationMode::Unified => 1,
            GenerationMode::MultiAgent => SectionSlot::ALL.len(),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Unified => write!(f, "UNIFIED"),
            GenerationMode::MultiAgent => write!(f, "MULTI_AGENT"),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "UNIFIED" => Ok(GenerationMode::Unified),
            "MULTI_AGENT" | "MULTIAGENT" => Ok(GenerationMode::MultiAgent),
            other => Err(format!("未知的生成模式: {}", other)),
        }
    }
}

// ==========================================
// 报告栏位 (Section Slot)
// ==========================================
// 顺序固定: 纤维分析 → 隔距设置 → 产量 → 商业策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionSlot {
    FiberAnalysis,
    GaugeSettings,
    Yield,
    Strategy,
}

impl SectionSlot {
    /// 规范顺序
    pub const ALL: [SectionSlot; 4] = [
        SectionSlot::FiberAnalysis,
        SectionSlot::GaugeSettings,
        SectionSlot::Yield,
        SectionSlot::Strategy,
    ];

    /// 规范顺序中的下标
    pub fn index(&self) -> usize {
        match self {
            SectionSlot::FiberAnalysis => 0,
            SectionSlot::GaugeSettings => 1,
            SectionSlot::Yield => 2,
            SectionSlot::Strategy => 3,
        }
    }

    /// 报告中使用的栏位标题
    pub fn title(&self) -> &'static str {
        match self {
            SectionSlot::FiberAnalysis => "FIBER ANALYSIS",
            SectionSlot::GaugeSettings => "MACHINE GAUGE SETTINGS",
            SectionSlot::Yield => "PRODUCTION & YIELD",
            SectionSlot::Strategy => "COMMERCIAL STRATEGY",
        }
    }
}

impl fmt::Display for SectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionSlot::FiberAnalysis => write!(f, "FIBER_ANALYSIS"),
            SectionSlot::GaugeSettings => write!(f, "GAUGE_SETTINGS"),
            SectionSlot::Yield => write!(f, "YIELD"),
            SectionSlot::Strategy => write!(f, "STRATEGY"),
        }
    }
}

// ==========================================
// 运行阶段 (Run Stage)
// ==========================================
// 用于失败时指明出错阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStage {
    InputCheck,   // 必填输入检查
    Calculation,  // 产量计算
    PromptBuild,  // 提示词构建
    Generation,   // 调用生成服务
    Segmentation, // 文本分段
    Assembly,     // 报告组装
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::InputCheck => write!(f, "INPUT_CHECK"),
            RunStage::Calculation => write!(f, "CALCULATION"),
            RunStage::PromptBuild => write!(f, "PROMPT_BUILD"),
            RunStage::Generation => write!(f, "GENERATION"),
            RunStage::Segmentation => write!(f, "SEGMENTATION"),
            RunStage::Assembly => write!(f, "ASSEMBLY"),
        }
    }
}
