// ==========================================
// 纺纱工艺顾问 - 响应分段器
// ==========================================
// 职责: 原始响应文本 → 固定 4 栏位
// 红线: 分段失败不是错误,降级为占位文本并记录 warn
// ==========================================

use crate::domain::report::{ReportSections, PLACEHOLDER_ERROR, PLACEHOLDER_PROCESSING};
use crate::domain::types::{GenerationMode, SectionSlot};
use tracing::{debug, warn};

/// 统一模式栏位分隔符
pub const SECTION_DELIMITER: &str = "|||";

// ==========================================
// SegmentationOutcome - 分段结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationOutcome {
    pub sections: ReportSections,
    pub degraded: bool,     // 是否使用了占位文本
    pub piece_count: usize, // UNIFIED: 分隔后片段数; MULTI_AGENT: 有效响应数
}

// ==========================================
// ResponseSegmenter
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSegmenter;

impl ResponseSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// 按模式分段
    ///
    /// # 参数
    /// - raw: UNIFIED 为单个响应；MULTI_AGENT 为按栏位顺序的响应（None 表示该栏位无响应）
    pub fn segment(&self, mode: GenerationMode, raw: &[Option<String>]) -> SegmentationOutcome {
        match mode {
            GenerationMode::Unified => {
                let text = raw.first().and_then(|r| r.as_deref()).unwrap_or_default();
                self.segment_unified(text)
            }
            GenerationMode::MultiAgent => self.segment_multi(raw),
        }
    }

    /// 统一模式: 按 "|||" 切分
    ///
    /// - 片段数 >= 4: 取前 4 个（去首尾空白）,多余片段丢弃
    /// - 片段数 < 4: 整个原文（去首尾空白）放入首栏位,其余为 "Processing..."
    pub fn segment_unified(&self, raw: &str) -> SegmentationOutcome {
        let pieces: Vec<&str> = raw.split(SECTION_DELIMITER).collect();
        let piece_count = pieces.len();

        if piece_count >= SectionSlot::ALL.len() {
            if piece_count > SectionSlot::ALL.len() {
                debug!(piece_count, "响应片段多于栏位数,丢弃多余片段");
            }
            let sections = ReportSections::new(
                pieces[0].trim().to_string(),
                pieces[1].trim().to_string(),
                pieces[2].trim().to_string(),
                pieces[3].trim().to_string(),
            );
            return SegmentationOutcome {
                sections,
                degraded: false,
                piece_count,
            };
        }

        warn!(
            piece_count,
            expected = SectionSlot::ALL.len(),
            "响应分隔符不足,整段原文放入首栏位"
        );
        SegmentationOutcome {
            sections: ReportSections::with_placeholders(
                raw.trim().to_string(),
                PLACEHOLDER_PROCESSING,
            ),
            degraded: true,
            piece_count,
        }
    }

    /// 多代理模式: 第 i 个响应 → 第 i 个栏位
    pub fn segment_multi(&self, raw: &[Option<String>]) -> SegmentationOutcome {
        let mut bodies: [String; 4] = Default::default();
        let mut piece_count = 0;

        for slot in SectionSlot::ALL.iter() {
            match raw.get(slot.index()).and_then(|r| r.as_deref()) {
                Some(text) => {
                    bodies[slot.index()] = text.trim().to_string();
                    piece_count += 1;
                }
                None => {
                    warn!(slot = %slot, "栏位无响应,填充占位");
                    bodies[slot.index()] = PLACEHOLDER_ERROR.to_string();
                }
            }
        }

        SegmentationOutcome {
            sections: ReportSections::from_array(bodies),
            degraded: piece_count < SectionSlot::ALL.len(),
            piece_count,
        }
    }
}
