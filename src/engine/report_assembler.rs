// ==========================================
// 纺纱工艺顾问 - 报告组装器
// ==========================================
// 职责: (报告头部, 4 栏位) → 可导出的纯文本文档
// 红线: 纯函数；栏位正文原样写入,不做修剪或改写
//       唯一例外: 以 === 开头的行（含已带反斜杠的）前加一个 \,
//       保证文档中行首的 === 只可能是栏位标记
// ==========================================
// 文档格式:
//   {TITLE}
//   DATE: ...
//   ...头部...
//
//   === FIBER ANALYSIS ===
//   {正文}
//
//   === MACHINE GAUGE SETTINGS ===
//   ...
//
//   === END OF REPORT ===
// ==========================================

use crate::domain::report::{ReportMetadata, ReportSections};
use crate::domain::types::SectionSlot;
use std::fmt::Write;

const END_BANNER_TITLE: &str = "END OF REPORT";

fn banner(title: &str) -> String {
    format!("\n\n=== {} ===\n", title)
}

/// 去掉行首反斜杠后以 === 开头
fn is_banner_like(line: &str) -> bool {
    line.trim_start_matches('\\').starts_with("===")
}

fn escape_banner_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if is_banner_like(line) {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_banner_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.starts_with('\\') && is_banner_like(line) {
                &line[1..]
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    /// 组装文档
    pub fn assemble(&self, metadata: &ReportMetadata, sections: &ReportSections) -> String {
        let mut doc = String::new();

        let _ = writeln!(doc, "{}", escape_banner_lines(&metadata.title));
        let _ = writeln!(
            doc,
            "DATE: {}",
            metadata.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(doc, "REPORT ID: {}", metadata.report_id);
        let _ = writeln!(doc, "MODEL: {}", escape_banner_lines(&metadata.model_id));
        let _ = write!(doc, "MODE: {}", metadata.mode);

        if !metadata.input_echo.is_empty() {
            doc.push_str("\n\nINPUTS:");
            for line in &metadata.input_echo {
                let _ = write!(doc, "\n  {}", escape_banner_lines(line));
            }
        }

        if !metadata.metric_lines.is_empty() {
            doc.push_str("\n\nCOMPUTED FIGURES:");
            for line in &metadata.metric_lines {
                let _ = write!(doc, "\n  {}", escape_banner_lines(line));
            }
        }

        for (slot, body) in sections.iter() {
            doc.push_str(&banner(slot.title()));
            doc.push_str(&escape_banner_lines(body));
        }

        doc.push_str(&banner(END_BANNER_TITLE));
        doc
    }
}

/// 按栏位标记重新解析文档
///
/// 返回组装时写入的 4 个栏位正文；标记缺失或顺序错误时返回 None
///
/// 头部与正文中行首的 === 均已转义,因此首个匹配即真实标记
pub fn parse_sections(document: &str) -> Option<ReportSections> {
    let mut bodies: [String; 4] = Default::default();

    let first = banner(SectionSlot::ALL[0].title());
    let mut cursor = document.find(&first)? + first.len();

    for slot in SectionSlot::ALL.iter() {
        let next_title = match SectionSlot::ALL.get(slot.index() + 1) {
            Some(next) => next.title(),
            None => END_BANNER_TITLE,
        };
        let next_banner = banner(next_title);
        let end = cursor + document[cursor..].find(&next_banner)?;

        bodies[slot.index()] = unescape_banner_lines(&document[cursor..end]);
        cursor = end + next_banner.len();
    }

    Some(ReportSections::from_array(bodies))
}
