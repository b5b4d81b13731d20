use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::scores::ScoreTone;

/// 报告标题
pub const REPORT_TITLE: &str = "Startup Evaluation Report";

/// 内容块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// 第 0 块：标题、日期、总分
    Header,
    Text,
    List,
}

/// 页眉元数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderMeta {
    pub title: String,
    pub generated_at: DateTime<Local>,
    pub score: u8,
    pub tone: ScoreTone,
}

impl HeaderMeta {
    /// "Generated on ..." 中使用的日期
    pub fn generated_on(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }
}

/// 块内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockContent {
    Header(HeaderMeta),
    Paragraph(String),
    Items(Vec<String>),
}

/// 可导出文档中的一个带标题单元
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    pub key: &'static str,
    pub title: String,
    pub kind: BlockKind,
    pub content: BlockContent,
}

impl ContentBlock {
    pub fn text(key: &'static str, title: &str, text: &str) -> Self {
        Self {
            key,
            title: title.to_string(),
            kind: BlockKind::Text,
            content: BlockContent::Paragraph(text.to_string()),
        }
    }

    pub fn list(key: &'static str, title: &str, items: Vec<String>) -> Self {
        Self {
            key,
            title: title.to_string(),
            kind: BlockKind::List,
            content: BlockContent::Items(items),
        }
    }

    pub fn header(meta: HeaderMeta) -> Self {
        Self {
            key: "header",
            title: meta.title.clone(),
            kind: BlockKind::Header,
            content: BlockContent::Header(meta),
        }
    }
}

/// 排版后的文档：页眉块 + 固定顺序的 11 个内容块
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedDocument {
    meta: HeaderMeta,
    header: ContentBlock,
    sections: Vec<ContentBlock>,
}

impl ComposedDocument {
    pub(crate) fn new(meta: HeaderMeta, sections: Vec<ContentBlock>) -> Self {
        Self {
            header: ContentBlock::header(meta.clone()),
            meta,
            sections,
        }
    }

    pub fn header(&self) -> &HeaderMeta {
        &self.meta
    }

    pub fn sections(&self) -> &[ContentBlock] {
        &self.sections
    }

    /// 全部 12 个块，页眉在前
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        std::iter::once(&self.header).chain(self.sections.iter())
    }

    pub fn into_blocks(self) -> Vec<ContentBlock> {
        let mut blocks = Vec::with_capacity(self.sections.len() + 1);
        blocks.push(self.header);
        blocks.extend(self.sections);
        blocks
    }
}
