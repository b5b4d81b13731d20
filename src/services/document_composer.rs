//! 文档排版 - 业务能力层
//!
//! 把评估结果线性化为固定顺序的内容块，不关心渲染方式。

use chrono::{DateTime, Local};

use crate::models::document::{ComposedDocument, ContentBlock, HeaderMeta, REPORT_TITLE};
use crate::models::scores::{ScoreTone, DEFAULT_SCORE};
use crate::models::{EvaluationRecord, ListField};

/// 排版当前时刻的文档
pub fn compose(record: &EvaluationRecord) -> ComposedDocument {
    compose_at(record, Local::now())
}

/// 以指定生成时间排版
pub fn compose_at(record: &EvaluationRecord, generated_at: DateTime<Local>) -> ComposedDocument {
    let score = overall_score(record);
    let meta = HeaderMeta {
        title: REPORT_TITLE.to_string(),
        generated_at,
        score,
        tone: ScoreTone::from_score(score),
    };

    let sections = vec![
        ContentBlock::text("executive_summary", "Executive Summary", &record.executive_summary),
        ContentBlock::text("problem_statement", "Problem Statement", &record.problem_statement),
        ContentBlock::text("target_users", "Target Users", &record.target_users),
        ContentBlock::text("market_potential", "Market Potential", &record.market_potential),
        ContentBlock::text("technical_feasibility", "Technical Feasibility", &record.technical_feasibility),
        ContentBlock::text("innovation_uniqueness", "Innovation & Uniqueness", &record.innovation_uniqueness),
        ContentBlock::text("risks_challenges", "Risks & Challenges", &record.risks_challenges),
        list_block("strengths", "Strengths", &record.strengths),
        list_block("weaknesses", "Weaknesses", &record.weaknesses),
        list_block("improvement_suggestions", "Improvement Suggestions", &record.improvement_suggestions),
        ContentBlock::text("final_recommendation", "Final Recommendation", &record.final_recommendation),
    ];

    ComposedDocument::new(meta, sections)
}

/// 页眉展示的总分，缺失时与补齐规则一致取 50
pub fn overall_score(record: &EvaluationRecord) -> u8 {
    record
        .feasibility_score
        .map(|s| s.clamp(0, 100) as u8)
        .unwrap_or(DEFAULT_SCORE)
}

fn list_block(key: &'static str, title: &str, field: &ListField) -> ContentBlock {
    if field.is_scalar() {
        tracing::debug!("{} 以标量形式返回，包装为单项列表", key);
    }
    ContentBlock::list(key, title, field.items())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockContent, BlockKind};

    const ORDER: [&str; 12] = [
        "header",
        "executive_summary",
        "problem_statement",
        "target_users",
        "market_potential",
        "technical_feasibility",
        "innovation_uniqueness",
        "risks_challenges",
        "strengths",
        "weaknesses",
        "improvement_suggestions",
        "final_recommendation",
    ];

    #[test]
    fn test_fixed_order_with_empty_fields() {
        let doc = compose(&EvaluationRecord::default());
        let keys: Vec<&str> = doc.blocks().map(|b| b.key).collect();
        assert_eq!(keys, ORDER);

        let kinds: Vec<BlockKind> = doc.blocks().map(|b| b.kind).collect();
        assert_eq!(kinds[0], BlockKind::Header);
        assert_eq!(kinds.iter().filter(|k| **k == BlockKind::List).count(), 3);
        assert_eq!(kinds.iter().filter(|k| **k == BlockKind::Text).count(), 8);
    }

    #[test]
    fn test_header_tone() {
        let record = EvaluationRecord::from_json(r#"{"feasibility_score": 82}"#).unwrap();
        let doc = compose(&record);
        assert_eq!(doc.header().score, 82);
        assert_eq!(doc.header().tone, ScoreTone::Positive);
        assert_eq!(doc.header().title, REPORT_TITLE);

        let doc = compose(&EvaluationRecord::default());
        assert_eq!(doc.header().score, 50);
        assert_eq!(doc.header().tone, ScoreTone::Neutral);
    }

    #[test]
    fn test_list_items_and_scalar_wrap() {
        let record = EvaluationRecord::from_json(
            r#"{"strengths": ["fast", "cheap"], "weaknesses": "single weakness"}"#,
        )
        .unwrap();
        let blocks = compose(&record).into_blocks();

        assert_eq!(
            blocks[8].content,
            BlockContent::Items(vec!["fast".into(), "cheap".into()])
        );
        assert_eq!(
            blocks[9].content,
            BlockContent::Items(vec!["single weakness".into()])
        );
        assert_eq!(blocks[10].content, BlockContent::Items(vec![]));
    }

    #[test]
    fn test_titles() {
        let doc = compose(&EvaluationRecord::default());
        assert_eq!(doc.sections()[5].title, "Innovation & Uniqueness");
        assert_eq!(doc.sections()[6].title, "Risks & Challenges");
        assert_eq!(doc.sections().len(), 11);
    }
}
