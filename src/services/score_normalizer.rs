//! 分项得分补齐 - 业务能力层
//!
//! 所有别名与兜底规则只在这里出现，调用方拿到的永远是完整的六维得分。

use tracing::debug;

use crate::models::evaluation::ComponentScores;
use crate::models::scores::{
    Dimension, NormalizedScoreSet, ResolvedScore, ScoreSource, DEFAULT_SCORE,
};
use crate::models::EvaluationRecord;

/// 按优先级链补齐六个维度
///
/// 1. 蛇形键
/// 2. 驼峰别名（按声明顺序）
/// 3. 总分 `feasibility_score`
/// 4. 默认值 50
///
/// 第一个有定义的数值胜出，`0` 也是有定义的数值。
pub fn normalize(record: &EvaluationRecord) -> NormalizedScoreSet {
    let entries = Dimension::ALL.map(|dimension| resolve(record, dimension));

    let defaulted = entries.iter().filter(|e| e.source.is_defaulted()).count();
    if defaulted > 0 {
        debug!(
            "分项得分缺失 {} 项，已使用总分或默认值补齐",
            defaulted
        );
    }

    NormalizedScoreSet::from_entries(entries)
}

fn resolve(record: &EvaluationRecord, dimension: Dimension) -> ResolvedScore {
    let scores = record.component_scores.as_ref();

    if let Some(value) = scores.and_then(|s| primary(s, dimension)) {
        return resolved(value, ScoreSource::Primary);
    }

    if let Some(value) = scores.and_then(|s| aliases(s, dimension).into_iter().flatten().next()) {
        return resolved(value, ScoreSource::Alias);
    }

    if let Some(value) = record.feasibility_score {
        debug!("{} 缺失，使用总分 {}", dimension.key(), value);
        return resolved(value, ScoreSource::Overall);
    }

    debug!("{} 缺失且无总分，使用默认值 {}", dimension.key(), DEFAULT_SCORE);
    ResolvedScore {
        value: DEFAULT_SCORE,
        source: ScoreSource::Default,
    }
}

fn primary(scores: &ComponentScores, dimension: Dimension) -> Option<i64> {
    match dimension {
        Dimension::ProblemClarity => scores.problem_clarity,
        Dimension::MarketDemand => scores.market_demand,
        Dimension::TechnicalFeasibility => scores.technical_feasibility,
        Dimension::InnovationLevel => scores.innovation_level,
        Dimension::Scalability => scores.scalability,
        Dimension::RiskLevel => scores.risk_level,
    }
}

fn aliases(scores: &ComponentScores, dimension: Dimension) -> Vec<Option<i64>> {
    match dimension {
        Dimension::ProblemClarity => vec![scores.problem_clarity_camel],
        Dimension::MarketDemand => vec![scores.market_demand_camel],
        Dimension::TechnicalFeasibility => vec![scores.technical_feasibility_camel],
        Dimension::InnovationLevel => vec![scores.innovation_level_camel, scores.innovation],
        Dimension::Scalability => vec![],
        Dimension::RiskLevel => vec![scores.risk_level_camel],
    }
}

fn resolved(value: i64, source: ScoreSource) -> ResolvedScore {
    ResolvedScore {
        value: value.clamp(0, 100) as u8,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> EvaluationRecord {
        EvaluationRecord::from_json(json).unwrap()
    }

    #[test]
    fn test_fully_populated_unchanged() {
        let r = record(
            r#"{"feasibility_score": 10, "component_scores": {
                "problem_clarity": 11, "market_demand": 22, "technical_feasibility": 33,
                "innovation_level": 44, "scalability": 55, "risk_level": 66}}"#,
        );
        let set = normalize(&r);
        assert_eq!(set.values(), [11, 22, 33, 44, 55, 66]);
        assert_eq!(set.defaulted_count(), 0);
    }

    #[test]
    fn test_missing_breakdown_uses_overall() {
        let set = normalize(&record(r#"{"feasibility_score": 82}"#));
        assert_eq!(set.values(), [82; 6]);
        assert!(set.iter().all(|(d, _)| set.resolved(d).source == ScoreSource::Overall));
    }

    #[test]
    fn test_missing_everything_uses_default() {
        let set = normalize(&record("{}"));
        assert_eq!(set.values(), [50; 6]);
        assert_eq!(set.defaulted_count(), 6);
    }

    #[test]
    fn test_zero_is_not_missing() {
        let set = normalize(&record(
            r#"{"feasibility_score": 45, "component_scores": {"problem_clarity": 0, "market_demand": 60}}"#,
        ));
        assert_eq!(set.get(Dimension::ProblemClarity), 0);
        assert_eq!(set.resolved(Dimension::ProblemClarity).source, ScoreSource::Primary);
        assert_eq!(set.get(Dimension::MarketDemand), 60);
        assert_eq!(set.get(Dimension::Scalability), 45);
    }

    #[test]
    fn test_snake_case_beats_alias() {
        let set = normalize(&record(
            r#"{"component_scores": {"risk_level": 0, "riskLevel": 90, "innovation": 70}}"#,
        ));
        assert_eq!(set.get(Dimension::RiskLevel), 0);
        assert_eq!(set.get(Dimension::InnovationLevel), 70);
        assert_eq!(set.resolved(Dimension::InnovationLevel).source, ScoreSource::Alias);
    }

    #[test]
    fn test_camel_alias_zero_beats_overall() {
        let set = normalize(&record(
            r#"{"feasibility_score": 45, "component_scores": {"marketDemand": 0}}"#,
        ));
        assert_eq!(set.get(Dimension::MarketDemand), 0);
    }

    #[test]
    fn test_innovation_alias_order() {
        let set = normalize(&record(
            r#"{"component_scores": {"innovationLevel": 30, "innovation": 70}}"#,
        ));
        assert_eq!(set.get(Dimension::InnovationLevel), 30);
    }
}
