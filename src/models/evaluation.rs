use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 评估服务返回的结构化评估结果
///
/// 反序列化之后即不可变。所有叙述字段保证已定义（缺失时为空串），
/// 列表字段保证可迭代。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationRecord {
    #[serde(default, deserialize_with = "deserialize_score")]
    pub feasibility_score: Option<i64>,

    #[serde(default)]
    pub component_scores: Option<ComponentScores>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub executive_summary: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub problem_statement: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub target_users: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub market_potential: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub technical_feasibility: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub innovation_uniqueness: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub risks_challenges: String,

    #[serde(default)]
    pub strengths: ListField,
    #[serde(default)]
    pub weaknesses: ListField,
    #[serde(default)]
    pub improvement_suggestions: ListField,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub final_recommendation: String,
}

impl EvaluationRecord {
    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// 六个分项得分
///
/// 蛇形命名与驼峰别名分别保存，优先级由 `ScoreNormalizer` 统一决定。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub problem_clarity: Option<i64>,
    #[serde(rename = "problemClarity", default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub problem_clarity_camel: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub market_demand: Option<i64>,
    #[serde(rename = "marketDemand", default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub market_demand_camel: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub technical_feasibility: Option<i64>,
    #[serde(rename = "technicalFeasibility", default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub technical_feasibility_camel: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub innovation_level: Option<i64>,
    #[serde(rename = "innovationLevel", default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub innovation_level_camel: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub innovation: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub scalability: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<i64>,
    #[serde(rename = "riskLevel", default, deserialize_with = "deserialize_score", skip_serializing_if = "Option::is_none")]
    pub risk_level_camel: Option<i64>,
}

/// 列表字段的原始形态
///
/// 上游偶尔会把列表返回成单个标量，这里如实保存，由排版阶段包装成单项列表。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListField {
    Items(Vec<String>),
    Scalar(String),
}

impl Default for ListField {
    fn default() -> Self {
        ListField::Items(Vec::new())
    }
}

impl ListField {
    /// 以序列形式返回，标量包装为单项列表，空标量视为空列表
    pub fn items(&self) -> Vec<String> {
        match self {
            ListField::Items(items) => items.clone(),
            ListField::Scalar(s) if s.trim().is_empty() => Vec::new(),
            ListField::Scalar(s) => vec![s.clone()],
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, ListField::Scalar(_))
    }
}

impl From<Vec<String>> for ListField {
    fn from(items: Vec<String>) -> Self {
        ListField::Items(items)
    }
}

impl<'de> Deserialize<'de> for ListField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => ListField::default(),
            Value::Array(values) => {
                ListField::Items(values.into_iter().filter_map(value_to_text).collect())
            }
            other => ListField::Scalar(value_to_text(other).unwrap_or_default()),
        })
    }
}

/// 把 JSON 标量转换为文本，null 返回 None
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// 把 JSON 数值转换为 0-100 的整数得分，非数值返回 None
pub(crate) fn score_from_value(value: &Value) -> Option<i64> {
    let number = value.as_f64()?;
    if !number.is_finite() {
        return None;
    }
    Some(number.round().clamp(0.0, 100.0) as i64)
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(score_from_value))
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_defined() {
        let record = EvaluationRecord::from_json(r#"{"feasibility_score": 82}"#).unwrap();
        assert_eq!(record.feasibility_score, Some(82));
        assert!(record.component_scores.is_none());
        assert_eq!(record.executive_summary, "");
        assert_eq!(record.strengths, ListField::Items(vec![]));
    }

    #[test]
    fn test_lenient_values() {
        let record = EvaluationRecord::from_json(
            r#"{
                "feasibility_score": 72.6,
                "executive_summary": null,
                "target_users": 42,
                "strengths": "only one",
                "weaknesses": ["a", 3, null],
                "component_scores": {"problemClarity": 0, "market_demand": "high", "scalability": 140}
            }"#,
        )
        .unwrap();

        assert_eq!(record.feasibility_score, Some(73));
        assert_eq!(record.executive_summary, "");
        assert_eq!(record.target_users, "42");
        assert_eq!(record.strengths, ListField::Scalar("only one".to_string()));
        assert_eq!(record.weaknesses.items(), vec!["a", "3"]);

        let scores = record.component_scores.unwrap();
        assert_eq!(scores.problem_clarity_camel, Some(0));
        assert_eq!(scores.market_demand, None);
        assert_eq!(scores.scalability, Some(100));
    }

    #[test]
    fn test_scalar_list_wraps() {
        assert_eq!(ListField::Scalar("x".into()).items(), vec!["x"]);
        assert!(ListField::Scalar("  ".into()).items().is_empty());
    }
}
