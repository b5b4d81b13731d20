use serde::Serialize;

/// 默认得分，上游没有任何可用数值时使用
pub const DEFAULT_SCORE: u8 = 50;

/// 六个固定评估维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ProblemClarity,
    MarketDemand,
    TechnicalFeasibility,
    InnovationLevel,
    Scalability,
    RiskLevel,
}

impl Dimension {
    /// 固定顺序（同时也是雷达图顺序）
    pub const ALL: [Dimension; 6] = [
        Dimension::ProblemClarity,
        Dimension::MarketDemand,
        Dimension::TechnicalFeasibility,
        Dimension::InnovationLevel,
        Dimension::Scalability,
        Dimension::RiskLevel,
    ];

    /// 蛇形键名
    pub fn key(self) -> &'static str {
        match self {
            Dimension::ProblemClarity => "problem_clarity",
            Dimension::MarketDemand => "market_demand",
            Dimension::TechnicalFeasibility => "technical_feasibility",
            Dimension::InnovationLevel => "innovation_level",
            Dimension::Scalability => "scalability",
            Dimension::RiskLevel => "risk_level",
        }
    }

    /// 雷达图标签
    pub fn chart_label(self) -> &'static str {
        match self {
            Dimension::ProblemClarity => "Problem Clarity",
            Dimension::MarketDemand => "Market Demand",
            Dimension::TechnicalFeasibility => "Technical Feasibility",
            Dimension::InnovationLevel => "Innovation",
            Dimension::Scalability => "Scalability",
            Dimension::RiskLevel => "Risk Management",
        }
    }
}

/// 得分来源
///
/// `Overall` 与 `Default` 对应 MissingFieldDefaulted：静默补齐，不提示用户。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// 蛇形键
    Primary,
    /// 驼峰别名
    Alias,
    /// 总分 feasibility_score
    Overall,
    /// 硬编码默认值
    Default,
}

impl ScoreSource {
    pub fn is_defaulted(self) -> bool {
        matches!(self, ScoreSource::Overall | ScoreSource::Default)
    }
}

/// 单个维度的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedScore {
    pub value: u8,
    pub source: ScoreSource,
}

/// 补齐后的六维得分，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedScoreSet {
    entries: [ResolvedScore; 6],
}

impl NormalizedScoreSet {
    pub(crate) fn from_entries(entries: [ResolvedScore; 6]) -> Self {
        Self { entries }
    }

    pub fn get(&self, dimension: Dimension) -> u8 {
        self.resolved(dimension).value
    }

    pub fn resolved(&self, dimension: Dimension) -> ResolvedScore {
        let idx = Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .unwrap_or_default();
        self.entries[idx]
    }

    /// 按固定顺序返回 (维度, 分值)
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        Dimension::ALL
            .iter()
            .zip(self.entries.iter())
            .map(|(d, r)| (*d, r.value))
    }

    pub fn values(&self) -> [u8; 6] {
        self.entries.map(|r| r.value)
    }

    /// 有多少维度走了兜底
    pub fn defaulted_count(&self) -> usize {
        self.entries.iter().filter(|r| r.source.is_defaulted()).count()
    }

    /// 雷达图数据
    pub fn radar_series(&self) -> RadarSeries {
        RadarSeries {
            points: self
                .iter()
                .map(|(d, v)| RadarPoint {
                    label: d.chart_label(),
                    value: v,
                })
                .collect(),
        }
    }
}

/// 雷达图上的一个点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarPoint {
    pub label: &'static str,
    pub value: u8,
}

/// 雷达图数据，绘制交给界面层
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarSeries {
    pub points: Vec<RadarPoint>,
}

impl RadarSeries {
    pub const AXIS_MAX: u8 = 100;
    pub const AXIS_STEP: u8 = 20;

    /// 刻度值 0, 20, ..., 100
    pub fn ticks() -> Vec<u8> {
        (0..=Self::AXIS_MAX).step_by(Self::AXIS_STEP as usize).collect()
    }

    /// 悬浮提示文本
    pub fn tooltip(point: &RadarPoint) -> String {
        format!("{}: {}/100", point.label, point.value)
    }
}

/// 总分色调
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTone {
    Positive,
    Neutral,
    Negative,
}

impl ScoreTone {
    /// >= 70 积极，>= 50 中性，其余消极
    pub fn from_score(score: u8) -> Self {
        if score >= 70 {
            ScoreTone::Positive
        } else if score >= 50 {
            ScoreTone::Neutral
        } else {
            ScoreTone::Negative
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            ScoreTone::Positive => "#27ae60",
            ScoreTone::Neutral => "#f39c12",
            ScoreTone::Negative => "#e74c3c",
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            ScoreTone::Positive => [0x27, 0xae, 0x60],
            ScoreTone::Neutral => [0xf3, 0x9c, 0x12],
            ScoreTone::Negative => [0xe7, 0x4c, 0x3c],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTone::Positive => "High Potential",
            ScoreTone::Neutral => "Moderate Potential",
            ScoreTone::Negative => "Needs Improvement",
        }
    }
}
