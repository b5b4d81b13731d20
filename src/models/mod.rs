pub mod document;
pub mod evaluation;
pub mod page;
pub mod scores;

pub use document::{BlockContent, BlockKind, ComposedDocument, ContentBlock, HeaderMeta, REPORT_TITLE};
pub use evaluation::{ComponentScores, EvaluationRecord, ListField};
pub use page::{Page, PageSize};
pub use scores::{
    Dimension, NormalizedScoreSet, RadarPoint, RadarSeries, ResolvedScore, ScoreSource, ScoreTone,
    DEFAULT_SCORE,
};
