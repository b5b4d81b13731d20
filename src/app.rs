use std::path::Path;

use tracing::{info, warn};

use crate::clients::EvaluatorClient;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{BlockContent, EvaluationRecord};
use crate::orchestrator::ExportController;
use crate::render::Renderer;
use crate::services::document_composer::{compose, overall_score};
use crate::services::score_normalizer::normalize;
use crate::utils::logging::{log_export_summary, log_score_summary, log_startup};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        log_startup(&config);
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 提交创意、展示评估结果，可选导出 PDF
    pub async fn evaluate(&self, idea: &str, export: bool) -> AppResult<()> {
        let client = EvaluatorClient::new(&self.config)?;
        let record = client.evaluate(idea).await?;

        show_evaluation(&record);

        if export {
            self.export(&record).await?;
        }
        Ok(())
    }

    /// 从 JSON 文件加载评估结果并导出
    pub async fn export_file(&self, path: &Path) -> AppResult<()> {
        let record = load_record(path).await?;
        show_evaluation(&record);
        self.export(&record).await
    }

    /// 检查评估服务是否可用
    pub async fn health(&self) -> AppResult<()> {
        let client = EvaluatorClient::new(&self.config)?;
        let status = client.health().await?;
        info!("✓ 评估服务状态: {} {}", status.status, status.message);
        Ok(())
    }

    async fn export(&self, record: &EvaluationRecord) -> AppResult<()> {
        let controller = ExportController::from_config(&self.config, Renderer::from_config(&self.config));
        match controller.export_document(record).await {
            Ok(artifact) => {
                log_export_summary(&artifact);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ {}", e.user_notice());
                Err(AppError::from(e))
            }
        }
    }
}

/// 加载评估结果 JSON
///
/// 同时接受裸记录和 `{ "success": true, "evaluation": {...} }` 形式的完整响应。
pub async fn load_record(path: &Path) -> AppResult<EvaluationRecord> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Other(format!("无法读取评估文件 {}: {}", path.display(), e)))?;

    let value: serde_json::Value = serde_json::from_str(&content).map_err(ApiError::from)?;
    let record_value = match value.get("evaluation") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => value,
    };
    let record = serde_json::from_value(record_value).map_err(ApiError::from)?;
    Ok(record)
}

/// 在终端展示评估结果
fn show_evaluation(record: &EvaluationRecord) {
    let scores = normalize(record);
    log_score_summary(overall_score(record), &scores);

    let document = compose(record);
    for block in document.sections() {
        println!("\n## {}", block.title);
        match &block.content {
            BlockContent::Paragraph(text) => println!("{}", text),
            BlockContent::Items(items) => {
                for item in items {
                    println!("  • {}", item);
                }
            }
            BlockContent::Header(_) => {}
        }
    }
}
