/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::{NormalizedScoreSet, ScoreTone};
use crate::orchestrator::ExportArtifact;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 创业创意评估报告");
    info!("🌐 评估服务: {}", config.api_base_url);
    info!("🖨️ 渲染后端: {:?}, 纸张: {:.1}mm x {:.1}mm", config.renderer, config.page_size.width_mm(), config.page_size.height_mm());
    info!("📁 输出目录: {}", config.output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录评估得分概览
pub fn log_score_summary(score: u8, scores: &NormalizedScoreSet) {
    let tone = ScoreTone::from_score(score);
    info!("\n{}", "─".repeat(60));
    info!("📊 可行性得分: {}/100 ({})", score, tone.label());
    for point in scores.radar_series().points {
        info!("   {:<24} {:>3}/100", point.label, point.value);
    }
    info!("{}", "─".repeat(60));
}

/// 打印导出结果
pub fn log_export_summary(artifact: &ExportArtifact) {
    info!("\n{}", "=".repeat(60));
    info!("📄 PDF 报告导出完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("页数: {}", artifact.page_count);
    info!("大小: {} 字节", artifact.size_bytes);
    info!("{}", "=".repeat(60));
    info!("\n报告已保存至: {}", artifact.path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
