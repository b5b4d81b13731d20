use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use startup_report::config::{Config, RendererKind};
use startup_report::{logger, App};

#[derive(Debug, Parser)]
#[command(name = "startup-report", version, about = "Evaluate a startup idea and export the assessment as a PDF report")]
struct Cli {
    /// TOML 配置文件
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 渲染后端：headless 或 software
    #[arg(long, global = true)]
    renderer: Option<String>,

    /// 输出目录
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 提交创意并展示评估结果
    Evaluate {
        /// 创意描述
        idea: String,
        /// 同时导出 PDF
        #[arg(long)]
        export: bool,
    },
    /// 从评估结果 JSON 导出 PDF
    Export {
        /// 评估结果文件
        record: PathBuf,
    },
    /// 检查评估服务
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        None => Config::from_env(),
    };
    if let Some(renderer) = &cli.renderer {
        config.renderer = renderer.parse::<RendererKind>()?;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    // 初始化日志
    logger::init(config.verbose_logging);

    let app = App::initialize(config);
    match cli.command {
        Command::Evaluate { idea, export } => app.evaluate(&idea, export).await?,
        Command::Export { record } => app
            .export_file(&record)
            .await
            .with_context(|| format!("导出失败: {}", record.display()))?,
        Command::Health => app.health().await?,
    }

    Ok(())
}
