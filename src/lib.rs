//! # Startup Report
//!
//! 提交创业创意、展示评估结果，并把评估结果导出为多页 PDF 报告
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 启动和关闭无头浏览器会话
//! - `infrastructure/` - `JsExecutor`，在离屏页面上执行脚本
//!
//! ### ② 业务能力层（Services / Render）
//! - `services/score_normalizer` - 六项维度得分补齐
//! - `services/document_composer` - 评估结果排成固定顺序的内容块
//! - `render/` - `RenderTarget`，把文档光栅化为位图
//! - `services/paginator` - 按纸张比例切页
//! - `services/pdf_writer` - 组装 PDF 字节
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/export_controller` - 一次完整导出，持有 `generating` 状态
//!
//! ### ④ 入口层（App）
//! - `clients/` - 评估服务 HTTP 客户端
//! - `app` - CLI 命令实现
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::EvaluatorClient;
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ExportError, RenderError, WriteError};
pub use models::{ComposedDocument, EvaluationRecord, NormalizedScoreSet, PageSize};
pub use orchestrator::{ExportArtifact, ExportController};
pub use render::{Bitmap, RenderTarget, Renderer};
pub use services::{compose, normalize, paginate, pagination_plan, PdfWriter};
