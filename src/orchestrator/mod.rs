//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 串联各能力模块完成一次导出，持有导出期间的状态。
//!
//! ## 层次关系
//!
//! ```text
//! app (CLI 命令)
//!     ↓
//! orchestrator::ExportController (一次导出)
//!     ↓
//! services (排版 / 分页 / PDF 组装 / 得分补齐)
//!     ↓
//! render (渲染目标) → browser / infrastructure (无头浏览器、JsExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单次独占**：一个控制器同一时刻只跑一次导出，不排队
//! 2. **资源隔离**：每次导出自行创建并释放渲染面
//! 3. **无半成品**：失败时不留下任何文件

pub mod export_controller;

pub use export_controller::{artifact_file_name, ExportArtifact, ExportController};
