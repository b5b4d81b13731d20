//! 导出控制器 - 编排层
//!
//! 排版 → 光栅化 → 分页 → PDF 组装 → 写文件。
//! 持有唯一的 `generating` 状态，界面据此禁止并发导出。

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{ExportError, WriteError};
use crate::models::{EvaluationRecord, PageSize};
use crate::render::RenderTarget;
use crate::services::document_composer::compose;
use crate::services::paginator::paginate;
use crate::services::pdf_writer::PdfWriter;

/// 导出产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub page_count: usize,
    pub size_bytes: usize,
}

/// 导出控制器
pub struct ExportController<R> {
    renderer: R,
    page_size: PageSize,
    output_dir: PathBuf,
    generating: watch::Sender<bool>,
    clock: fn() -> i64,
}

fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl<R: RenderTarget> ExportController<R> {
    pub fn new(renderer: R, page_size: PageSize, output_dir: impl Into<PathBuf>) -> Self {
        let (generating, _) = watch::channel(false);
        Self {
            renderer,
            page_size,
            output_dir: output_dir.into(),
            generating,
            clock: epoch_millis,
        }
    }

    /// 替换产物命名使用的时钟
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn from_config(config: &Config, renderer: R) -> Self {
        Self::new(renderer, config.page_size, config.output_dir.clone())
    }

    /// 订阅 `generating` 变化
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.generating.subscribe()
    }

    pub fn is_generating(&self) -> bool {
        *self.generating.borrow()
    }

    /// 执行一次完整导出
    ///
    /// 调用方负责在 `generating` 为 true 时不再发起新的导出。
    /// 失败时不会留下任何文件，也不会自动重试。
    pub async fn export_document(
        &self,
        record: &EvaluationRecord,
    ) -> Result<ExportArtifact, ExportError> {
        let _guard = GeneratingGuard::engage(&self.generating);
        info!("📄 开始生成 PDF 报告 (渲染后端: {})", self.renderer.name());

        let result = self.run_pipeline(record).await;
        match &result {
            Ok(artifact) => info!(
                "✅ 报告已生成: {} ({} 页, {} 字节)",
                artifact.path.display(),
                artifact.page_count,
                artifact.size_bytes
            ),
            Err(e) => error!("❌ {} ({})", e.user_notice(), e),
        }
        result
    }

    async fn run_pipeline(&self, record: &EvaluationRecord) -> Result<ExportArtifact, ExportError> {
        let document = compose(record);
        debug!("排版完成: {} 个内容块", document.blocks().count());

        let bitmap = self.renderer.render_document(&document).await?;
        debug!("光栅化完成: {}x{}", bitmap.width(), bitmap.height());

        let pages = paginate(&bitmap, self.page_size);
        drop(bitmap);

        let bytes = PdfWriter::new(self.page_size)
            .with_created_at(document.header().generated_at)
            .encode(&pages)?;

        let file_name = artifact_file_name((self.clock)());
        let path = write_artifact(&self.output_dir, &file_name, &bytes).await?;

        Ok(ExportArtifact {
            path,
            page_count: pages.len(),
            size_bytes: bytes.len(),
        })
    }
}

/// 在作用域内把 `generating` 置为 true，离开时（包括提前返回）恢复 false
struct GeneratingGuard<'a> {
    sender: &'a watch::Sender<bool>,
}

impl<'a> GeneratingGuard<'a> {
    fn engage(sender: &'a watch::Sender<bool>) -> Self {
        sender.send_replace(true);
        Self { sender }
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.sender.send_replace(false);
    }
}

/// 以毫秒时间戳命名的产物文件名
pub fn artifact_file_name(epoch_ms: i64) -> String {
    format!("startup_evaluation_{}.pdf", epoch_ms)
}

/// 先写隐藏的临时文件再改名，失败时删除临时文件
async fn write_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, WriteError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| WriteError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;

    let final_path = dir.join(file_name);
    let temp_path = dir.join(format!(".{}.part", file_name));

    if let Err(source) = tokio::fs::write(&temp_path, bytes).await {
        discard(&temp_path).await;
        return Err(WriteError::Write {
            path: temp_path.display().to_string(),
            source,
        });
    }

    if let Err(source) = tokio::fs::rename(&temp_path, &final_path).await {
        discard(&temp_path).await;
        return Err(WriteError::Rename {
            from: temp_path.display().to_string(),
            to: final_path.display().to_string(),
            source,
        });
    }

    Ok(final_path)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            error!("删除临时文件失败 ({}): {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, OnceLock};

    use image::{Rgba, RgbaImage};

    use crate::error::RenderError;
    use crate::models::ComposedDocument;
    use crate::render::Bitmap;

    /// 渲染时记录 generating 状态，可选地返回失败
    #[derive(Clone, Default)]
    struct ProbeTarget {
        state: Arc<OnceLock<watch::Receiver<bool>>>,
        seen_generating: Arc<AtomicBool>,
        fail: bool,
    }

    impl RenderTarget for ProbeTarget {
        async fn render_document(&self, _document: &ComposedDocument) -> Result<Bitmap, RenderError> {
            if let Some(rx) = self.state.get() {
                self.seen_generating.store(*rx.borrow(), Ordering::SeqCst);
            }
            tokio::task::yield_now().await;
            if self.fail {
                return Err(RenderError::Layout("probe failure".to_string()));
            }
            Bitmap::new(RgbaImage::from_pixel(100, 1000, Rgba([0, 0, 0, 255])))
        }

        fn name(&self) -> &'static str {
            "probe"
        }
    }

    fn controller(probe: &ProbeTarget, dir: &Path) -> ExportController<ProbeTarget> {
        let controller = ExportController::new(probe.clone(), PageSize::new(100, 400), dir);
        let _ = probe.state.set(controller.subscribe());
        controller
    }

    fn entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .map(|rd| {
                rd.filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name(1_700_000_000_123),
            "startup_evaluation_1700000000123.pdf"
        );
    }

    #[tokio::test]
    async fn test_success_writes_one_file_and_clears_generating() {
        let dir = tempfile::tempdir().unwrap();
        let probe = ProbeTarget::default();
        let controller = controller(&probe, dir.path());

        assert!(!controller.is_generating());
        let artifact = controller
            .export_document(&EvaluationRecord::default())
            .await
            .unwrap();

        assert!(probe.seen_generating.load(Ordering::SeqCst));
        assert!(!controller.is_generating());
        assert_eq!(artifact.page_count, 3);
        assert!(artifact.path.exists());
        assert_eq!(entries(dir.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_clears_generating_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let probe = ProbeTarget {
            fail: true,
            ..ProbeTarget::default()
        };
        let controller = controller(&probe, dir.path());

        let err = controller
            .export_document(&EvaluationRecord::default())
            .await
            .unwrap_err();

        assert!(err.is_render_failure());
        assert_eq!(err.user_notice(), "Failed to generate PDF. Please try again.");
        assert!(probe.seen_generating.load(Ordering::SeqCst));
        assert!(!controller.is_generating());
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_clears_generating() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let probe = ProbeTarget::default();
        let controller = controller(&probe, &blocker.join("reports"));

        let err = controller
            .export_document(&EvaluationRecord::default())
            .await
            .unwrap_err();

        assert!(err.is_write_failure());
        assert!(!controller.is_generating());
        assert_eq!(entries(dir.path()), vec!["not_a_dir".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let name = artifact_file_name(42);
        std::fs::create_dir(dir.path().join(&name)).unwrap();
        std::fs::write(dir.path().join(&name).join("keep"), b"x").unwrap();

        let err = write_artifact(dir.path(), &name, b"%PDF-").await.unwrap_err();

        assert!(matches!(err, WriteError::Rename { .. }));
        assert_eq!(entries(dir.path()), vec![name]);
    }

    #[tokio::test]
    async fn test_export_rename_failure_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join(artifact_file_name(42));
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"x").unwrap();

        let probe = ProbeTarget::default();
        let controller = controller(&probe, dir.path()).with_clock(|| 42);

        let err = controller
            .export_document(&EvaluationRecord::default())
            .await
            .unwrap_err();

        assert!(err.is_write_failure());
        assert!(!controller.is_generating());
        let names = entries(dir.path());
        assert_eq!(names, vec!["startup_evaluation_42.pdf".to_string()]);
        assert!(names.iter().all(|n| !n.ends_with(".part")));
        assert!(blocked.is_dir());
    }

    #[tokio::test]
    async fn test_generating_transitions_are_observable() {
        let dir = tempfile::tempdir().unwrap();
        let probe = ProbeTarget::default();
        let controller = controller(&probe, dir.path());
        let mut rx = controller.subscribe();

        controller
            .export_document(&EvaluationRecord::default())
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
    }
}
