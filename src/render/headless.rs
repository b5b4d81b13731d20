//! 无头浏览器渲染目标
//!
//! 每次渲染启动独立浏览器，加载离屏 HTML，按内容高度截图。

use std::path::PathBuf;

use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use tracing::{debug, info, warn};

use crate::browser::launch_headless_browser;
use crate::error::RenderError;
use crate::infrastructure::JsExecutor;
use crate::models::ComposedDocument;
use crate::render::html::build_report_html;
use crate::render::{Bitmap, CanvasSpec, RenderTarget};

/// 测量报告内容高度（CSS 像素）
const MEASURE_HEIGHT_JS: &str =
    "Math.ceil(document.getElementById('report').getBoundingClientRect().height)";

/// 初始视口高度，测量前使用
const INITIAL_VIEWPORT_HEIGHT: u32 = 1_000;

#[derive(Debug, Clone)]
pub struct HeadlessRenderTarget {
    canvas: CanvasSpec,
    executable: Option<PathBuf>,
}

impl HeadlessRenderTarget {
    pub fn new(canvas: CanvasSpec, executable: Option<PathBuf>) -> Self {
        Self { canvas, executable }
    }

    async fn capture(&self, page: &Page, html: &str) -> Result<Bitmap, RenderError> {
        set_viewport(page, &self.canvas, INITIAL_VIEWPORT_HEIGHT).await?;
        page.set_content(html)
            .await
            .map_err(|e| RenderError::page("set_content", e))?;

        let executor = JsExecutor::new(page);
        let measured: f64 = executor.eval_as(MEASURE_HEIGHT_JS).await?;
        let height = measured.max(0.0).ceil() as u32;
        debug!("离屏文档高度: {}px", height);
        if height == 0 {
            return Err(RenderError::EmptyCanvas {
                width: self.canvas.width_px,
                height,
            });
        }

        set_viewport(page, &self.canvas, height).await?;

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .capture_beyond_viewport(true)
            .build();
        let png = page
            .screenshot(params)
            .await
            .map_err(|e| RenderError::Screenshot {
                source: Box::new(e),
            })?;

        let pixels = image::load_from_memory(&png)?.to_rgba8();
        Bitmap::new(pixels)
    }
}

async fn set_viewport(page: &Page, canvas: &CanvasSpec, height: u32) -> Result<(), RenderError> {
    let params = SetDeviceMetricsOverrideParams::new(
        canvas.width_px as i64,
        height as i64,
        canvas.scale as f64,
        false,
    );
    page.execute(params)
        .await
        .map_err(|e| RenderError::page("set_device_metrics", e))?;
    Ok(())
}

impl RenderTarget for HeadlessRenderTarget {
    async fn render_document(&self, document: &ComposedDocument) -> Result<Bitmap, RenderError> {
        let html = build_report_html(document, &self.canvas);
        let session = launch_headless_browser(
            self.executable.as_deref(),
            (self.canvas.width_px, INITIAL_VIEWPORT_HEIGHT),
        )
        .await?;

        let result = match session.browser().new_page("about:blank").await {
            Ok(page) => {
                let captured = self.capture(&page, &html).await;
                if let Err(e) = page.close().await {
                    warn!("关闭离屏页面失败: {}", e);
                }
                captured
            }
            Err(e) => Err(RenderError::page("new_page", e)),
        };

        // 成功与失败都要释放浏览器
        session.shutdown().await;

        if let Ok(bitmap) = &result {
            info!("✓ 无头浏览器渲染完成: {}x{}", bitmap.width(), bitmap.height());
        }
        result
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}
