//! 光栅化 - 渲染目标抽象
//!
//! 流程只依赖 [`RenderTarget`]，不假设任何 DOM。每次调用自行创建离屏渲染面，
//! 返回前无论成功失败都会释放。

pub mod headless;
pub mod html;
pub mod software;

use std::future::Future;

use image::RgbaImage;

use crate::config::{Config, RendererKind};
use crate::error::RenderError;
use crate::models::ComposedDocument;

pub use headless::HeadlessRenderTarget;
pub use software::SoftwareRenderTarget;

/// 画布宽度（CSS 像素）
pub const CANVAS_WIDTH_PX: u32 = 800;
/// 画布内边距（CSS 像素）
pub const CANVAS_PADDING_PX: u32 = 40;
/// 过采样倍率
pub const OVERSAMPLING: u32 = 2;

/// 固定画布参数，不随配置变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub(crate) width_px: u32,
    pub(crate) padding_px: u32,
    pub(crate) scale: u32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width_px: CANVAS_WIDTH_PX,
            padding_px: CANVAS_PADDING_PX,
            scale: OVERSAMPLING,
        }
    }
}

impl CanvasSpec {
    /// 输出位图宽度
    pub fn device_width(&self) -> u32 {
        self.width_px * self.scale
    }
}

/// 光栅化后的完整文档，宽高均不为零
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    pub fn new(pixels: RgbaImage) -> Result<Self, RenderError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(RenderError::EmptyCanvas {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// 渲染目标
pub trait RenderTarget {
    /// 把排版后的文档渲染为一张连续位图
    fn render_document(
        &self,
        document: &ComposedDocument,
    ) -> impl Future<Output = Result<Bitmap, RenderError>> + Send;

    /// 日志中使用的名称
    fn name(&self) -> &'static str;
}

/// 按配置选择的渲染后端
#[derive(Debug, Clone)]
pub enum Renderer {
    Headless(HeadlessRenderTarget),
    Software(SoftwareRenderTarget),
}

impl Renderer {
    pub fn from_config(config: &Config) -> Self {
        let canvas = CanvasSpec::default();
        match config.renderer {
            RendererKind::Headless => Renderer::Headless(HeadlessRenderTarget::new(
                canvas,
                config.browser_executable.clone(),
            )),
            RendererKind::Software => Renderer::Software(SoftwareRenderTarget::new(canvas)),
        }
    }
}

impl RenderTarget for Renderer {
    async fn render_document(&self, document: &ComposedDocument) -> Result<Bitmap, RenderError> {
        match self {
            Renderer::Headless(target) => target.render_document(document).await,
            Renderer::Software(target) => target.render_document(document).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Renderer::Headless(target) => target.name(),
            Renderer::Software(target) => target.name(),
        }
    }
}
