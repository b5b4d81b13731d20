use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::RenderError;

/// 一次导出独占的无头浏览器
///
/// 由渲染目标创建，渲染结束后必须调用 [`HeadlessSession::shutdown`]。
pub struct HeadlessSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl HeadlessSession {
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// 关闭浏览器并回收事件处理任务
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("关闭无头浏览器失败: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("等待浏览器进程退出失败: {}", e);
        }
        self.handler_task.abort();
        debug!("无头浏览器已关闭");
    }
}

/// 启动无头浏览器
///
/// # 参数
/// - `executable`: 浏览器可执行文件，为空时自动查找
/// - `window`: 初始窗口尺寸（CSS 像素）
pub async fn launch_headless_browser(
    executable: Option<&Path>,
    window: (u32, u32),
) -> Result<HeadlessSession, RenderError> {
    info!("🚀 启动无头浏览器...");

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .window_size(window.0, window.1)
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--hide-scrollbars",
        ]);
    if let Some(path) = executable {
        debug!("浏览器路径: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        RenderError::BrowserLaunch { source: e.into() }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        RenderError::BrowserLaunch {
            source: Box::new(e),
        }
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    Ok(HeadlessSession {
        browser,
        handler_task,
    })
}
