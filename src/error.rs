use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 评估服务调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 渲染错误（RenderFailure）
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 写入错误（WriteFailure）
    #[error("写入错误: {0}")]
    Write(#[from] WriteError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 渲染相关错误
///
/// 任何一种都意味着本次导出没有得到位图，也不会返回部分结果。
#[derive(Debug, Error)]
pub enum RenderError {
    /// 启动无头浏览器失败
    #[error("启动无头浏览器失败: {source}")]
    BrowserLaunch {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建或加载离屏页面失败
    #[error("离屏页面操作失败 ({stage}): {source}")]
    Page {
        stage: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    Script {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 截图失败
    #[error("截图失败: {source}")]
    Screenshot {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 截图解码失败
    #[error("位图解码失败: {0}")]
    Decode(#[from] image::ImageError),
    /// 画布尺寸为零
    #[error("画布尺寸无效: {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },
    /// 布局无法完成
    #[error("布局失败: {0}")]
    Layout(String),
}

/// 写入相关错误
#[derive(Debug, Error)]
pub enum WriteError {
    /// 创建输出目录失败
    #[error("创建输出目录失败 ({path}): {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    /// 重命名临时文件失败
    #[error("重命名临时文件失败 ({from} -> {to}): {source}")]
    Rename {
        from: String,
        to: String,
        source: std::io::Error,
    },
    /// 编码 PDF 失败
    #[error("PDF编码失败: {0}")]
    Encode(String),
}

/// 评估服务 API 错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 创意文本为空
    #[error("创意文本不能为空")]
    EmptyIdea,
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// 响应结构不符合约定
    #[error("Invalid response from server ({endpoint})")]
    InvalidResponse { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
    /// 未知取值
    #[error("{field} 不支持取值 '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

/// 导出失败
///
/// 只有两种对用户可见的失败：渲染失败和写入失败，处理方式相同。
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl ExportError {
    /// 展示给用户的阻塞提示
    pub fn user_notice(&self) -> &'static str {
        "Failed to generate PDF. Please try again."
    }

    /// 是否为渲染失败
    pub fn is_render_failure(&self) -> bool {
        matches!(self, ExportError::Render(_))
    }

    /// 是否为写入失败
    pub fn is_write_failure(&self) -> bool {
        matches!(self, ExportError::Write(_))
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Render(e) => AppError::Render(e),
            ExportError::Write(e) => AppError::Write(e),
        }
    }
}

// ========== 便捷构造函数 ==========

impl RenderError {
    /// 创建离屏页面错误
    pub fn page(stage: &'static str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        RenderError::Page {
            stage,
            source: Box::new(source),
        }
    }
}

impl ApiError {
    /// 创建请求失败错误
    pub fn request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
