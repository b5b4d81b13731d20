use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;
use crate::models::PageSize;

/// 渲染后端
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// 无头浏览器（chromiumoxide）
    Headless,
    /// 纯 Rust 块布局渲染
    Software,
}

impl FromStr for RendererKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "headless" => Ok(RendererKind::Headless),
            "software" => Ok(RendererKind::Software),
            other => Err(ConfigError::UnknownValue {
                field: "renderer",
                value: other.to_string(),
            }),
        }
    }
}

/// 程序配置
///
/// 在进程启动时构造一次，之后以引用或克隆的方式注入各组件。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 评估服务地址
    pub api_base_url: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// PDF 输出目录
    pub output_dir: PathBuf,
    /// 目标纸张
    pub page_size: PageSize,
    /// 渲染后端
    pub renderer: RendererKind,
    /// 浏览器可执行文件，为空时由 chromiumoxide 自动查找
    pub browser_executable: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 60,
            output_dir: PathBuf::from("reports"),
            page_size: PageSize::A4,
            renderer: RendererKind::Software,
            browser_executable: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载，解析失败的变量回退到默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失的键取默认值，随后应用环境变量覆盖
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(config.with_env_overrides())
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        let base = self;
        Self {
            api_base_url: std::env::var("REPORT_API_URL").unwrap_or(base.api_base_url),
            request_timeout_secs: env_or("REPORT_REQUEST_TIMEOUT_SECS", base.request_timeout_secs),
            output_dir: std::env::var("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(base.output_dir),
            page_size: env_or("REPORT_PAGE_SIZE", base.page_size),
            renderer: env_or("REPORT_RENDERER", base.renderer),
            browser_executable: std::env::var("REPORT_BROWSER_EXECUTABLE")
                .ok()
                .map(PathBuf::from)
                .or(base.browser_executable),
            verbose_logging: env_or("VERBOSE_LOGGING", base.verbose_logging),
        }
    }
}

/// 解析环境变量，未设置时返回 None
fn parse_env<T: FromStr>(var_name: &str, raw: Option<String>) -> Result<Option<T>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
    }
}

/// 读取环境变量，解析失败时告警并回退到当前值
fn env_or<T: FromStr>(var_name: &str, fallback: T) -> T {
    match parse_env(var_name, std::env::var(var_name).ok()) {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(e) => {
            warn!("⚠️ {}，使用默认值", e);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://evaluator.example.com/"
            renderer = "headless"
            page_size = "letter"
            "#,
        )
        .unwrap();

        assert_eq!(config.renderer, RendererKind::Headless);
        assert_eq!(config.page_size, PageSize::LETTER);
        assert_eq!(config.api_base_url, "https://evaluator.example.com/");
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_parse_env_values() {
        let timeout: Option<u64> = parse_env("REPORT_REQUEST_TIMEOUT_SECS", Some(" 15 ".to_string())).unwrap();
        assert_eq!(timeout, Some(15));

        let unset: Option<u64> = parse_env("REPORT_REQUEST_TIMEOUT_SECS", None).unwrap();
        assert_eq!(unset, None);

        let err = parse_env::<u64>("REPORT_REQUEST_TIMEOUT_SECS", Some("soon".to_string())).unwrap_err();
        match err {
            ConfigError::EnvVarParseFailed { var_name, value, expected_type } => {
                assert_eq!(var_name, "REPORT_REQUEST_TIMEOUT_SECS");
                assert_eq!(value, "soon");
                assert_eq!(expected_type, "u64");
            }
            other => panic!("unexpected error: {other}"),
        }

        let page: Option<PageSize> = parse_env("REPORT_PAGE_SIZE", Some("Letter".to_string())).unwrap();
        assert_eq!(page, Some(PageSize::LETTER));
    }

    #[test]
    fn test_renderer_kind_parse() {
        assert_eq!("Software".parse::<RendererKind>().unwrap(), RendererKind::Software);
        assert!("gpu".parse::<RendererKind>().is_err());
    }
}
