//! JS 执行器 - 基础设施层
//!
//! 借用离屏页面，只暴露"执行 JS"的能力

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::error::RenderError;

/// JS 执行器
///
/// 职责：
/// - 在离屏页面中求值表达式
/// - 不认识报告结构
/// - 不负责页面的创建与关闭
pub struct JsExecutor<'a> {
    page: &'a Page,
}

impl<'a> JsExecutor<'a> {
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, RenderError> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(|e| RenderError::Script {
                source: Box::new(e),
            })?;
        result.into_value().map_err(|e| RenderError::Script {
            source: Box::new(e),
        })
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> Result<T, RenderError> {
        let json_value = self.eval(js_code).await?;
        serde_json::from_value(json_value).map_err(|e| RenderError::Script {
            source: Box::new(e),
        })
    }
}
