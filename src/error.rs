//! 错误类型定义
//!
//! 按请求边界需要的 HTTP 状态码对错误分类：
//! 400 输入无效 / 404 未找到 / 500 上游或配置错误

use actix_web::http::StatusCode;
use thiserror::Error;

/// Tushare 数据源错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 网络请求失败（含超时）
    #[error("请求 Tushare 接口失败: {0}")]
    Http(#[from] reqwest::Error),
    /// HTTP 状态码异常
    #[error("Tushare 接口返回异常状态码: {0}")]
    Status(reqwest::StatusCode),
    /// Tushare 业务错误（响应 code 非 0，常见于积分不足）
    #[error("Tushare 接口返回错误 (code={code}): {msg}")]
    Api { code: i64, msg: String },
    /// 响应格式无法解析
    #[error("Tushare 响应数据格式异常: {0}")]
    Malformed(String),
}

/// 业务错误
///
/// Resolver / Aggregator 的失败在 handler 层统一翻译为 HTTP 响应
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 输入无效（如空查询）
    #[error("{0}")]
    InvalidInput(String),
    /// 未找到匹配的证券
    #[error("{0}")]
    NotFound(String),
    /// 上游数据源调用失败
    #[error("上游数据源错误: {0}")]
    Upstream(#[from] ProviderError),
    /// 服务配置缺失（如未设置 TUSHARE_TOKEN）
    #[error("服务配置错误: {0}")]
    Misconfigured(String),
}

impl ServiceError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Upstream(_) | ServiceError::Misconfigured(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给客户端的提示信息
    ///
    /// 上游错误的细节只写服务端日志，不下发给客户端
    pub fn client_message(&self) -> String {
        match self {
            ServiceError::InvalidInput(msg) | ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Upstream(_) => "获取数据时发生错误，请稍后重试".to_string(),
            ServiceError::Misconfigured(_) => "服务配置错误".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试错误到状态码的映射
    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ServiceError::InvalidInput("空".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("无".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Misconfigured("缺 token".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let upstream = ServiceError::Upstream(ProviderError::Malformed("bad".into()));
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    /// 上游错误不向客户端泄露内部细节
    #[test]
    fn test_upstream_detail_suppressed() {
        let err = ServiceError::Upstream(ProviderError::Api {
            code: 2002,
            msg: "积分不足".into(),
        });
        assert!(!err.client_message().contains("2002"));
        assert!(!err.client_message().contains("积分"));
    }
}
