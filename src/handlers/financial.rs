//! 财务数据接口处理器
//!
//! ## API 列表
//!
//! - GET / - 查询页面
//! - GET /api/financial-data?query=<代码或名称> - 查询财务快照

use actix_web::{web, HttpResponse, Result};

use crate::models::{ApiResponse, FinancialQuery, FinancialSnapshot};
use crate::services::provider::TushareClient;
use crate::services::{aggregator, resolver};

/// 查询页面
pub async fn index() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../../static/index.html")))
}

/// 查询财务快照
///
/// GET /api/financial-data?query=000001.SZ 或 ?query=平安银行
///
/// 解析失败按错误分类返回 400/404/500；
/// 解析成功后各数据集独立降级，始终返回 200
pub async fn get_financial_data(
    client: web::Data<TushareClient>,
    query: web::Query<FinancialQuery>,
) -> Result<HttpResponse> {
    let user_input = query.query.as_deref().unwrap_or("");

    match resolver::resolve(client.get_ref(), user_input).await {
        Ok(security) => {
            let snapshot =
                aggregator::build_snapshot(client.get_ref(), &security, user_input).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(snapshot)))
        }
        Err(e) => {
            // 完整错误只进服务端日志，客户端只收到提示信息
            log::error!("查询 '{}' 处理失败: {}", user_input, e);
            let response = ApiResponse::<FinancialSnapshot>::error(e.client_message());
            Ok(HttpResponse::build(e.status_code()).json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/financial-data", web::get().to(get_financial_data));
}
