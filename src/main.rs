//! Tushare 财务数据后端服务
//!
//! 接收股票代码或公司名称，经 Tushare Pro 解析为证券代码，
//! 聚合行情、利润表、财务指标与历史价格后以 JSON 返回

mod config;   // 配置加载
mod error;    // 错误类型
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::services::provider::TushareClient;

/// 应用程序入口
///
/// TUSHARE_TOKEN 缺失是致命的启动错误，直接退出
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.clone()));

    let client = TushareClient::from_env(&config).map_err(|e| {
        log::error!("初始化 Tushare 客户端失败: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let bind_addr = config.bind_addr();
    log::info!("启动 Tushare 财务数据后端服务，监听 {}", bind_addr);

    let workers = config.server.workers;
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 请求日志中间件
            .wrap(Cors::permissive()) // 前端页面跨域访问
            .app_data(web::Data::new(client.clone()))
            .configure(handlers::config)
    })
    .bind(bind_addr)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await
}
