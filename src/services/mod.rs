//! 业务逻辑服务模块
//!
//! 封装数据获取和处理逻辑

pub mod aggregator; // 财务数据聚合
pub mod format;     // 数值格式化
pub mod provider;   // Tushare 数据接口
pub mod resolver;   // 证券标识解析
