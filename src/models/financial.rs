//! 财务数据模型
//!
//! 定义查询解析结果与聚合输出的数据结构。
//! 所有展示字段统一为字符串，缺失值用哨兵 "-" 占位

use serde::{Deserialize, Serialize};

/// 解析后的证券
///
/// Resolver 的输出，仅在单次请求内有效，不跨请求缓存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecurity {
    /// Tushare 证券代码（如 000001.SZ）
    pub ts_code: String,
    /// 证券名称（代码校验失败时回退为代码本身）
    pub name: String,
}

/// 最新日线行情
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuoteSection {
    /// 交易日期（YYYYMMDD）
    pub trade_date: String,
    /// 开盘价
    pub open: String,
    /// 最高价
    pub high: String,
    /// 最低价
    pub low: String,
    /// 收盘价
    pub close: String,
    /// 涨跌幅（百分比）
    pub pct_chg: String,
    /// 成交量（万手）
    pub vol: String,
}

/// 年度利润表摘要
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IncomeSection {
    /// 报告期（YYYYMMDD）
    pub end_date: String,
    /// 营业总收入（亿元）
    pub total_revenue: String,
    /// 归母净利润（亿元）
    pub net_profit: String,
}

/// 财务指标摘要
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IndicatorSection {
    /// 营业收入同比增长率（%）
    pub revenue_yoy: String,
    /// 归母净利润同比增长率（%）
    pub netprofit_yoy: String,
    /// 销售毛利率（%）
    pub gross_margin: String,
}

/// 历史收盘价点
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HistoryPoint {
    /// 交易日期（YYYYMMDD）
    pub date: String,
    /// 收盘价
    pub close: String,
}

/// 聚合输出：单次查询的完整财务快照
///
/// 每个请求新建一份，构造后不再修改
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FinancialSnapshot {
    /// 用户原始输入
    pub user_input: String,
    /// 解析出的公司名称
    pub resolved_name: String,
    /// 解析出的证券代码
    pub resolved_code: String,
    /// 最新行情
    pub quote: QuoteSection,
    /// 年度利润表
    pub income: IncomeSection,
    /// 财务指标
    pub indicators: IndicatorSection,
    /// 近一年收盘价序列（按日期升序）
    pub history: Vec<HistoryPoint>,
}

/// 查询参数
#[derive(Debug, Deserialize)]
pub struct FinancialQuery {
    /// 股票代码或公司名称
    pub query: Option<String>,
}
