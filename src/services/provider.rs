//! Tushare Pro 数据接口实现
//!
//! 对接 http://api.tushare.pro 的统一查询协议：
//! POST 请求体 {"api_name", "token", "params", "fields"}，
//! 响应体 {"code", "msg", "data": {"fields": [...], "items": [[...]]}}。
//! code 非 0 为接口错误；data 为空表示无数据（积分不足时也会返回空），
//! 二者在上层统一按"该字段降级"处理

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{ProviderError, ServiceError};
use crate::services::format::numeric;

/// Tushare 统一响应体
#[derive(Debug, Deserialize)]
struct TushareResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<DataTable>,
}

/// 列名 + 行数组形式的数据表
///
/// Tushare 以 DataFrame 的列名/行值分离格式返回数据
#[derive(Debug, Default, Deserialize)]
pub struct DataTable {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub items: Vec<Vec<Value>>,
}

impl DataTable {
    /// 查找列下标
    fn column(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// 读取指定行列的原始值
    pub fn get<'a>(&'a self, row: &'a [Value], name: &str) -> Option<&'a Value> {
        self.column(name).and_then(|idx| row.get(idx))
    }

    /// 读取指定行列的数值（宽松解析）
    pub fn get_f64(&self, row: &[Value], name: &str) -> Option<f64> {
        self.get(row, name).and_then(numeric)
    }

    /// 读取指定行列的字符串
    pub fn get_str(&self, row: &[Value], name: &str) -> Option<String> {
        self.get(row, name)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

/// 证券目录条目（stock_basic）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityListing {
    pub ts_code: String,
    pub name: String,
}

/// 日线行情（daily）
#[derive(Debug, Clone)]
pub struct DailyBar {
    pub trade_date: String,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub pct_chg: Option<f64>,
    pub vol: Option<f64>,
}

/// 年度利润表记录（income）
#[derive(Debug, Clone)]
pub struct IncomeReport {
    pub end_date: String,
    pub total_revenue: Option<f64>,
    pub net_profit: Option<f64>,
}

/// 财务指标记录（fina_indicator）
#[derive(Debug, Clone)]
pub struct FinaIndicator {
    pub revenue_yoy: Option<f64>,
    pub netprofit_yoy: Option<f64>,
    pub gross_margin: Option<f64>,
}

/// 财务数据提供方接口
///
/// Resolver / Aggregator 只依赖该 trait，测试中以桩实现替换真实网络调用
pub trait Provider {
    /// 上市证券目录（用于名称搜索）
    async fn list_securities(&self) -> Result<Vec<SecurityListing>, ProviderError>;

    /// 按代码查询目录条目（用于代码校验与名称回查）
    async fn lookup_code(&self, ts_code: &str) -> Result<Vec<SecurityListing>, ProviderError>;

    /// 最新一条日线行情
    async fn latest_daily(&self, ts_code: &str) -> Result<Vec<DailyBar>, ProviderError>;

    /// 指定日期区间的日线行情
    async fn daily_range(
        &self,
        ts_code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DailyBar>, ProviderError>;

    /// 指定报告期的利润表
    async fn income(&self, ts_code: &str, end_date: &str) -> Result<Vec<IncomeReport>, ProviderError>;

    /// 指定报告期的财务指标
    async fn fina_indicator(
        &self,
        ts_code: &str,
        end_date: &str,
    ) -> Result<Vec<FinaIndicator>, ProviderError>;
}

/// Tushare Pro 客户端
///
/// 进程启动时构造一次，经 web::Data 注入各 handler；
/// reqwest::Client 内部带连接池，Clone 开销很小
#[derive(Debug, Clone)]
pub struct TushareClient {
    http: Client,
    token: String,
    base_url: String,
}

impl TushareClient {
    /// 从配置和环境变量构造客户端
    ///
    /// 访问凭证只从环境变量 TUSHARE_TOKEN 读取，缺失视为配置错误
    pub fn from_env(config: &AppConfig) -> Result<Self, ServiceError> {
        let token = std::env::var("TUSHARE_TOKEN").unwrap_or_default();
        if token.trim().is_empty() {
            return Err(ServiceError::Misconfigured(
                "未设置环境变量 TUSHARE_TOKEN".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .connect_timeout(Duration::from_secs(config.provider.connect_timeout_secs))
            .build()
            .map_err(|e| ServiceError::Misconfigured(format!("构造 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            http,
            token: token.trim().to_string(),
            base_url: config.provider.base_url.clone(),
        })
    }

    /// 调用 Tushare 统一查询接口
    async fn call(
        &self,
        api_name: &str,
        params: Value,
        fields: &str,
    ) -> Result<DataTable, ProviderError> {
        let body = json!({
            "api_name": api_name,
            "token": self.token,
            "params": params,
            "fields": fields,
        });

        let response = self.http.post(&self.base_url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let payload: TushareResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if payload.code != 0 {
            return Err(ProviderError::Api {
                code: payload.code,
                msg: payload.msg.unwrap_or_default(),
            });
        }

        // data 缺失按空表处理，交由上层降级
        Ok(payload.data.unwrap_or_default())
    }

    fn parse_listings(table: &DataTable) -> Vec<SecurityListing> {
        table
            .items
            .iter()
            .filter_map(|row| {
                Some(SecurityListing {
                    ts_code: table.get_str(row, "ts_code")?,
                    name: table.get_str(row, "name")?,
                })
            })
            .collect()
    }

    fn parse_daily(table: &DataTable) -> Vec<DailyBar> {
        table
            .items
            .iter()
            .map(|row| DailyBar {
                trade_date: table.get_str(row, "trade_date").unwrap_or_default(),
                open: table.get_f64(row, "open"),
                high: table.get_f64(row, "high"),
                low: table.get_f64(row, "low"),
                close: table.get_f64(row, "close"),
                pct_chg: table.get_f64(row, "pct_chg"),
                vol: table.get_f64(row, "vol"),
            })
            .collect()
    }
}

impl Provider for TushareClient {
    async fn list_securities(&self) -> Result<Vec<SecurityListing>, ProviderError> {
        let table = self
            .call("stock_basic", json!({"list_status": "L"}), "ts_code,name")
            .await?;
        Ok(Self::parse_listings(&table))
    }

    async fn lookup_code(&self, ts_code: &str) -> Result<Vec<SecurityListing>, ProviderError> {
        let table = self
            .call("stock_basic", json!({"ts_code": ts_code}), "ts_code,name")
            .await?;
        Ok(Self::parse_listings(&table))
    }

    async fn latest_daily(&self, ts_code: &str) -> Result<Vec<DailyBar>, ProviderError> {
        let table = self
            .call(
                "daily",
                json!({"ts_code": ts_code, "limit": "1"}),
                "trade_date,open,high,low,close,pct_chg,vol",
            )
            .await?;
        Ok(Self::parse_daily(&table))
    }

    async fn daily_range(
        &self,
        ts_code: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        let table = self
            .call(
                "daily",
                json!({"ts_code": ts_code, "start_date": start_date, "end_date": end_date}),
                "trade_date,close",
            )
            .await?;
        Ok(Self::parse_daily(&table))
    }

    async fn income(&self, ts_code: &str, end_date: &str) -> Result<Vec<IncomeReport>, ProviderError> {
        let table = self
            .call(
                "income",
                json!({"ts_code": ts_code, "end_date": end_date}),
                "end_date,total_revenue,n_income_attr_p",
            )
            .await?;

        Ok(table
            .items
            .iter()
            .map(|row| IncomeReport {
                end_date: table.get_str(row, "end_date").unwrap_or_default(),
                total_revenue: table.get_f64(row, "total_revenue"),
                net_profit: table.get_f64(row, "n_income_attr_p"),
            })
            .collect())
    }

    async fn fina_indicator(
        &self,
        ts_code: &str,
        end_date: &str,
    ) -> Result<Vec<FinaIndicator>, ProviderError> {
        let table = self
            .call(
                "fina_indicator",
                json!({"ts_code": ts_code, "end_date": end_date}),
                "end_date,or_yoy,netprofit_yoy,grossprofit_margin",
            )
            .await?;

        Ok(table
            .items
            .iter()
            .map(|row| FinaIndicator {
                revenue_yoy: table.get_f64(row, "or_yoy"),
                netprofit_yoy: table.get_f64(row, "netprofit_yoy"),
                gross_margin: table.get_f64(row, "grossprofit_margin"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 测试 Tushare 响应体解析（实际抓取的响应格式）
    #[test]
    fn test_parse_tushare_response() {
        let body = json!({
            "request_id": "abc123",
            "code": 0,
            "msg": null,
            "data": {
                "fields": ["trade_date", "open", "high", "low", "close", "pct_chg", "vol"],
                "items": [
                    ["20240102", 9.33, 9.42, 9.25, 9.39, 1.1854, 1158981.01]
                ]
            }
        });

        let parsed: TushareResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.code, 0);

        let table = parsed.data.unwrap();
        let bars = TushareClient::parse_daily(&table);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].trade_date, "20240102");
        assert_eq!(bars[0].close, Some(9.39));
        assert_eq!(bars[0].pct_chg, Some(1.1854));
    }

    /// 测试业务错误响应（code 非 0）
    #[test]
    fn test_parse_error_response() {
        let body = json!({
            "code": 2002,
            "msg": "权限不足",
            "data": null
        });

        let parsed: TushareResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.code, 2002);
        assert_eq!(parsed.msg.as_deref(), Some("权限不足"));
        assert!(parsed.data.is_none());
    }

    /// 测试空数据表（积分不足时的合法空结果）
    #[test]
    fn test_parse_empty_data() {
        let body = json!({
            "code": 0,
            "msg": null,
            "data": {"fields": ["ts_code", "name"], "items": []}
        });

        let parsed: TushareResponse = serde_json::from_value(body).unwrap();
        let table = parsed.data.unwrap();
        assert!(TushareClient::parse_listings(&table).is_empty());
    }

    /// 测试数据表列访问与字符串数字
    #[test]
    fn test_data_table_access() {
        let table = DataTable {
            fields: vec!["ts_code".into(), "name".into(), "close".into()],
            items: vec![vec![json!("000001.SZ"), json!("平安银行"), json!("9.39")]],
        };

        let row = &table.items[0];
        assert_eq!(table.get_str(row, "ts_code").as_deref(), Some("000001.SZ"));
        assert_eq!(table.get_str(row, "name").as_deref(), Some("平安银行"));
        assert_eq!(table.get_f64(row, "close"), Some(9.39));
        assert_eq!(table.get_f64(row, "missing"), None);
    }
}
