//! 财务数据聚合
//!
//! 对解析出的证券并发拉取行情、利润表、财务指标、历史价格四类数据，
//! 合并为单个快照。任一数据集失败或为空只降级对应字段为哨兵，
//! 不影响其他字段，也不让整个请求失败

use chrono::{Datelike, Duration, Utc};
use chrono_tz::Asia::Shanghai;

use crate::models::{
    FinancialSnapshot, HistoryPoint, IncomeSection, IndicatorSection, QuoteSection,
    ResolvedSecurity,
};
use crate::services::format::{format_value, UNAVAILABLE};
use crate::services::provider::{DailyBar, Provider};

/// 金额换算除数：元 → 亿元
const YUAN_TO_YI: f64 = 1e8;
/// 成交量换算除数：手 → 万手
const LOTS_TO_WAN: f64 = 100.0;

/// 最近一个已完结的年度报告期（上一自然年的 1231）
fn latest_annual_period(today: chrono::NaiveDate) -> String {
    format!("{}1231", today.year() - 1)
}

/// 近一年历史行情的日期窗口（YYYYMMDD）
fn history_window(today: chrono::NaiveDate) -> (String, String) {
    let start = today - Duration::days(365);
    (
        start.format("%Y%m%d").to_string(),
        today.format("%Y%m%d").to_string(),
    )
}

/// 当前北京日期（交易日历以北京时间为准）
fn beijing_today() -> chrono::NaiveDate {
    Utc::now().with_timezone(&Shanghai).date_naive()
}

/// 构建完整财务快照
///
/// 四类数据并发拉取，合并点等待全部完成（或失败）
pub async fn build_snapshot<P: Provider>(
    provider: &P,
    security: &ResolvedSecurity,
    user_input: &str,
) -> FinancialSnapshot {
    let today = beijing_today();
    let period = latest_annual_period(today);
    let (start_date, end_date) = history_window(today);

    let (quote, income, indicators, history) = futures::join!(
        fetch_quote(provider, &security.ts_code),
        fetch_income(provider, &security.ts_code, &period),
        fetch_indicators(provider, &security.ts_code, &period),
        fetch_history(provider, &security.ts_code, &start_date, &end_date),
    );

    FinancialSnapshot {
        user_input: user_input.to_string(),
        resolved_name: security.name.clone(),
        resolved_code: security.ts_code.clone(),
        quote,
        income,
        indicators,
        history,
    }
}

/// 拉取最新日线行情，失败或无数据时整段降级
async fn fetch_quote<P: Provider>(provider: &P, ts_code: &str) -> QuoteSection {
    match provider.latest_daily(ts_code).await {
        Ok(bars) => match bars.first() {
            Some(bar) => quote_from_bar(bar),
            None => {
                log::warn!("无 {} 的日线行情数据", ts_code);
                unavailable_quote()
            }
        },
        Err(e) => {
            log::warn!("获取 {} 日线行情失败: {}", ts_code, e);
            unavailable_quote()
        }
    }
}

fn quote_from_bar(bar: &DailyBar) -> QuoteSection {
    let vol = format_value(bar.vol, 2, Some(LOTS_TO_WAN));
    let vol = if vol == UNAVAILABLE {
        vol
    } else {
        format!("{} 万手", vol)
    };

    QuoteSection {
        trade_date: if bar.trade_date.is_empty() {
            UNAVAILABLE.to_string()
        } else {
            bar.trade_date.clone()
        },
        open: format_value(bar.open, 2, None),
        high: format_value(bar.high, 2, None),
        low: format_value(bar.low, 2, None),
        close: format_value(bar.close, 2, None),
        pct_chg: format_value(bar.pct_chg, 2, None),
        vol,
    }
}

fn unavailable_quote() -> QuoteSection {
    QuoteSection {
        trade_date: UNAVAILABLE.to_string(),
        open: UNAVAILABLE.to_string(),
        high: UNAVAILABLE.to_string(),
        low: UNAVAILABLE.to_string(),
        close: UNAVAILABLE.to_string(),
        pct_chg: UNAVAILABLE.to_string(),
        vol: UNAVAILABLE.to_string(),
    }
}

/// 拉取年度利润表，金额换算为亿元
async fn fetch_income<P: Provider>(provider: &P, ts_code: &str, period: &str) -> IncomeSection {
    match provider.income(ts_code, period).await {
        Ok(reports) => match reports.first() {
            Some(report) => IncomeSection {
                end_date: if report.end_date.is_empty() {
                    UNAVAILABLE.to_string()
                } else {
                    report.end_date.clone()
                },
                total_revenue: format_value(report.total_revenue, 2, Some(YUAN_TO_YI)),
                net_profit: format_value(report.net_profit, 2, Some(YUAN_TO_YI)),
            },
            None => {
                log::warn!("无 {} 报告期 {} 的利润表数据", ts_code, period);
                unavailable_income()
            }
        },
        Err(e) => {
            log::warn!("获取 {} 利润表失败: {}", ts_code, e);
            unavailable_income()
        }
    }
}

fn unavailable_income() -> IncomeSection {
    IncomeSection {
        end_date: UNAVAILABLE.to_string(),
        total_revenue: UNAVAILABLE.to_string(),
        net_profit: UNAVAILABLE.to_string(),
    }
}

/// 拉取财务指标，百分比不做单位换算
async fn fetch_indicators<P: Provider>(
    provider: &P,
    ts_code: &str,
    period: &str,
) -> IndicatorSection {
    match provider.fina_indicator(ts_code, period).await {
        Ok(indicators) => match indicators.first() {
            Some(ind) => IndicatorSection {
                revenue_yoy: format_value(ind.revenue_yoy, 2, None),
                netprofit_yoy: format_value(ind.netprofit_yoy, 2, None),
                gross_margin: format_value(ind.gross_margin, 2, None),
            },
            None => {
                log::warn!("无 {} 报告期 {} 的财务指标数据", ts_code, period);
                unavailable_indicators()
            }
        },
        Err(e) => {
            log::warn!("获取 {} 财务指标失败: {}", ts_code, e);
            unavailable_indicators()
        }
    }
}

fn unavailable_indicators() -> IndicatorSection {
    IndicatorSection {
        revenue_yoy: UNAVAILABLE.to_string(),
        netprofit_yoy: UNAVAILABLE.to_string(),
        gross_margin: UNAVAILABLE.to_string(),
    }
}

/// 拉取近一年收盘价序列，按日期升序排列
///
/// 无数据返回空列表而非错误；失败同样降级为空列表
async fn fetch_history<P: Provider>(
    provider: &P,
    ts_code: &str,
    start_date: &str,
    end_date: &str,
) -> Vec<HistoryPoint> {
    match provider.daily_range(ts_code, start_date, end_date).await {
        Ok(mut bars) => {
            // YYYYMMDD 字符串的字典序即时间序
            bars.sort_by(|a, b| a.trade_date.cmp(&b.trade_date));
            bars.into_iter()
                .filter(|bar| !bar.trade_date.is_empty())
                .map(|bar| HistoryPoint {
                    date: bar.trade_date,
                    close: format_value(bar.close, 2, None),
                })
                .collect()
        }
        Err(e) => {
            log::warn!("获取 {} 历史行情失败: {}", ts_code, e);
            Vec::new()
        }
    }
}
