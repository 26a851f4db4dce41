//! 证券标识解析
//!
//! 将用户的自由输入解析为 Tushare 代码和展示名称：
//! 形如代码的输入直接作为代码使用，其余按名称在证券目录中搜索

use regex::Regex;

use crate::error::ServiceError;
use crate::models::ResolvedSecurity;
use crate::services::provider::Provider;

/// 判断输入是否形如证券代码
///
/// 规则：包含 '.' 分隔符且至少有一个数字（如 000001.SZ），
/// 或为 6 位纯数字（交易所前缀缺失的裸代码）
pub fn looks_like_code(query: &str) -> bool {
    if query.contains('.') && query.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    let re = Regex::new(r"^\d{6}$").unwrap();
    re.is_match(query)
}

/// 解析查询为证券代码与名称
///
/// - 空输入直接返回 InvalidInput，不发起任何网络调用
/// - 代码路径：向目录回查名称；查询失败或无结果时回退为裸代码，
///   不让校验失败拖垮整个请求（积分不足时 stock_basic 常不可用）
/// - 名称路径：取目录中名称包含查询子串的第一条（按接口返回顺序）
pub async fn resolve<P: Provider>(
    provider: &P,
    query: &str,
) -> Result<ResolvedSecurity, ServiceError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ServiceError::InvalidInput("查询内容不能为空".to_string()));
    }

    if looks_like_code(query) {
        let name = match provider.lookup_code(query).await {
            Ok(listings) => match listings.into_iter().next() {
                Some(listing) => listing.name,
                None => query.to_string(),
            },
            Err(e) => {
                log::warn!("代码 {} 名称回查失败，回退为代码本身: {}", query, e);
                query.to_string()
            }
        };

        return Ok(ResolvedSecurity {
            ts_code: query.to_string(),
            name,
        });
    }

    let listings = provider.list_securities().await.map_err(ServiceError::from)?;

    listings
        .into_iter()
        .find(|listing| listing.name.contains(query))
        .map(|listing| ResolvedSecurity {
            ts_code: listing.ts_code,
            name: listing.name,
        })
        .ok_or_else(|| ServiceError::NotFound(format!("找不到公司名称为 '{}' 的股票", query)))
}
