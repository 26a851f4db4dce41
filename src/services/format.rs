//! 数值格式化辅助函数
//!
//! 所有展示字段统一经过这里格式化：缺失、NaN、非数值一律渲染为哨兵 "-"

use serde_json::Value;

/// 缺失值哨兵
pub const UNAVAILABLE: &str = "-";

/// 从 JSON 值中宽松地读取数值
///
/// Tushare 的 items 中数值可能是 JSON number，也可能是数字字符串。
/// null、NaN、无法解析的字符串均视为缺失
pub fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() {
        Some(n)
    } else {
        None
    }
}

/// 格式化数值为定点小数字符串
///
/// # 参数
/// - value: 待格式化的数值，None 渲染为哨兵
/// - decimals: 小数位数
/// - divisor: 单位换算除数（如 1e8 换算为亿元），None 表示不换算
pub fn format_value(value: Option<f64>, decimals: usize, divisor: Option<f64>) -> String {
    match value {
        Some(n) if n.is_finite() => {
            let scaled = match divisor {
                Some(d) => n / d,
                None => n,
            };
            format!("{:.*}", decimals, scaled)
        }
        _ => UNAVAILABLE.to_string(),
    }
}

/// 格式化 JSON 值，numeric + format_value 的组合
pub fn format_json(value: Option<&Value>, decimals: usize, divisor: Option<f64>) -> String {
    format_value(value.and_then(numeric), decimals, divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 测试缺失值渲染为哨兵
    #[test]
    fn test_format_unavailable() {
        assert_eq!(format_value(None, 2, None), UNAVAILABLE);
        assert_eq!(format_value(Some(f64::NAN), 2, None), UNAVAILABLE);
        assert_eq!(format_value(Some(f64::INFINITY), 2, None), UNAVAILABLE);
        assert_eq!(format_json(None, 2, None), UNAVAILABLE);
        assert_eq!(format_json(Some(&json!("abc")), 2, None), UNAVAILABLE);
        assert_eq!(format_json(Some(&json!(null)), 2, None), UNAVAILABLE);
    }

    /// 测试单位换算与小数位
    #[test]
    fn test_format_with_divisor() {
        // 1234567.89 / 1e8 = 0.0123... 保留两位
        assert_eq!(format_value(Some(1234567.89), 2, Some(1e8)), "0.01");
        assert_eq!(format_value(Some(10.056), 2, None), "10.06");
        assert_eq!(format_value(Some(0.0), 2, None), "0.00");
        assert_eq!(format_value(Some(-3.456), 2, None), "-3.46");
    }

    /// 测试宽松数值读取（Tushare 字符串数字）
    #[test]
    fn test_numeric_loose() {
        assert_eq!(numeric(&json!(12.5)), Some(12.5));
        assert_eq!(numeric(&json!("12.5")), Some(12.5));
        assert_eq!(numeric(&json!(" 7 ")), Some(7.0));
        assert_eq!(numeric(&json!("abc")), None);
        assert_eq!(numeric(&json!(null)), None);
        assert_eq!(numeric(&json!([1, 2])), None);
    }
}
