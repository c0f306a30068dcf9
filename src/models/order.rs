use crate::models::{Table, Value};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 订单号 (OrderID 列只允许整数或文本)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderKey {
    Id(i64),
    Code(String),
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Id(id) => write!(f, "{}", id),
            OrderKey::Code(code) => f.write_str(code),
        }
    }
}

impl From<i64> for OrderKey {
    fn from(id: i64) -> Self {
        OrderKey::Id(id)
    }
}

impl From<&str> for OrderKey {
    fn from(code: &str) -> Self {
        OrderKey::Code(code.to_string())
    }
}

impl From<&OrderKey> for Value {
    fn from(key: &OrderKey) -> Self {
        match key {
            OrderKey::Id(id) => Value::Integer(*id),
            OrderKey::Code(code) => Value::Text(code.clone()),
        }
    }
}

/// 订单总额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTotal {
    pub order_id: OrderKey,
    pub total: BigDecimal,
}

impl OrderTotal {
    /// 转换为 (OrderID, Sum) 两列的表格
    pub fn to_table(totals: &[OrderTotal]) -> Table {
        let rows = totals
            .iter()
            .map(|t| {
                // 无法解析为 f64 时保留文本
                let sum = t
                    .total
                    .to_string()
                    .parse::<f64>()
                    .map(Value::Real)
                    .unwrap_or_else(|_| Value::Text(t.total.to_string()));
                vec![Value::from(&t.order_id), sum]
            })
            .collect();
        Table::with_rows(vec!["OrderID".to_string(), "Sum".to_string()], rows)
    }
}
