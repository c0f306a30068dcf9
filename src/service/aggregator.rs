use crate::error::AggregateError;
use crate::models::{OrderKey, OrderTotal, Table, Value};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::str::FromStr;

pub const ORDER_ID: &str = "OrderID";
pub const UNIT_PRICE: &str = "UnitPrice";
pub const QUANTITY: &str = "Quantity";
pub const DISCOUNT: &str = "Discount";

/// f64 区间边界转 BigDecimal (NaN/inf 返回 None)
pub fn decimal_from_f64(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

fn column(table: &Table, name: &str) -> Result<usize, AggregateError> {
    table.column_index(name).ok_or_else(|| AggregateError::Schema {
        column: name.to_string(),
    })
}

fn type_error(column: &str, row: usize, value: &Value) -> AggregateError {
    AggregateError::Type {
        column: column.to_string(),
        row,
        found: value.type_name().to_string(),
    }
}

fn numeric(value: &Value, column: &str, row: usize) -> Result<BigDecimal, AggregateError> {
    match value {
        Value::Integer(i) => Ok(BigDecimal::from(*i)),
        Value::Real(r) => decimal_from_f64(*r).ok_or_else(|| type_error(column, row, value)),
        _ => Err(type_error(column, row, value)),
    }
}

fn order_key(value: &Value, row: usize) -> Result<Option<OrderKey>, AggregateError> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(id) => Ok(Some(OrderKey::Id(*id))),
        Value::Text(code) => Ok(Some(OrderKey::Code(code.clone()))),
        _ => Err(type_error(ORDER_ID, row, value)),
    }
}

/// 单次遍历按 OrderID 分组累加: Σ UnitPrice × Quantity × (1 − Discount)
///
/// 结果按订单首次出现的顺序排列. OrderID 为空的行不属于任何订单, 直接跳过.
pub fn order_totals(table: &Table) -> Result<IndexMap<OrderKey, BigDecimal>, AggregateError> {
    let id_idx = column(table, ORDER_ID)?;
    let price_idx = column(table, UNIT_PRICE)?;
    let qty_idx = column(table, QUANTITY)?;
    let discount_idx = column(table, DISCOUNT)?;

    let one = BigDecimal::from(1);
    let mut totals: IndexMap<OrderKey, BigDecimal> = IndexMap::new();

    for (row_no, row) in table.rows().iter().enumerate() {
        let cell = |idx: usize| row.get(idx).unwrap_or(&Value::Null);

        let Some(key) = order_key(cell(id_idx), row_no)? else {
            tracing::debug!("row {} has no {}, skipping", row_no, ORDER_ID);
            continue;
        };

        let price = numeric(cell(price_idx), UNIT_PRICE, row_no)?;
        let qty = numeric(cell(qty_idx), QUANTITY, row_no)?;
        let discount = numeric(cell(discount_idx), DISCOUNT, row_no)?;

        let line_total = &(&price * &qty) * &(&one - &discount);
        let entry = totals.entry(key).or_insert_with(BigDecimal::zero);
        *entry = &*entry + &line_total;
    }

    Ok(totals)
}

fn within<'a>(
    totals: IndexMap<OrderKey, BigDecimal>,
    min_value: &'a BigDecimal,
    max_value: &'a BigDecimal,
) -> impl Iterator<Item = (OrderKey, BigDecimal)> + 'a {
    totals
        .into_iter()
        .filter(move |(_, total)| total >= min_value && total <= max_value)
}

/// 总额落在 [min_value, max_value] 内的订单号 (去重, 保持首次出现顺序)
pub fn orders_in_range(
    table: &Table,
    min_value: &BigDecimal,
    max_value: &BigDecimal,
) -> Result<Vec<OrderKey>, AggregateError> {
    let totals = order_totals(table)?;
    if min_value > max_value {
        return Ok(Vec::new());
    }
    Ok(within(totals, min_value, max_value).map(|(key, _)| key).collect())
}

/// 区间内的订单及其总额, 按总额排序 (稳定排序, 同额保持分组顺序)
pub fn orders_with_totals(
    table: &Table,
    min_value: &BigDecimal,
    max_value: &BigDecimal,
    ascending: bool,
) -> Result<Vec<OrderTotal>, AggregateError> {
    let totals = order_totals(table)?;
    if min_value > max_value {
        return Ok(Vec::new());
    }

    let mut result: Vec<OrderTotal> = within(totals, min_value, max_value)
        .map(|(order_id, total)| OrderTotal { order_id, total })
        .collect();

    if ascending {
        result.sort_by(|a, b| a.total.cmp(&b.total));
    } else {
        result.sort_by(|a, b| b.total.cmp(&a.total));
    }

    tracing::debug!(
        "{} orders with total in [{}, {}]",
        result.len(),
        min_value,
        max_value
    );
    Ok(result)
}
