use crate::db::SqliteManager;
use crate::models::{Table, Value};

/// 金额区间内的发票 TopN (按总额降序)
const TOP_INVOICES_BY_VALUE_RANGE: &str = r#"
    SELECT
        i.InvoiceId,
        i.CustomerId,
        i.InvoiceDate,
        i.BillingAddress,
        i.BillingCity,
        i.BillingCountry,
        ROUND(SUM(il.UnitPrice * il.Quantity), 2) AS TotalValue
    FROM Invoice i
    JOIN InvoiceLine il ON i.InvoiceId = il.InvoiceId
    GROUP BY i.InvoiceId, i.CustomerId, i.InvoiceDate, i.BillingAddress, i.BillingCity, i.BillingCountry
    HAVING TotalValue BETWEEN ?1 AND ?2
    ORDER BY TotalValue DESC
    LIMIT ?3
"#;

/// 发票数量最多的客户 TopN
const TOP_CUSTOMERS_BY_INVOICE_COUNT: &str = r#"
    SELECT
        c.CustomerId,
        c.FirstName,
        c.LastName,
        c.Company,
        c.Country,
        c.Email,
        COUNT(i.InvoiceId) AS InvoiceCount
    FROM Customer c
    JOIN Invoice i ON c.CustomerId = i.CustomerId
    GROUP BY c.CustomerId, c.FirstName, c.LastName, c.Company, c.Country, c.Email
    ORDER BY InvoiceCount DESC
    LIMIT ?1
"#;

/// 消费总额最高的客户 TopN
const TOP_CUSTOMERS_BY_TOTAL_VALUE: &str = r#"
    SELECT
        c.CustomerId,
        c.FirstName,
        c.LastName,
        c.Company,
        c.Country,
        c.Email,
        COUNT(i.InvoiceId) AS InvoiceCount,
        ROUND(SUM(il.UnitPrice * il.Quantity), 2) AS TotalValue
    FROM Customer c
    JOIN Invoice i ON c.CustomerId = i.CustomerId
    JOIN InvoiceLine il ON i.InvoiceId = il.InvoiceId
    GROUP BY c.CustomerId, c.FirstName, c.LastName, c.Company, c.Country, c.Email
    ORDER BY TotalValue DESC
    LIMIT ?1
"#;

const LIST_TABLES: &str = "SELECT name FROM sqlite_master WHERE type = 'table'";

const TABLE_INFO: &str = "SELECT * FROM pragma_table_info(?1)";

impl SqliteManager {
    pub async fn top_invoices_by_value_range(
        &mut self,
        top_n: i64,
        min_value: f64,
        max_value: f64,
    ) -> Option<Table> {
        self.query(
            TOP_INVOICES_BY_VALUE_RANGE,
            &[Value::Real(min_value), Value::Real(max_value), Value::Integer(top_n)],
        )
        .await
    }

    pub async fn top_customers_by_invoice_count(&mut self, top_n: i64) -> Option<Table> {
        self.query(TOP_CUSTOMERS_BY_INVOICE_COUNT, &[Value::Integer(top_n)])
            .await
    }

    /// 注意: InvoiceCount 统计的是发票明细行数 (JOIN InvoiceLine 后计数)
    pub async fn top_customers_by_total_value(&mut self, top_n: i64) -> Option<Table> {
        self.query(TOP_CUSTOMERS_BY_TOTAL_VALUE, &[Value::Integer(top_n)])
            .await
    }

    /// 列出数据库中的表
    pub async fn get_tables(&mut self) -> Option<Table> {
        self.query(LIST_TABLES, &[]).await
    }

    /// 表结构 (cid, name, type, notnull, dflt_value, pk); 表名作为参数绑定
    pub async fn get_table_info(&mut self, table_name: &str) -> Option<Table> {
        self.query(TABLE_INFO, &[Value::Text(table_name.to_string())])
            .await
    }
}
