use order_reports::service::aggregator::{decimal_from_f64, orders_with_totals};
use order_reports::{AppConfig, OrderTotal, SqliteManager, Table};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;

fn print_table(title: &str, table: &Table) -> Result<(), serde_json::Error> {
    println!("=== {} ===", title);
    println!("{}", serde_json::to_string_pretty(table)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting with config: {:?}", config);

    // 1. 订单汇总 (CSV)
    let sales = &config.sales;
    match Table::load_csv(Path::new(&sales.csv_path)) {
        Ok(table) => {
            let (Some(min), Some(max)) = (
                decimal_from_f64(sales.min_value),
                decimal_from_f64(sales.max_value),
            ) else {
                return Err(format!(
                    "invalid sales range [{}, {}]",
                    sales.min_value, sales.max_value
                )
                .into());
            };
            let totals = orders_with_totals(&table, &min, &max, sales.ascending)?;
            info!("{} orders with total in [{}, {}]", totals.len(), min, max);
            print_table("Orders with totals", &OrderTotal::to_table(&totals))?;
        }
        Err(e) => error!("Error loading {}: {}", sales.csv_path, e),
    }

    // 2. 固定报表 (SQLite)
    let reports = config.reports.clone();
    let outputs = SqliteManager::scoped(config.database.clone(), |db| {
        Box::pin(async move {
            vec![
                (
                    format!(
                        "TOP {} Invoices with value between ${}-${}",
                        reports.top_n, reports.invoice_min_value, reports.invoice_max_value
                    ),
                    db.top_invoices_by_value_range(
                        reports.top_n,
                        reports.invoice_min_value,
                        reports.invoice_max_value,
                    )
                    .await,
                ),
                (
                    format!("TOP {} Customers by Invoice Count", reports.top_n),
                    db.top_customers_by_invoice_count(reports.top_n).await,
                ),
                (
                    format!("TOP {} Customers by Total Value", reports.top_n),
                    db.top_customers_by_total_value(reports.top_n).await,
                ),
            ]
        })
    })
    .await;

    for (title, table) in outputs {
        if let Some(table) = table {
            print_table(&title, &table)?;
        }
    }

    Ok(())
}
