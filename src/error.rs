use thiserror::Error;

/// 数据库访问错误
#[derive(Debug, Error)]
pub enum DbError {
    #[error("error connecting to database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("no database connection, please connect first")]
    NotConnected,

    #[error("error executing query: {0}")]
    QueryExecution(#[source] sqlx::Error),
}

/// 订单汇总错误 (直接返回给调用方, 不吞掉)
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("missing required column `{column}`")]
    Schema { column: String },

    #[error("column `{column}` row {row}: expected a number, found {found}")]
    Type {
        column: String,
        row: usize,
        found: String,
    },
}

/// 表格读写错误
#[derive(Debug, Error)]
pub enum TableError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
