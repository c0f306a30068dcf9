use crate::config::DatabaseConfig;
use crate::error::DbError;
use crate::models::{Table, Value};
use futures::future::BoxFuture;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{
    Column, ConnectOptions, Connection, Executor, Row, Sqlite, Statement, TypeInfo, ValueRef,
};
use std::str::FromStr;
use std::time::Duration;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite 连接管理: Disconnected -> Connected -> Disconnected
///
/// 连接/查询错误在这里记录日志并转换为 `None` / `false`.
/// 需要错误详情时使用 `try_*` 系列方法.
pub struct SqliteManager {
    config: DatabaseConfig,
    connection: Option<SqliteConnection>,
}

impl SqliteManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    /// 仅指定路径, 其余使用默认配置
    pub fn with_path(path: impl Into<String>) -> Self {
        Self::new(DatabaseConfig {
            path: path.into(),
            ..DatabaseConfig::default()
        })
    }

    pub fn path(&self) -> &str {
        &self.config.path
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        let path = self.config.path.as_str();
        let options = if path.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(path)?
        } else {
            SqliteConnectOptions::new().filename(path)
        };

        // 慢查询日志阈值
        Ok(options
            .create_if_missing(self.config.create_if_missing)
            .log_slow_statements(
                tracing::log::LevelFilter::Warn,
                Duration::from_secs(self.config.slow_statement_secs),
            ))
    }

    pub async fn try_connect(&mut self) -> Result<(), DbError> {
        // 重连前先释放旧连接
        self.close().await;

        let options = self.connect_options().map_err(DbError::Connection)?;
        let connection = options.connect().await.map_err(DbError::Connection)?;
        self.connection = Some(connection);
        tracing::info!("Database connection established: {}", self.path());
        Ok(())
    }

    /// 打开连接, 失败时记录错误并保持 Disconnected
    pub async fn connect(&mut self) -> bool {
        match self.try_connect().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        }
    }

    fn connection_mut(&mut self) -> Result<&mut SqliteConnection, DbError> {
        self.connection.as_mut().ok_or(DbError::NotConnected)
    }

    /// 执行读语句, 参数按位置绑定; 列名取自结果元数据
    pub async fn try_query(&mut self, sql: &str, params: &[Value]) -> Result<Table, DbError> {
        let conn = self.connection_mut()?;

        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&mut *conn)
            .await
            .map_err(DbError::QueryExecution)?;

        let columns: Vec<String> = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            // 空结果集没有行可取列名, 从预编译语句读取
            None => conn
                .prepare(sql)
                .await
                .map_err(DbError::QueryExecution)?
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        };

        let mut table = Table::new(columns);
        for row in &rows {
            table.push_row(decode_row(row).map_err(DbError::QueryExecution)?);
        }

        tracing::debug!("query returned {} rows", table.len());
        Ok(table)
    }

    /// 查询失败返回 None, 连接保持打开
    pub async fn query(&mut self, sql: &str, params: &[Value]) -> Option<Table> {
        match self.try_query(sql, params).await {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }

    /// 在同一事务中逐组执行写语句, 任一失败则整体回滚
    pub async fn try_execute_many(
        &mut self,
        sql: &str,
        params_list: &[Vec<Value>],
    ) -> Result<u64, DbError> {
        let conn = self.connection_mut()?;
        let mut tx = conn.begin().await.map_err(DbError::QueryExecution)?;

        let mut affected = 0u64;
        for params in params_list {
            match bind_all(sqlx::query(sql), params).execute(&mut *tx).await {
                Ok(result) => affected += result.rows_affected(),
                Err(e) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::error!("Error rolling back transaction: {}", rollback_err);
                    }
                    return Err(DbError::QueryExecution(e));
                }
            }
        }

        tx.commit().await.map_err(DbError::QueryExecution)?;
        Ok(affected)
    }

    pub async fn execute_many(&mut self, sql: &str, params_list: &[Vec<Value>]) -> bool {
        match self.try_execute_many(sql, params_list).await {
            Ok(affected) => {
                tracing::info!(
                    "Successfully executed query for {} records ({} rows affected)",
                    params_list.len(),
                    affected
                );
                true
            }
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        }
    }

    /// 释放连接; 可重复调用, 关闭失败只记录日志
    pub async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            match connection.close().await {
                Ok(()) => tracing::info!("Database connection closed"),
                Err(e) => tracing::error!("Error closing connection: {}", e),
            }
        }
    }

    /// 作用域内使用连接: 进入时 connect, 退出时 close
    ///
    /// 闭包返回 Err 时同样会关闭连接. 若闭包 panic, `SqliteManager`
    /// 被 drop, 连接随之释放.
    pub async fn scoped<T, F>(config: DatabaseConfig, f: F) -> T
    where
        F: for<'c> FnOnce(&'c mut SqliteManager) -> BoxFuture<'c, T>,
    {
        let mut manager = SqliteManager::new(config);
        manager.connect().await;
        let output = f(&mut manager).await;
        manager.close().await;
        output
    }
}

fn bind_all<'q>(mut query: SqliteQuery<'q>, params: &'q [Value]) -> SqliteQuery<'q> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<i64>),
            Value::Integer(i) => query.bind(*i),
            Value::Real(r) => query.bind(*r),
            Value::Text(s) => query.bind(s.as_str()),
            Value::Blob(b) => query.bind(b.as_slice()),
        };
    }
    query
}

/// 按运行时存储类解码一行
fn decode_row(row: &SqliteRow) -> Result<Vec<Value>, sqlx::Error> {
    let mut values = Vec::with_capacity(row.len());
    for idx in 0..row.len() {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            values.push(Value::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_string();
        let value = match type_name.as_str() {
            "INTEGER" => Value::Integer(row.try_get::<i64, _>(idx)?),
            "REAL" => Value::Real(row.try_get::<f64, _>(idx)?),
            "BLOB" => Value::Blob(row.try_get::<Vec<u8>, _>(idx)?),
            _ => Value::Text(row.try_get::<String, _>(idx)?),
        };
        values.push(value);
    }
    Ok(values)
}
