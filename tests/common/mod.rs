use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, Executor};
use std::path::PathBuf;
use tempfile::TempDir;

/// 精简版 Chinook 结构; 每张发票一行明细, 金额见各行注释
const FIXTURE: &str = r#"
CREATE TABLE Customer (
    CustomerId INTEGER PRIMARY KEY,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL,
    Company TEXT,
    Country TEXT,
    Email TEXT NOT NULL
);
CREATE TABLE Invoice (
    InvoiceId INTEGER PRIMARY KEY,
    CustomerId INTEGER NOT NULL REFERENCES Customer (CustomerId),
    InvoiceDate TEXT NOT NULL,
    BillingAddress TEXT,
    BillingCity TEXT,
    BillingCountry TEXT,
    Total NUMERIC(10, 2) NOT NULL
);
CREATE TABLE InvoiceLine (
    InvoiceLineId INTEGER PRIMARY KEY,
    InvoiceId INTEGER NOT NULL REFERENCES Invoice (InvoiceId),
    TrackId INTEGER NOT NULL,
    UnitPrice NUMERIC(10, 2) NOT NULL,
    Quantity INTEGER NOT NULL
);
CREATE TABLE Note (
    NoteId INTEGER PRIMARY KEY,
    Body TEXT NOT NULL
);

INSERT INTO Customer VALUES
    (1, 'Luís', 'Gonçalves', 'Embraer', 'Brazil', 'luisg@embraer.com.br'),
    (2, 'Leonie', 'Köhler', NULL, 'Germany', 'leonekohler@surfeu.de'),
    (3, 'François', 'Tremblay', NULL, 'Canada', 'ftremblay@gmail.com');

INSERT INTO Invoice VALUES
    (1, 1, '2021-01-01', 'Av. Brigadeiro', 'São José', 'Brazil', 9.90),
    (2, 1, '2021-01-02', 'Av. Brigadeiro', 'São José', 'Brazil', 11.94),
    (3, 2, '2021-01-03', 'Theodor-Heuss', 'Stuttgart', 'Germany', 12.87),
    (4, 2, '2021-01-04', 'Theodor-Heuss', 'Stuttgart', 'Germany', 19.90),
    (5, 3, '2021-01-05', '1498 rue Bélanger', 'Montréal', 'Canada', 20.79),
    (6, 3, '2021-01-06', '1498 rue Bélanger', 'Montréal', 'Canada', 10.00),
    (7, 1, '2021-01-07', 'Av. Brigadeiro', 'São José', 'Brazil', 20.00),
    (8, 1, '2021-01-08', 'Av. Brigadeiro', 'São José', 'Brazil', 15.00),
    (9, 2, '2021-01-09', 'Theodor-Heuss', 'Stuttgart', 'Germany', 16.00);

INSERT INTO InvoiceLine VALUES
    (1, 1, 100, 0.99, 10),  -- 9.90
    (2, 2, 101, 1.99, 6),   -- 11.94
    (3, 3, 102, 0.99, 13),  -- 12.87
    (4, 4, 103, 1.99, 10),  -- 19.90
    (5, 5, 104, 0.99, 21),  -- 20.79
    (6, 6, 105, 2.50, 4),   -- 10.00
    (7, 7, 106, 1.00, 20),  -- 20.00
    (8, 8, 107, 1.00, 15),  -- 15.00
    (9, 9, 108, 1.00, 16);  -- 16.00
"#;

/// 在临时目录中创建测试库; 返回的 TempDir 需在测试期间保持存活
pub async fn fixture_db() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chinook.sqlite");

    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    conn.execute(FIXTURE).await.unwrap();
    conn.close().await.unwrap();

    (dir, path)
}
