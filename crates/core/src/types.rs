/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts (prices, totals) use exact decimal arithmetic.
pub type Money = rust_decimal::Decimal;
