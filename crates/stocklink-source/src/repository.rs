//! SQL implementation of IInventorySource
//!
//! Runs the fixed inventory read against the ERP database and maps rows to
//! [`SourceRecord`]s. Text fields are trimmed on the way in; numeric fields
//! tolerate NULL and integer-typed columns (legacy ERP schemas are loose
//! about both).

use anyhow::{Context, Result};
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{AnyPool, Row};
use tracing::{info, warn};

use stocklink_core::domain::record::SourceRecord;
use stocklink_core::ports::inventory_source::IInventorySource;

/// The fixed inventory read: active, stocked items with their per-location
/// quantities and most recent cost. `query` in the source configuration
/// overrides this for deployments with different schema names.
const DEFAULT_INVENTORY_QUERY: &str = r#"
SELECT
    L.ITEMNO        AS ItemNumber,
    I."DESC"        AS Description,
    L.LOCATION      AS Location,
    L.QTYONHAND     AS QuantityOnHand,
    L.QTYMINREQ     AS MinimumStock,
    L.LASTCOST      AS LastCost
FROM ICILOC AS L
JOIN ICITEM AS I
    ON L.ITEMNO = I.ITEMNO
WHERE I.INACTIVE = 0
    AND I.STOCKITEM = 1
ORDER BY L.ITEMNO, L.LOCATION
"#;

/// SQL-backed implementation of the inventory source port
pub struct SqlInventorySource {
    pool: AnyPool,
    query: String,
}

impl SqlInventorySource {
    /// Connects to the ERP database.
    ///
    /// # Arguments
    /// * `database_url` - Any sqlx-supported database URL
    /// * `query` - Optional override of the fixed inventory read
    pub async fn connect(database_url: &str, query: Option<String>) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to the source database")?;

        info!("Source database pool initialized");
        Ok(Self::with_pool(pool, query))
    }

    /// Wraps an existing pool (used by tests).
    pub fn with_pool(pool: AnyPool, query: Option<String>) -> Self {
        Self {
            pool,
            query: query.unwrap_or_else(|| DEFAULT_INVENTORY_QUERY.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl IInventorySource for SqlInventorySource {
    async fn fetch_records(&self) -> Result<Vec<SourceRecord>> {
        let rows = sqlx::query(&self.query)
            .fetch_all(&self.pool)
            .await
            .context("Inventory query failed")?;

        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>>>()?;

        info!(records = records.len(), "Fetched inventory records");
        Ok(records)
    }

    async fn probe(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Source database probe failed");
                false
            }
        }
    }
}

/// Maps one result row to a SourceRecord.
fn row_to_record(row: &AnyRow) -> Result<SourceRecord> {
    Ok(SourceRecord {
        item_code: text_column(row, "ItemNumber")?,
        description: text_column(row, "Description")?,
        location: text_column(row, "Location")?,
        quantity_on_hand: decimal_column(row, "QuantityOnHand")?,
        minimum_stock: decimal_column(row, "MinimumStock")?,
        last_cost: decimal_column(row, "LastCost")?,
    })
}

/// Reads a nullable text column, trimmed; NULL reads as empty.
fn text_column(row: &AnyRow, column: &str) -> Result<String> {
    let value: Option<String> = row
        .try_get(column)
        .with_context(|| format!("Failed to read column {column}"))?;
    Ok(value.unwrap_or_default().trim().to_string())
}

/// Reads a nullable numeric column; NULL reads as zero. Integer-typed
/// columns are widened to f64.
fn decimal_column(row: &AnyRow, column: &str) -> Result<f64> {
    if let Ok(value) = row.try_get::<Option<f64>, _>(column) {
        return Ok(value.unwrap_or(0.0));
    }
    let value: Option<i64> = row
        .try_get(column)
        .with_context(|| format!("Column {column} is neither float nor integer"))?;
    Ok(value.map(|v| v as f64).unwrap_or(0.0))
}
