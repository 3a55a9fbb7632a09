// ==========================================
// FBA 补货推演系统 - 周预测覆写仓储
// ==========================================
// 职责: 管理 weekly_forecasted_sales 表
// 红线: 唯一键 (product_id, week_start_date)，写入一律 upsert，后写覆盖先写
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::forecast::ForecastOverride;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::debug;

const UPSERT_SQL: &str = r#"
    INSERT INTO weekly_forecasted_sales (product_id, week_start_date, daily_forecasted_sales, updated_at)
    VALUES (?1, ?2, ?3, datetime('now'))
    ON CONFLICT(product_id, week_start_date) DO UPDATE SET
        daily_forecasted_sales = excluded.daily_forecasted_sales,
        updated_at = excluded.updated_at
"#;

pub struct ForecastRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ForecastRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入单周覆写
    pub fn upsert(&self, record: &ForecastOverride) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            UPSERT_SQL,
            params![
                record.product_id,
                record.week_start_date,
                record.daily_forecasted_sales
            ],
        )?;
        Ok(())
    }

    /// 批量写入（单事务，全部成功或全部失败）
    ///
    /// # 返回
    /// 写入条数
    pub fn upsert_batch(&self, records: &[ForecastOverride]) -> RepositoryResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        {
            let mut stmt = tx.prepare(UPSERT_SQL)?;
            for record in records {
                stmt.execute(params![
                    record.product_id,
                    record.week_start_date,
                    record.daily_forecasted_sales
                ])?;
            }
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(count = records.len(), "周预测覆写已批量写入");
        Ok(records.len())
    }

    /// 读取商品全部覆写，按周起始日升序
    pub fn find_by_product(&self, product_id: i64) -> RepositoryResult<Vec<ForecastOverride>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT product_id, week_start_date, daily_forecasted_sales
            FROM weekly_forecasted_sales
            WHERE product_id = ?1
            ORDER BY week_start_date
            "#,
        )?;

        let records = stmt
            .query_map(params![product_id], |row| {
                Ok(ForecastOverride {
                    product_id: row.get(0)?,
                    week_start_date: row.get::<_, NaiveDate>(1)?,
                    daily_forecasted_sales: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// 清空商品全部覆写
    pub fn delete_by_product(&self, product_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM weekly_forecasted_sales WHERE product_id = ?1",
            params![product_id],
        )?;
        Ok(affected)
    }
}
