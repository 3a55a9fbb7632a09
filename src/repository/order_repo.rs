// ==========================================
// FBA 补货推演系统 - 已下单订单仓储
// ==========================================
// 职责: 管理 product_order 表
// 说明: 列表一律按创建时间倒序（最新在前）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::order::{NewPlacedOrder, PlacedOrder};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
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

    fn map_row(row: &Row) -> rusqlite::Result<PlacedOrder> {
        Ok(PlacedOrder {
            id: row.get(0)?,
            created_at: row.get(1)?,
            product_id: row.get(2)?,
            units: row.get(3)?,
            expected_arrival_date: row.get(4)?,
        })
    }

    pub fn insert(&self, order: &NewPlacedOrder) -> RepositoryResult<PlacedOrder> {
        let conn = self.get_conn()?;
        let created_at = chrono::Local::now().naive_local();

        conn.execute(
            r#"
            INSERT INTO product_order (created_at, product_id, units, expected_arrival_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                created_at,
                order.product_id,
                order.units,
                order.expected_arrival_date
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(order_id = id, product_id = order.product_id, units = order.units, "订单已创建");

        Ok(PlacedOrder {
            id,
            created_at,
            product_id: order.product_id,
            units: order.units,
            expected_arrival_date: order.expected_arrival_date,
        })
    }

    /// 更新订单数量与到货日期（不允许改归属商品）
    pub fn update(&self, id: i64, units: i64, expected_arrival_date: chrono::NaiveDate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE product_order SET units = ?2, expected_arrival_date = ?3 WHERE id = ?1",
            params![id, units, expected_arrival_date],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("product_order", id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM product_order WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("product_order", id));
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<PlacedOrder>> {
        let conn = self.get_conn()?;
        let order = conn
            .query_row(
                r#"
                SELECT id, created_at, product_id, units, expected_arrival_date
                FROM product_order WHERE id = ?1
                "#,
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(order)
    }

    /// 商品全部订单，最新在前
    pub fn find_by_product(&self, product_id: i64) -> RepositoryResult<Vec<PlacedOrder>> {
        self.query_newest_first(product_id, -1)
    }

    /// 最近 limit 条订单
    pub fn find_recent(&self, product_id: i64, limit: usize) -> RepositoryResult<Vec<PlacedOrder>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_newest_first(product_id, limit)
    }

    // SQLite 中 LIMIT -1 表示不限
    fn query_newest_first(&self, product_id: i64, limit: i64) -> RepositoryResult<Vec<PlacedOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, created_at, product_id, units, expected_arrival_date
            FROM product_order
            WHERE product_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#,
        )?;
        let orders = stmt
            .query_map(params![product_id, limit], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orders)
    }
}
