// ==========================================
// FBA 补货推演系统 - 商品仓储
// ==========================================
// 职责: 管理 product 表（商品 + 补货参数）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::InventoryParams;
use crate::domain::product::{NewProduct, Product};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;

const SELECT_COLUMNS: &str = r#"
    SELECT id, created_at, name, safety_stock_days, production_lead_time_days,
           shipping_lead_time, max_stock_days, current_stock_units
    FROM product
"#;

pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
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

    fn map_row(row: &Row) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            created_at: row.get::<_, NaiveDateTime>(1)?,
            name: row.get(2)?,
            safety_stock_days: row.get(3)?,
            production_lead_time_days: row.get(4)?,
            shipping_lead_time: row.get(5)?,
            max_stock_days: row.get(6)?,
            current_stock_units: row.get(7)?,
        })
    }

    /// 新建商品
    ///
    /// # 返回
    /// 写入后的完整记录（含 id / created_at）
    pub fn insert(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        let created_at = chrono::Local::now().naive_local();

        conn.execute(
            r#"
            INSERT INTO product (
                created_at, name, safety_stock_days, production_lead_time_days,
                shipping_lead_time, max_stock_days, current_stock_units
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                created_at,
                product.name,
                product.safety_stock_days,
                product.production_lead_time_days,
                product.shipping_lead_time,
                product.max_stock_days,
                product.current_stock_units,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(product_id = id, name = %product.name, "商品已创建");

        Ok(Product {
            id,
            created_at,
            name: product.name.clone(),
            safety_stock_days: product.safety_stock_days,
            production_lead_time_days: product.production_lead_time_days,
            shipping_lead_time: product.shipping_lead_time,
            max_stock_days: product.max_stock_days,
            current_stock_units: product.current_stock_units,
        })
    }

    /// 整体更新商品（名称 + 参数）
    pub fn update(&self, id: i64, product: &NewProduct) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE product SET
                name = ?2,
                safety_stock_days = ?3,
                production_lead_time_days = ?4,
                shipping_lead_time = ?5,
                max_stock_days = ?6,
                current_stock_units = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                product.name,
                product.safety_stock_days,
                product.production_lead_time_days,
                product.shipping_lead_time,
                product.max_stock_days,
                product.current_stock_units,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("product", id));
        }
        Ok(())
    }

    /// 仅更新补货参数（参数表单编辑后调用）
    pub fn update_params(&self, id: i64, p: &InventoryParams) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE product SET
                safety_stock_days = ?2,
                production_lead_time_days = ?3,
                shipping_lead_time = ?4,
                max_stock_days = ?5,
                current_stock_units = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                p.safety_stock_days,
                p.production_lead_time_days,
                p.shipping_lead_time_days,
                p.max_stock_days,
                p.current_fba_stock,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("product", id));
        }
        Ok(())
    }

    /// 删除商品（预测覆写与订单级联删除）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM product WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("product", id));
        }
        debug!(product_id = id, "商品已删除");
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let product = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(product)
    }

    /// 全部商品，按名称排序
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY name, id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn repo() -> ProductRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        ProductRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn widget() -> NewProduct {
        NewProduct::from_params("Widget", &InventoryParams {
            current_fba_stock: 1200.0,
            ..InventoryParams::default()
        })
    }

    #[test]
    fn test_insert_and_find() {
        let repo = repo();
        let created = repo.insert(&widget()).unwrap();

        let found = repo.find_by_id(created.id).unwrap().expect("商品应存在");
        assert_eq!(found.name, "Widget");
        assert_eq!(found.inventory_params(), widget().inventory_params());
    }

    #[test]
    fn test_update_params_and_missing_id() {
        let repo = repo();
        let created = repo.insert(&widget()).unwrap();

        let mut params = created.inventory_params();
        params.shipping_lead_time_days = 35;
        repo.update_params(created.id, &params).unwrap();
        assert_eq!(
            repo.find_by_id(created.id).unwrap().unwrap().shipping_lead_time,
            35
        );

        let err = repo.update_params(created.id + 100, &params).unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_delete_and_list() {
        let repo = repo();
        let a = repo.insert(&widget()).unwrap();
        let mut other = widget();
        other.name = "Gadget".to_string();
        repo.insert(&other).unwrap();

        repo.delete(a.id).unwrap();
        let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Gadget".to_string()]);
        assert!(repo.delete(a.id).is_err());
    }
}
