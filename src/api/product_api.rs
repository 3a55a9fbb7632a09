// ==========================================
// FBA 补货推演系统 - 商品与订单 API
// ==========================================
// 职责: 商品 CRUD（含补货参数校验）+ 已下单订单 CRUD
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::order::{NewPlacedOrder, PlacedOrder};
use crate::domain::product::{NewProduct, Product};
use crate::repository::{OrderRepository, ProductRepository};

/// 仪表盘默认展示的最近订单数
pub const DEFAULT_RECENT_ORDERS: usize = 3;

// ==========================================
// ProductApi - 商品与订单 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
    order_repo: Arc<OrderRepository>,
}

impl ProductApi {
    pub fn new(product_repo: Arc<ProductRepository>, order_repo: Arc<OrderRepository>) -> Self {
        Self {
            product_repo,
            order_repo,
        }
    }

    // ==========================================
    // 商品
    // ==========================================

    /// 新建商品
    ///
    /// # 返回
    /// - Ok(Product): 新建的商品
    /// - Err(ApiError::InvalidInput): 名称为空
    /// - Err(ApiError::ValidationError): 参数非法
    pub fn create_product(&self, input: &NewProduct) -> ApiResult<Product> {
        validate_product(input)?;
        let product = self.product_repo.insert(input)?;
        info!(product_id = product.id, name = %product.name, "新建商品");
        Ok(product)
    }

    pub fn update_product(&self, id: i64, input: &NewProduct) -> ApiResult<Product> {
        validate_product(input)?;
        self.product_repo.update(id, input)?;
        self.get_product(id)
    }

    pub fn delete_product(&self, id: i64) -> ApiResult<()> {
        self.product_repo.delete(id)?;
        info!(product_id = id, "删除商品");
        Ok(())
    }

    pub fn get_product(&self, id: i64) -> ApiResult<Product> {
        self.product_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("商品(id={})不存在", id)))
    }

    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.list_all()?)
    }

    // ==========================================
    // 订单
    // ==========================================

    /// 新建订单
    ///
    /// # 参数
    /// - input: product_id + units (> 0) + expected_arrival_date
    pub fn create_order(&self, input: &NewPlacedOrder) -> ApiResult<PlacedOrder> {
        validate_units(input.units)?;
        // 商品必须存在，给出比外键错误更明确的提示
        self.get_product(input.product_id)?;

        let order = self.order_repo.insert(input)?;
        debug!(order_id = order.id, product_id = order.product_id, "新建订单");
        Ok(order)
    }

    pub fn update_order(
        &self,
        id: i64,
        units: i64,
        expected_arrival_date: NaiveDate,
    ) -> ApiResult<PlacedOrder> {
        validate_units(units)?;
        self.order_repo.update(id, units, expected_arrival_date)?;
        self.order_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("订单(id={})不存在", id)))
    }

    pub fn delete_order(&self, id: i64) -> ApiResult<()> {
        self.order_repo.delete(id)?;
        Ok(())
    }

    /// 商品全部订单，最新在前
    pub fn list_orders(&self, product_id: i64) -> ApiResult<Vec<PlacedOrder>> {
        Ok(self.order_repo.find_by_product(product_id)?)
    }

    /// 最近 limit 条订单
    pub fn recent_orders(&self, product_id: i64, limit: usize) -> ApiResult<Vec<PlacedOrder>> {
        Ok(self.order_repo.find_recent(product_id, limit)?)
    }
}

fn validate_product(input: &NewProduct) -> ApiResult<()> {
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("商品名称不能为空".to_string()));
    }
    input.inventory_params().validate()?;
    Ok(())
}

fn validate_units(units: i64) -> ApiResult<()> {
    if units <= 0 {
        return Err(ApiError::InvalidInput(format!(
            "订单数量必须为正整数: {}",
            units
        )));
    }
    Ok(())
}
