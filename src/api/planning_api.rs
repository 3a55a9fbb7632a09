// ==========================================
// FBA 补货推演系统 - 规划 API
// ==========================================
// 职责: 组装单品规划会话（种子预测 + 持久化覆写 + 已下单订单），
//       编辑后持久化覆写/参数
// 红线: 持久化失败直接返回错误，内存会话不回滚
// ==========================================

use std::sync::Arc;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PlanningConfig};
use crate::domain::forecast::WeeklyForecast;
use crate::domain::order::OrderShipment;
use crate::domain::types::{ForecastField, ParamField, StockStatus};
use crate::engine::forecast_editor::{apply_overrides, seed_forecasts};
use crate::engine::{PlanningSession, SessionEdit, TimelineUpdate};
use crate::repository::{ForecastRepository, OrderRepository, ProductRepository};

// ==========================================
// ProductProjection - 单品推演视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProjection {
    pub product_id: i64,
    pub orders: Vec<OrderShipment>,
    pub timeline: Vec<WeeklyForecast>,
    /// 与 timeline 一一对应
    pub stock_status: Vec<StockStatus>,
    pub days_of_stock_warning: f64,
    /// 第一个不健康周的周起始日
    pub first_low_stock_week: Option<NaiveDate>,
}

impl ProductProjection {
    pub fn from_session(session: &PlanningSession, days_of_stock_warning: f64) -> Self {
        let result = session.result();
        Self {
            product_id: session.product_id(),
            orders: result.orders.clone(),
            timeline: result.timeline.clone(),
            stock_status: result
                .timeline
                .iter()
                .map(|w| w.stock_status(days_of_stock_warning))
                .collect(),
            days_of_stock_warning,
            first_low_stock_week: result
                .first_low_stock_week(days_of_stock_warning)
                .map(|w| w.date),
        }
    }
}

// ==========================================
// PlanningApi - 规划 API
// ==========================================
pub struct PlanningApi {
    product_repo: Arc<ProductRepository>,
    forecast_repo: Arc<ForecastRepository>,
    order_repo: Arc<OrderRepository>,
    config_manager: Arc<ConfigManager>,
}

impl PlanningApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        forecast_repo: Arc<ForecastRepository>,
        order_repo: Arc<OrderRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            product_repo,
            forecast_repo,
            order_repo,
            config_manager,
        }
    }

    fn load_config(&self) -> ApiResult<PlanningConfig> {
        // Box<dyn Error> 非 Send + Sync，转成 anyhow 保留消息并附加上下文
        self.config_manager
            .load_planning_config()
            .map_err(|e| anyhow!("{}", e).context("加载规划配置失败"))
            .map_err(ApiError::from)
    }

    /// 种子预测 + 持久化覆写
    fn build_base_forecasts(
        &self,
        product_id: i64,
        today: NaiveDate,
        config: &PlanningConfig,
    ) -> ApiResult<Vec<WeeklyForecast>> {
        let mut forecasts = seed_forecasts(
            today,
            config.week_start,
            config.seed_weeks,
            config.default_daily_sales,
        );
        let overrides = self.forecast_repo.find_by_product(product_id)?;
        let applied = apply_overrides(&mut forecasts, &overrides);
        debug!(
            product_id,
            overrides = overrides.len(),
            applied,
            "已合并预测覆写"
        );
        Ok(forecasts)
    }

    /// 打开单品规划会话
    ///
    /// # 参数
    /// - product_id: 商品ID
    /// - today: 规划起点
    ///
    /// # 返回
    /// - Ok(PlanningSession): 已完成首次推演的会话
    /// - Err(ApiError::NotFound): 商品不存在
    #[instrument(skip(self))]
    pub fn open_session(&self, product_id: i64, today: NaiveDate) -> ApiResult<PlanningSession> {
        let product = self
            .product_repo
            .find_by_id(product_id)?
            .ok_or_else(|| ApiError::NotFound(format!("商品(id={})不存在", product_id)))?;

        let params = product.inventory_params();
        params.validate()?;

        let config = self.load_config()?;
        let base = self.build_base_forecasts(product_id, today, &config)?;
        let placed = self.order_repo.find_by_product(product_id)?;

        Ok(PlanningSession::new(
            product_id,
            params,
            base,
            placed,
            today,
            config.horizon_days,
        ))
    }

    /// 一次性读取单品推演结果
    pub fn get_projection(&self, product_id: i64, today: NaiveDate) -> ApiResult<ProductProjection> {
        let session = self.open_session(product_id, today)?;
        self.projection_of(&session)
    }

    /// 会话当前结果 + 库存状态
    pub fn projection_of(&self, session: &PlanningSession) -> ApiResult<ProductProjection> {
        let config = self.load_config()?;
        Ok(ProductProjection::from_session(
            session,
            config.days_of_stock_warning,
        ))
    }

    /// 编辑第 index 周的日销/到货，日销编辑持久化为覆写
    pub fn edit_forecast(
        &self,
        session: &mut PlanningSession,
        index: usize,
        field: ForecastField,
        raw: &str,
    ) -> ApiResult<SessionEdit> {
        let edit = session.edit_forecast(index, field, raw);
        self.persist_overrides(&edit)?;
        Ok(edit)
    }

    /// 从第 index 周向下填充日销，批量持久化
    pub fn fill_down(&self, session: &mut PlanningSession, index: usize) -> ApiResult<SessionEdit> {
        let edit = session.fill_down(index);
        self.persist_overrides(&edit)?;
        Ok(edit)
    }

    /// 编辑单个库存参数，生效后写回商品记录
    pub fn update_param(
        &self,
        session: &mut PlanningSession,
        field: ParamField,
        raw: &str,
    ) -> ApiResult<SessionEdit> {
        let edit = session.set_param(field, raw);
        if edit.outcome.is_applied() {
            self.product_repo
                .update_params(session.product_id(), session.params())
                .inspect_err(|e| warn!(product_id = session.product_id(), %field, error = %e, "参数持久化失败"))?;
        }
        Ok(edit)
    }

    /// 订单增删改后重新加载已下单订单并重算
    pub fn refresh_placed_orders(&self, session: &mut PlanningSession) -> ApiResult<TimelineUpdate> {
        let placed = self.order_repo.find_by_product(session.product_id())?;
        Ok(session.set_placed_orders(placed))
    }

    /// 清空商品全部预测覆写（恢复为种子预测）
    ///
    /// # 返回
    /// 删除的覆写条数
    pub fn reset_forecasts(&self, product_id: i64) -> ApiResult<usize> {
        Ok(self.forecast_repo.delete_by_product(product_id)?)
    }

    fn persist_overrides(&self, edit: &SessionEdit) -> ApiResult<()> {
        match edit.upserts.as_slice() {
            [] => Ok(()),
            [single] => Ok(self.forecast_repo.upsert(single)?),
            many => {
                self.forecast_repo
                    .upsert_batch(many)
                    .inspect_err(|e| warn!(count = many.len(), error = %e, "预测覆写持久化失败"))?;
                Ok(())
            }
        }
    }
}
