// ==========================================
// FBA 补货推演系统 - 单品规划会话
// ==========================================
// 职责: 持有单个商品的编辑态（参数 + 基础预测 + 已下单订单），
//       每次编辑后按固定顺序整体重算
// 输出: 最新推演结果 + 需要持久化的 upsert 指令
// ==========================================
// 说明: 会话只在内存中编辑，持久化由 API 层负责；
//       持久化失败时内存状态不回滚
// ==========================================

use crate::domain::forecast::{ForecastOverride, WeeklyForecast};
use crate::domain::inventory::InventoryParams;
use crate::domain::order::{OrderShipment, PlacedOrder};
use crate::domain::types::{ForecastField, ParamField};
use crate::engine::forecast_editor::{
    self, parse_non_negative, parse_whole_days, EditOutcome,
};
use crate::engine::projection::{
    ProjectionEngine, ProjectionResult, TimelineChangeGuard, TimelineUpdate,
};
use chrono::NaiveDate;
use tracing::debug;

/// 一次编辑的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEdit {
    pub outcome: EditOutcome,
    /// 需要写入 weekly_forecasted_sales 的记录（只有日销编辑会产生）
    pub upserts: Vec<ForecastOverride>,
    /// 重算后时间线的传播判定（编辑未生效时为 None）
    pub update: Option<TimelineUpdate>,
}

impl SessionEdit {
    fn rejected(outcome: EditOutcome) -> Self {
        Self {
            outcome,
            upserts: Vec::new(),
            update: None,
        }
    }
}

// ==========================================
// PlanningSession - 规划会话
// ==========================================
#[derive(Debug, Clone)]
pub struct PlanningSession {
    product_id: i64,
    params: InventoryParams,
    base_forecasts: Vec<WeeklyForecast>,
    placed_orders: Vec<PlacedOrder>,
    today: NaiveDate,
    horizon_days: u32,
    engine: ProjectionEngine,
    guard: TimelineChangeGuard,
    latest: ProjectionResult,
}

impl PlanningSession {
    /// 创建会话并立即推演一次
    pub fn new(
        product_id: i64,
        params: InventoryParams,
        base_forecasts: Vec<WeeklyForecast>,
        placed_orders: Vec<PlacedOrder>,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Self {
        let mut session = Self {
            product_id,
            params,
            base_forecasts,
            placed_orders,
            today,
            horizon_days,
            engine: ProjectionEngine::new(),
            guard: TimelineChangeGuard::new(),
            latest: ProjectionResult::default(),
        };
        session.recompute();
        session
    }

    // ===== 只读访问 =====

    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    pub fn params(&self) -> &InventoryParams {
        &self.params
    }

    pub fn base_forecasts(&self) -> &[WeeklyForecast] {
        &self.base_forecasts
    }

    pub fn timeline(&self) -> &[WeeklyForecast] {
        &self.latest.timeline
    }

    pub fn orders(&self) -> &[OrderShipment] {
        &self.latest.orders
    }

    pub fn result(&self) -> &ProjectionResult {
        &self.latest
    }

    // ==========================================
    // 编辑操作
    // ==========================================

    /// 编辑单个库存参数
    pub fn set_param(&mut self, field: ParamField, raw: &str) -> SessionEdit {
        let mut params = self.params;

        let parsed = if field.is_whole_days() {
            parse_whole_days(raw).map(|days| match field {
                ParamField::ProductionLeadTime => params.production_lead_time_days = days,
                _ => params.shipping_lead_time_days = days,
            })
        } else {
            parse_non_negative(raw).map(|value| match field {
                ParamField::SafetyStockDays => params.safety_stock_days = value,
                ParamField::MaxStockDays => params.max_stock_days = value,
                _ => params.current_fba_stock = value,
            })
        };

        if let Err(rejection) = parsed {
            debug!(%field, %rejection, "参数编辑被拒绝");
            return SessionEdit::rejected(EditOutcome::Rejected(rejection));
        }

        self.params = params;
        SessionEdit {
            outcome: EditOutcome::Applied,
            upserts: Vec::new(),
            update: Some(self.recompute()),
        }
    }

    /// 单点编辑第 index 周
    pub fn edit_forecast(&mut self, index: usize, field: ForecastField, raw: &str) -> SessionEdit {
        let outcome = forecast_editor::set_forecast_value(&mut self.base_forecasts, index, field, raw);
        if !outcome.is_applied() {
            return SessionEdit::rejected(outcome);
        }

        let upserts = match field {
            ForecastField::ForecastedDailySales => {
                forecast_editor::overrides_for(self.product_id, &self.base_forecasts, index..index + 1)
            }
            ForecastField::IncomingShipments => Vec::new(),
        };

        SessionEdit {
            outcome,
            upserts,
            update: Some(self.recompute()),
        }
    }

    /// 从第 index 周向下填充日销
    pub fn fill_down(&mut self, index: usize) -> SessionEdit {
        let outcome = forecast_editor::fill_down(&mut self.base_forecasts, index);
        if !outcome.is_applied() {
            return SessionEdit::rejected(outcome);
        }

        let upserts = forecast_editor::overrides_for(
            self.product_id,
            &self.base_forecasts,
            index..self.base_forecasts.len(),
        );

        SessionEdit {
            outcome,
            upserts,
            update: Some(self.recompute()),
        }
    }

    /// 替换已下单订单列表（订单增删改后调用）
    pub fn set_placed_orders(&mut self, placed_orders: Vec<PlacedOrder>) -> TimelineUpdate {
        self.placed_orders = placed_orders;
        self.recompute()
    }

    // ==========================================
    // 重算
    // ==========================================

    /// 按 规划 → 推演 顺序整体重算
    ///
    /// 只有守卫判定为 Changed 时才替换 latest
    fn recompute(&mut self) -> TimelineUpdate {
        let result = self.engine.run(
            &self.params,
            &self.base_forecasts,
            &self.placed_orders,
            self.today,
            self.horizon_days,
        );

        let update = self.guard.accept(&result.timeline);
        if update == TimelineUpdate::Changed {
            self.latest = result;
        } else if update == TimelineUpdate::Unchanged {
            // 时间线相同但建议可能不同（例如仅改动安全库存天数）
            self.latest.orders = result.orders;
        }
        update
    }
}
