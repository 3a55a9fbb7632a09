// ==========================================
// FBA 补货推演系统 - 推演流水线
// ==========================================
// 职责: 固定顺序的两阶段纯计算
//   1. ReorderPlanner 生成补货建议
//   2. ForecastTimelineBuilder 合并建议 + 已下单订单，推演时间线
// 红线: 不做响应式互相监听；每次输入变化整体重算
// ==========================================

use crate::domain::forecast::WeeklyForecast;
use crate::domain::inventory::InventoryParams;
use crate::domain::order::{IncomingShipment, OrderShipment, PlacedOrder};
use crate::domain::types::StockStatus;
use crate::engine::reorder_planner::ReorderPlanner;
use crate::engine::timeline::ForecastTimelineBuilder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// ==========================================
// ProjectionResult - 推演结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub orders: Vec<OrderShipment>,
    pub timeline: Vec<WeeklyForecast>,
}

impl ProjectionResult {
    /// 时间线所有数值是否有限
    pub fn is_finite(&self) -> bool {
        self.timeline.iter().all(WeeklyForecast::is_finite)
    }

    /// 第一个库存状态不健康的周
    pub fn first_low_stock_week(&self, warning_days: f64) -> Option<&WeeklyForecast> {
        self.timeline
            .iter()
            .find(|w| w.stock_status(warning_days) != StockStatus::Healthy)
    }

    /// 带低库存预警的补货建议数
    pub fn alert_count(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| o.low_stock_alert.is_some())
            .count()
    }
}

// ==========================================
// ProjectionEngine - 推演流水线
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectionEngine {
    planner: ReorderPlanner,
    builder: ForecastTimelineBuilder,
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self {
            planner: ReorderPlanner::new(),
            builder: ForecastTimelineBuilder::new(),
        }
    }

    /// 执行一次完整推演
    ///
    /// # 参数
    /// - `params`: 库存参数
    /// - `base_forecasts`: 基础周预测（日期 + 日销 + 人工到货）
    /// - `placed_orders`: 已下单订单，作为额外到货叠加
    /// - `today`: 规划起点
    /// - `horizon_days`: 规划窗口
    #[instrument(skip_all, fields(weeks = base_forecasts.len(), placed = placed_orders.len(), today = %today))]
    pub fn run(
        &self,
        params: &InventoryParams,
        base_forecasts: &[WeeklyForecast],
        placed_orders: &[PlacedOrder],
        today: NaiveDate,
        horizon_days: u32,
    ) -> ProjectionResult {
        // 阶段 1: 补货规划
        let orders = self
            .planner
            .plan_orders(params, base_forecasts, today, horizon_days);

        // 阶段 2: 合并到货并推演
        let shipments: Vec<IncomingShipment> = orders
            .iter()
            .map(IncomingShipment::from)
            .chain(placed_orders.iter().map(IncomingShipment::from))
            .collect();
        let timeline = self
            .builder
            .build_with_shipments(params, base_forecasts, &shipments);

        let result = ProjectionResult { orders, timeline };
        info!(
            orders = result.orders.len(),
            alerts = result.alert_count(),
            "推演完成"
        );
        result
    }
}

// ==========================================
// TimelineChangeGuard - 变更守卫
// ==========================================
// 嵌入响应式 UI 时，只有 "有变化且全部有限" 的时间线才向下游传播

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineUpdate {
    Changed,
    Unchanged,
    RejectedNonFinite,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineChangeGuard {
    current: Option<Vec<WeeklyForecast>>,
}

impl TimelineChangeGuard {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// 提交候选时间线
    pub fn accept(&mut self, candidate: &[WeeklyForecast]) -> TimelineUpdate {
        if !candidate.iter().all(WeeklyForecast::is_finite) {
            warn!(weeks = candidate.len(), "时间线含非有限数值，已拦截");
            return TimelineUpdate::RejectedNonFinite;
        }

        if self.current.as_deref() == Some(candidate) {
            return TimelineUpdate::Unchanged;
        }

        self.current = Some(candidate.to_vec());
        TimelineUpdate::Changed
    }

    /// 最近一次被接受的时间线
    pub fn current(&self) -> Option<&[WeeklyForecast]> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calendar::add_days;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn flat(weeks: usize, sales: f64) -> Vec<WeeklyForecast> {
        (0..weeks)
            .map(|i| WeeklyForecast::new(add_days(monday(), 7 * i as i64), sales))
            .collect()
    }

    #[test]
    fn test_guard_detects_change() {
        let mut guard = TimelineChangeGuard::new();
        let timeline = flat(3, 10.0);

        assert_eq!(guard.accept(&timeline), TimelineUpdate::Changed);
        assert_eq!(guard.accept(&timeline), TimelineUpdate::Unchanged);

        let mut edited = timeline.clone();
        edited[1].forecasted_daily_sales = 11.0;
        assert_eq!(guard.accept(&edited), TimelineUpdate::Changed);
        assert_eq!(guard.current(), Some(edited.as_slice()));
    }

    #[test]
    fn test_guard_rejects_non_finite() {
        let mut guard = TimelineChangeGuard::new();
        let good = flat(2, 10.0);
        guard.accept(&good);

        let mut bad = good.clone();
        bad[1].days_of_stock = f64::INFINITY;
        assert_eq!(guard.accept(&bad), TimelineUpdate::RejectedNonFinite);
        assert_eq!(guard.current(), Some(good.as_slice()));
    }

    #[test]
    fn test_placed_orders_are_merged() {
        let engine = ProjectionEngine::new();
        let params = InventoryParams {
            current_fba_stock: 100_000.0,
            ..InventoryParams::default()
        };
        let placed = vec![PlacedOrder {
            id: 1,
            created_at: monday().and_hms_opt(9, 0, 0).unwrap(),
            product_id: 1,
            units: 500,
            expected_arrival_date: add_days(monday(), 15),
        }];

        let result = engine.run(&params, &flat(4, 1.0), &placed, monday(), 28);

        assert!(result.orders.is_empty());
        assert_eq!(result.timeline[2].incoming_shipments, 500.0);
        assert_eq!(result.timeline[2].amazon_inventory, 100_000.0 - 14.0 + 500.0);
    }
}
