// ==========================================
// FBA 补货推演系统 - 补货规划引擎
// ==========================================
// 职责: 前向模拟库存消耗，判定何时跌破安全库存，生成补货建议
// 输入: InventoryParams + 周预测曲线 + 规划起点 + 规划窗口
// 输出: Vec<OrderShipment> (按下单日升序)
// ==========================================
// 红线: 单遍模拟、无回溯；每轮 current 至少推进 1 天，循环必然终止
// ==========================================

use crate::domain::forecast::{WeeklyForecast, DAYS_PER_WEEK};
use crate::domain::inventory::InventoryParams;
use crate::domain::order::{LowStockAlert, OrderShipment};
use crate::engine::calendar::{add_days, checked_add_days, days_between};
use crate::engine::sales_window::average_daily_sales;
use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

// ==========================================
// ReorderPlanner - 补货规划引擎
// ==========================================
/// 补货规划引擎
///
/// 无状态引擎：参数与预测曲线均按值/引用传入，
/// 相同输入必然得到相同输出。
#[derive(Debug, Default, Clone, Copy)]
pub struct ReorderPlanner {}

/// 单次下单决策的结果（内部使用）
struct PlannedOrder {
    shipment: OrderShipment,
    projected_inventory_at_arrival: f64,
    arrival_offset_days: i64,
}

impl ReorderPlanner {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成补货建议
    ///
    /// # 参数
    /// - `params`: 库存参数
    /// - `forecasts`: 周预测曲线（只读取日期与日销量）
    /// - `today`: 规划起点
    /// - `horizon_days`: 规划窗口天数
    ///
    /// # 规则
    /// 1. 平均日销取 [current, current + 总提前期) 窗口
    /// 2. 平均日销 <= 0 → 跳过一周，不下单
    /// 3. 距安全库存天数 <= 总提前期 → 立即下单，模拟库存补到上限
    /// 4. 否则按平均日销消耗一周
    #[instrument(skip_all, fields(weeks = forecasts.len(), today = %today, horizon_days = horizon_days))]
    pub fn plan_orders(
        &self,
        params: &InventoryParams,
        forecasts: &[WeeklyForecast],
        today: NaiveDate,
        horizon_days: u32,
    ) -> Vec<OrderShipment> {
        let total_lead_time = i64::from(params.total_lead_time_days());
        // 提前期为 0 时窗口退化为空区间，至少取 1 天
        let window_days = total_lead_time.max(1);
        let horizon_end = add_days(today, i64::from(horizon_days));

        let mut simulated_inventory = params.current_fba_stock;
        let mut current_date = today;
        let mut orders = Vec::new();

        while current_date < horizon_end {
            let avg_daily_sales = average_daily_sales(
                current_date,
                add_days(current_date, window_days),
                forecasts,
            );

            let step_days = if avg_daily_sales <= 0.0 || !avg_daily_sales.is_finite() {
                // 无需求窗口: 不下单，直接跳过一周
                DAYS_PER_WEEK
            } else {
                let safety_units = params.safety_stock_units(avg_daily_sales);
                let days_until_safety_stock =
                    ((simulated_inventory - safety_units) / avg_daily_sales).floor() as i64;

                if days_until_safety_stock <= total_lead_time {
                    let planned = self.plan_single_order(
                        params,
                        simulated_inventory,
                        avg_daily_sales,
                        current_date,
                        days_until_safety_stock,
                        today,
                    );

                    simulated_inventory = planned.projected_inventory_at_arrival
                        + planned.shipment.order_quantity as f64;
                    orders.push(planned.shipment);
                    planned.arrival_offset_days + 1
                } else {
                    simulated_inventory -= avg_daily_sales * DAYS_PER_WEEK as f64;
                    DAYS_PER_WEEK
                }
            };

            match checked_add_days(current_date, step_days) {
                Some(next) => current_date = next,
                None => {
                    warn!(current = %current_date, step_days, "日期超出可表示范围，停止规划");
                    break;
                }
            }
        }

        orders.sort_by_key(|order| order.order_date);

        debug!(
            order_count = orders.len(),
            alert_count = orders.iter().filter(|o| o.low_stock_alert.is_some()).count(),
            "补货规划完成"
        );

        orders
    }

    // ==========================================
    // 下单决策辅助方法
    // ==========================================

    /// 在 current_date 生成一笔补货
    ///
    /// 到货日 = current + 距安全库存天数，且不早于:
    /// - current_date 本身
    /// - today + 总提前期（今天下单也无法更早到货）
    fn plan_single_order(
        &self,
        params: &InventoryParams,
        simulated_inventory: f64,
        avg_daily_sales: f64,
        current_date: NaiveDate,
        days_until_safety_stock: i64,
        today: NaiveDate,
    ) -> PlannedOrder {
        let total_lead_time = i64::from(params.total_lead_time_days());
        let earliest_arrival = add_days(today, total_lead_time);

        let required_arrival_date =
            add_days(current_date, days_until_safety_stock.max(0)).max(earliest_arrival);
        let arrival_offset_days = days_between(current_date, required_arrival_date);

        let ship_date = add_days(
            required_arrival_date,
            -i64::from(params.shipping_lead_time_days),
        );
        let order_date = add_days(ship_date, -i64::from(params.production_lead_time_days));

        let projected_inventory_at_arrival =
            simulated_inventory - avg_daily_sales * arrival_offset_days as f64;
        let projected_days_of_stock = projected_inventory_at_arrival / avg_daily_sales;

        let order_quantity = self.calculate_order_quantity(
            params.max_stock_days,
            projected_days_of_stock,
            avg_daily_sales,
        );

        let low_stock_alert = if projected_inventory_at_arrival
            < params.safety_stock_units(avg_daily_sales)
        {
            Some(LowStockAlert {
                days_of_stock_remaining: projected_days_of_stock.floor() as i64,
                projected_inventory: projected_inventory_at_arrival,
            })
        } else {
            None
        };

        PlannedOrder {
            shipment: OrderShipment {
                order_date,
                order_quantity,
                ship_date,
                ship_quantity: order_quantity,
                required_arrival_date,
                low_stock_alert,
            },
            projected_inventory_at_arrival,
            arrival_offset_days,
        }
    }

    /// 计算补货量：补到 max_stock_days 上限
    ///
    /// quantity = max(0, ceil((max_stock_days - 到货时库存天数) × 平均日销))
    pub fn calculate_order_quantity(
        &self,
        max_stock_days: f64,
        projected_days_of_stock: f64,
        avg_daily_sales: f64,
    ) -> u64 {
        let raw = ((max_stock_days - projected_days_of_stock) * avg_daily_sales).ceil();
        if raw.is_finite() && raw > 0.0 {
            raw as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn flat_forecast(weeks: usize, daily_sales: f64) -> Vec<WeeklyForecast> {
        (0..weeks)
            .map(|i| WeeklyForecast::new(add_days(monday(), 7 * i as i64), daily_sales))
            .collect()
    }

    fn params(stock: f64) -> InventoryParams {
        InventoryParams {
            safety_stock_days: 45.0,
            production_lead_time_days: 30,
            shipping_lead_time_days: 50,
            max_stock_days: 100.0,
            current_fba_stock: stock,
        }
    }

    #[test]
    fn test_order_quantity_never_negative() {
        let planner = ReorderPlanner::new();
        assert_eq!(planner.calculate_order_quantity(100.0, 120.0, 10.0), 0);
        assert_eq!(planner.calculate_order_quantity(100.0, 40.0, 10.0), 600);
        assert_eq!(planner.calculate_order_quantity(100.0, 99.95, 10.0), 1);
    }

    #[test]
    fn test_no_order_when_stock_covers_horizon() {
        let planner = ReorderPlanner::new();
        let forecasts = flat_forecast(8, 1.0);
        // 10000 件 / 1 件每天，8 周内远未触及安全库存
        let orders = planner.plan_orders(&params(10_000.0), &forecasts, monday(), 56);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_zero_demand_never_orders() {
        let planner = ReorderPlanner::new();
        let forecasts = flat_forecast(24, 0.0);
        let orders = planner.plan_orders(&params(0.0), &forecasts, monday(), 168);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_first_order_is_not_placed_before_today() {
        let planner = ReorderPlanner::new();
        let forecasts = flat_forecast(24, 10.0);
        let orders = planner.plan_orders(&params(300.0), &forecasts, monday(), 56);

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_date, monday());
        assert_eq!(orders[0].required_arrival_date, add_days(monday(), 80));
    }

    #[test]
    fn test_zero_lead_time_still_plans() {
        let planner = ReorderPlanner::new();
        let forecasts = flat_forecast(4, 10.0);
        let p = InventoryParams {
            safety_stock_days: 5.0,
            production_lead_time_days: 0,
            shipping_lead_time_days: 0,
            max_stock_days: 10.0,
            current_fba_stock: 50.0,
        };
        let orders = planner.plan_orders(&p, &forecasts, monday(), 14);

        assert!(!orders.is_empty());
        assert_eq!(orders[0].order_date, orders[0].required_arrival_date);
    }

    #[test]
    fn test_unvalidated_huge_lead_time_stops_without_panic() {
        let planner = ReorderPlanner::new();
        let forecasts = flat_forecast(24, 10.0);
        let p = InventoryParams {
            production_lead_time_days: 400_000_000,
            ..params(1200.0)
        };

        let orders = planner.plan_orders(&p, &forecasts, monday(), 168);

        assert_eq!(orders.len(), 1, "到货日钳制到日期上限后停止规划");
        assert_eq!(orders[0].required_arrival_date, NaiveDate::MAX);
    }
}
