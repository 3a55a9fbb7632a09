// ==========================================
// FBA 补货推演系统 - 库存时间线推演
// ==========================================
// 职责: 合并到货事件 + 按周滚动推演周初库存与可售天数
// 输入: InventoryParams + 基础周预测 + 到货事件
// 输出: 新的 Vec<WeeklyForecast>（不修改输入）
// ==========================================
// 约束:
// - 第 0 周库存 = current_fba_stock
// - 第 i 周库存 = 上周库存 - 上周日销 × 7 + 本周到货
// - 日销为 0 时可售天数记为 0，不做除法
// ==========================================

use crate::domain::forecast::WeeklyForecast;
use crate::domain::inventory::InventoryParams;
use crate::domain::order::{IncomingShipment, OrderShipment};
use tracing::{debug, instrument};

// ==========================================
// ForecastTimelineBuilder - 时间线推演引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ForecastTimelineBuilder {}

impl ForecastTimelineBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 以补货建议为到货事件推演时间线
    pub fn build(
        &self,
        params: &InventoryParams,
        base_forecasts: &[WeeklyForecast],
        orders: &[OrderShipment],
    ) -> Vec<WeeklyForecast> {
        let shipments: Vec<IncomingShipment> = orders.iter().map(IncomingShipment::from).collect();
        self.build_with_shipments(params, base_forecasts, &shipments)
    }

    /// 以任意到货事件推演时间线
    ///
    /// 基础预测中已有的 incoming_shipments（人工录入）保留，到货事件叠加其上
    #[instrument(skip_all, fields(weeks = base_forecasts.len(), shipments = shipments.len()))]
    pub fn build_with_shipments(
        &self,
        params: &InventoryParams,
        base_forecasts: &[WeeklyForecast],
        shipments: &[IncomingShipment],
    ) -> Vec<WeeklyForecast> {
        let mut weeks = base_forecasts.to_vec();

        let mut unmatched = 0usize;
        for shipment in shipments {
            if !merge_shipment(&mut weeks, shipment) {
                unmatched += 1;
            }
        }
        if unmatched > 0 {
            debug!(unmatched, "到货日期超出预测范围，已忽略");
        }

        roll_forward(params.current_fba_stock, &mut weeks);
        weeks
    }
}

/// 把到货数量记入包含到货日的那一周
///
/// # 返回
/// - `true`: 找到对应周并已累加
/// - `false`: 到货日不在任何一周内
pub fn merge_shipment(weeks: &mut [WeeklyForecast], shipment: &IncomingShipment) -> bool {
    match weeks.iter_mut().find(|w| w.contains(shipment.arrival_date)) {
        Some(week) => {
            week.incoming_shipments += shipment.units;
            true
        }
        None => false,
    }
}

/// 从第 0 周开始滚动推演 amazon_inventory 与 days_of_stock
pub fn roll_forward(starting_stock: f64, weeks: &mut [WeeklyForecast]) {
    let mut previous: Option<(f64, f64)> = None; // (上周库存, 上周消耗)

    for week in weeks.iter_mut() {
        week.amazon_inventory = match previous {
            None => starting_stock,
            Some((inventory, consumption)) => inventory - consumption + week.incoming_shipments,
        };
        week.days_of_stock = days_of_stock(week.amazon_inventory, week.forecasted_daily_sales);
        previous = Some((week.amazon_inventory, week.weekly_consumption()));
    }
}

/// 可售天数（日销 <= 0 时为 0）
pub fn days_of_stock(inventory: f64, daily_sales: f64) -> f64 {
    if daily_sales > 0.0 {
        inventory / daily_sales
    } else {
        0.0
    }
}
