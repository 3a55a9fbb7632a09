// ==========================================
// 库存时间线推演测试
// ==========================================
// 测试目标: 幂等性、零需求有限性、补货到货合并、向下填充
// ==========================================


use fba_replenishment::domain::ForecastField;
use fba_replenishment::engine::calendar::add_days;
use fba_replenishment::engine::{
    ForecastTimelineBuilder, PlanningSession, ProjectionEngine, ReorderPlanner, TimelineUpdate,
};
use test_helpers::{flat_forecasts, monday, params_with_stock};

#[test]
fn test_pipeline_is_idempotent() {
    let engine = ProjectionEngine::new();
    let base = flat_forecasts(monday(), 24, 10.0);
    let params = params_with_stock(1200.0);

    let first = engine.run(&params, &base, &[], monday(), 168);
    let second = engine.run(&params, &base, &[], monday(), 168);

    assert_eq!(first, second, "两次推演结果应完全一致");
    assert!(
        base.iter().all(|w| w.incoming_shipments == 0.0 && w.amazon_inventory == 0.0),
        "推演不得修改输入"
    );
}

#[test]
fn test_planner_orders_land_in_arrival_week() {
    let planner = ReorderPlanner::new();
    let builder = ForecastTimelineBuilder::new();
    let base = flat_forecasts(monday(), 24, 10.0);
    let params = params_with_stock(1200.0);

    let orders = planner.plan_orders(&params, &base, monday(), 56);
    let timeline = builder.build(&params, &base, &orders);

    // 到货日 = 第 80 天，落在第 11 周 (77..=83)
    assert_eq!(timeline[11].incoming_shipments, 600.0);
    assert_eq!(timeline[0].amazon_inventory, 1200.0, "第 0 周库存 = 当前库存");
    assert_eq!(timeline[10].amazon_inventory, 500.0);
    assert_eq!(timeline[11].amazon_inventory, 500.0 - 70.0 + 600.0);
    assert_eq!(timeline[10].days_of_stock, 50.0);
}

#[test]
fn test_zero_demand_timeline_is_finite() {
    let engine = ProjectionEngine::new();
    let base = flat_forecasts(monday(), 24, 0.0);

    let result = engine.run(&params_with_stock(0.0), &base, &[], monday(), 168);

    assert!(result.orders.is_empty());
    assert!(result.is_finite(), "零需求时间线不得出现 NaN/Infinity");
    assert!(result.timeline.iter().all(|w| w.days_of_stock == 0.0));
}

#[test]
fn test_shipment_outside_horizon_is_ignored() {
    let builder = ForecastTimelineBuilder::new();
    let base = flat_forecasts(monday(), 4, 1.0);
    let params = params_with_stock(100.0);

    let shipments = [fba_replenishment::IncomingShipment {
        arrival_date: add_days(monday(), 400),
        units: 999.0,
    }];
    let timeline = builder.build_with_shipments(&params, &base, &shipments);

    assert!(timeline.iter().all(|w| w.incoming_shipments == 0.0));
    assert_eq!(timeline[3].amazon_inventory, 100.0 - 21.0);
}

#[test]
fn test_fill_down_through_session() {
    let mut session = PlanningSession::new(
        1,
        params_with_stock(1200.0),
        flat_forecasts(monday(), 24, 10.0),
        Vec::new(),
        monday(),
        168,
    );

    let edit = session.edit_forecast(5, ForecastField::ForecastedDailySales, "15");
    assert!(edit.outcome.is_applied());

    let edit = session.fill_down(5);
    assert!(edit.outcome.is_applied());
    assert_eq!(edit.update, Some(TimelineUpdate::Changed));
    assert_eq!(edit.upserts.len(), 19, "第 5 周至末尾共 19 周");

    let base = session.base_forecasts();
    assert!(base[..5].iter().all(|w| w.forecasted_daily_sales == 10.0), "填充起点之前不变");
    assert!(base[5..].iter().all(|w| w.forecasted_daily_sales == 15.0));

    // 重复填充不改变时间线
    let edit = session.fill_down(5);
    assert_eq!(edit.update, Some(TimelineUpdate::Unchanged));
}

#[test]
fn test_invalid_edit_is_not_applied() {
    let mut session = PlanningSession::new(
        1,
        params_with_stock(1200.0),
        flat_forecasts(monday(), 24, 10.0),
        Vec::new(),
        monday(),
        168,
    );
    let before = session.result().clone();

    for raw in ["abc", "-5", "NaN", ""] {
        let edit = session.edit_forecast(2, ForecastField::IncomingShipments, raw);
        assert!(!edit.outcome.is_applied(), "非法输入 {:?} 不应生效", raw);
        assert!(edit.upserts.is_empty());
    }
    assert!(!session.fill_down(99).outcome.is_applied(), "越界填充应被拒绝");

    assert_eq!(session.result(), &before, "非法编辑不改变推演结果");
}
