// ==========================================
// 规划 API 集成测试
// ==========================================
// 测试目标: AppState 装配 → 商品/订单 → 推演 → 编辑持久化
// ==========================================


use fba_replenishment::api::{ApiError, DEFAULT_RECENT_ORDERS};
use fba_replenishment::app::AppState;
use fba_replenishment::config::config_keys;
use fba_replenishment::domain::{ForecastField, NewPlacedOrder, ParamField, StockStatus};
use fba_replenishment::engine::calendar::add_days;
use fba_replenishment::engine::TimelineUpdate;
use fba_replenishment::logging;
use tempfile::NamedTempFile;
use test_helpers::{monday, new_product};

fn setup() -> (NamedTempFile, AppState) {
    logging::init_test();
    let (temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    (temp_file, state)
}

fn create_widget(state: &AppState) -> i64 {
    state
        .product_api
        .create_product(&new_product("Widget", 1200.0))
        .expect("Failed to create product")
        .id
}

#[test]
fn test_projection_with_default_config() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);

    let projection = state.planning_api.get_projection(product_id, monday()).unwrap();

    assert_eq!(projection.timeline.len(), 24, "默认种子 24 周");
    assert_eq!(projection.stock_status.len(), projection.timeline.len());
    assert_eq!(projection.orders.len(), 3, "168 天窗口内三笔补货");
    assert_eq!(projection.orders[0].order_date, monday());
    assert!(projection.orders[0].low_stock_alert.is_some());
    assert_eq!(projection.timeline[0].amazon_inventory, 1200.0);
    assert_eq!(projection.timeline[11].incoming_shipments, 600.0);
    assert_eq!(projection.first_low_stock_week, None, "默认阈值 45 天下无低库存周");
}

#[test]
fn test_warning_threshold_from_config() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);
    state
        .config_manager
        .upsert_config(config_keys::DAYS_OF_STOCK_WARNING, "60")
        .unwrap();

    let projection = state.planning_api.get_projection(product_id, monday()).unwrap();

    // 第 9 周库存 570 件 = 57 天
    assert_eq!(projection.first_low_stock_week, Some(add_days(monday(), 63)));
    assert_eq!(projection.stock_status[8], StockStatus::Healthy);
    assert_eq!(projection.stock_status[9], StockStatus::Low);
}

#[test]
fn test_forecast_edit_is_persisted() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);

    let mut session = state.planning_api.open_session(product_id, monday()).unwrap();
    let edit = state
        .planning_api
        .edit_forecast(&mut session, 3, ForecastField::ForecastedDailySales, "20")
        .unwrap();
    assert!(edit.outcome.is_applied());
    assert_eq!(edit.update, Some(TimelineUpdate::Changed));

    // 到货编辑只影响内存会话
    state
        .planning_api
        .edit_forecast(&mut session, 4, ForecastField::IncomingShipments, "100")
        .unwrap();
    assert_eq!(session.timeline()[4].incoming_shipments, 100.0);

    let reopened = state.planning_api.open_session(product_id, monday()).unwrap();
    assert_eq!(reopened.base_forecasts()[3].forecasted_daily_sales, 20.0, "日销覆写应持久化");
    assert_eq!(reopened.base_forecasts()[4].incoming_shipments, 0.0, "到货编辑不持久化");

    assert_eq!(state.planning_api.reset_forecasts(product_id).unwrap(), 1);
    let reset = state.planning_api.open_session(product_id, monday()).unwrap();
    assert_eq!(reset.base_forecasts()[3].forecasted_daily_sales, 10.0);
}

#[test]
fn test_fill_down_persists_tail() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);

    let mut session = state.planning_api.open_session(product_id, monday()).unwrap();
    state
        .planning_api
        .edit_forecast(&mut session, 20, ForecastField::ForecastedDailySales, "4")
        .unwrap();
    let edit = state.planning_api.fill_down(&mut session, 20).unwrap();
    assert_eq!(edit.upserts.len(), 4);

    let reopened = state.planning_api.open_session(product_id, monday()).unwrap();
    let sales: Vec<f64> = reopened
        .base_forecasts()
        .iter()
        .map(|w| w.forecasted_daily_sales)
        .collect();
    assert!(sales[..20].iter().all(|s| *s == 10.0));
    assert!(sales[20..].iter().all(|s| *s == 4.0));
}

#[test]
fn test_param_edit_updates_product() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);
    let mut session = state.planning_api.open_session(product_id, monday()).unwrap();

    let edit = state
        .planning_api
        .update_param(&mut session, ParamField::ShippingLeadTime, "40")
        .unwrap();
    assert!(edit.outcome.is_applied());
    assert_eq!(state.product_api.get_product(product_id).unwrap().shipping_lead_time, 40);

    let edit = state
        .planning_api
        .update_param(&mut session, ParamField::ShippingLeadTime, "forty")
        .unwrap();
    assert!(!edit.outcome.is_applied(), "非法参数不生效");
    assert_eq!(state.product_api.get_product(product_id).unwrap().shipping_lead_time, 40);
    assert_eq!(session.params().shipping_lead_time_days, 40);
}

#[test]
fn test_placed_orders_merge_into_timeline() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);
    let mut session = state.planning_api.open_session(product_id, monday()).unwrap();
    let planned_before = session.orders().to_vec();

    for units in [100, 200, 500] {
        state
            .product_api
            .create_order(&NewPlacedOrder {
                product_id,
                units,
                expected_arrival_date: add_days(monday(), 15),
            })
            .unwrap();
    }

    let update = state.planning_api.refresh_placed_orders(&mut session).unwrap();
    assert_eq!(update, TimelineUpdate::Changed);
    assert_eq!(session.timeline()[2].incoming_shipments, 800.0, "已下单订单叠加到第 2 周");
    assert_eq!(session.orders(), planned_before.as_slice(), "规划不受已下单订单影响");

    let recent = state
        .product_api
        .recent_orders(product_id, DEFAULT_RECENT_ORDERS)
        .unwrap();
    let units: Vec<i64> = recent.iter().map(|o| o.units).collect();
    assert_eq!(units, vec![500, 200, 100], "最新订单在前");
}

#[test]
fn test_order_validation() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);

    let err = state
        .product_api
        .create_order(&NewPlacedOrder {
            product_id,
            units: 0,
            expected_arrival_date: monday(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)), "数量为 0 应被拒绝");

    let err = state
        .product_api
        .create_order(&NewPlacedOrder {
            product_id: product_id + 1000,
            units: 10,
            expected_arrival_date: monday(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "商品不存在");

    let order = state
        .product_api
        .create_order(&NewPlacedOrder {
            product_id,
            units: 10,
            expected_arrival_date: monday(),
        })
        .unwrap();
    let updated = state
        .product_api
        .update_order(order.id, 25, add_days(monday(), 7))
        .unwrap();
    assert_eq!(updated.units, 25);
    state.product_api.delete_order(order.id).unwrap();
    assert!(state.product_api.list_orders(product_id).unwrap().is_empty());
}

#[test]
fn test_invalid_product_rejected() {
    let (_tmp, state) = setup();

    let mut input = new_product("  ", 100.0);
    assert!(matches!(
        state.product_api.create_product(&input).unwrap_err(),
        ApiError::InvalidInput(_)
    ));

    input.name = "Widget".to_string();
    input.max_stock_days = f64::NAN;
    assert!(matches!(
        state.product_api.create_product(&input).unwrap_err(),
        ApiError::ValidationError(_)
    ));
    assert!(state.product_api.list_products().unwrap().is_empty());
}

#[test]
fn test_oversized_lead_time_never_reaches_planner() {
    let (_tmp, state) = setup();

    let mut input = new_product("Widget", 1200.0);
    input.production_lead_time_days = 400_000_000;
    assert!(
        matches!(
            state.product_api.create_product(&input).unwrap_err(),
            ApiError::ValidationError(_)
        ),
        "新建商品时提前期超限应被拒绝"
    );

    let product_id = create_widget(&state);
    let mut session = state.planning_api.open_session(product_id, monday()).unwrap();
    let before = session.result().clone();
    let edit = state
        .planning_api
        .update_param(&mut session, ParamField::ProductionLeadTime, "400000000")
        .unwrap();
    assert!(!edit.outcome.is_applied(), "参数表单超限输入不生效");
    assert_eq!(session.result(), &before);
    assert_eq!(
        state.product_api.get_product(product_id).unwrap().production_lead_time_days,
        30
    );

    // 绕过 API 直接写入的超限记录，打开会话时报错而不是崩溃
    let conn = test_helpers::open_test_connection(&state.db_path).unwrap();
    conn.execute(
        "UPDATE product SET production_lead_time_days = 400000000 WHERE id = ?1",
        [product_id],
    )
    .unwrap();
    assert!(matches!(
        state.planning_api.open_session(product_id, monday()).unwrap_err(),
        ApiError::ValidationError(_)
    ));
}

#[test]
fn test_config_read_failure_carries_context() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);

    let conn = test_helpers::open_test_connection(&state.db_path).unwrap();
    conn.execute_batch("DROP TABLE config_kv;").unwrap();

    let err = state.planning_api.get_projection(product_id, monday()).unwrap_err();
    match err {
        ApiError::Other(inner) => {
            assert_eq!(inner.to_string(), "加载规划配置失败");
            assert!(
                format!("{:#}", inner).contains("config_kv"),
                "错误链应保留底层 SQLite 消息: {:#}",
                inner
            );
        }
        other => panic!("Expected Other, got {:?}", other),
    }
}

#[test]
fn test_persistence_failure_keeps_session_state() {
    let (_tmp, state) = setup();
    let product_id = create_widget(&state);
    let mut session = state.planning_api.open_session(product_id, monday()).unwrap();

    state.product_api.delete_product(product_id).unwrap();

    let err = state
        .planning_api
        .edit_forecast(&mut session, 1, ForecastField::ForecastedDailySales, "30")
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)), "外键约束失败");
    assert_eq!(
        session.base_forecasts()[1].forecasted_daily_sales,
        30.0,
        "持久化失败不回滚内存状态"
    );

    assert!(matches!(
        state.planning_api.open_session(product_id, monday()).unwrap_err(),
        ApiError::NotFound(_)
    ));
}
