// ==========================================
// FBA 补货推演系统 - 订单/发货领域模型
// ==========================================
// 职责: 规划器产出的补货建议 + 已下单的持久化订单
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// LowStockAlert - 低库存预警
// ==========================================
// 触发: 到货前预计库存跌破安全库存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub days_of_stock_remaining: i64, // floor(到货时库存 / 平均日销)，可为负
    pub projected_inventory: f64,     // 到货时预计库存 (件)
}

impl fmt::Display for LowStockAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "低库存预警: 到货时预计仅剩 {} 天库存",
            self.days_of_stock_remaining
        )
    }
}

// ==========================================
// OrderShipment - 补货建议
// ==========================================
// 约束:
// - ship_date = order_date + 生产周期
// - required_arrival_date = ship_date + 运输周期
// - order_quantity == ship_quantity (不建模分批发货)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderShipment {
    pub order_date: NaiveDate,
    pub order_quantity: u64,
    pub ship_date: NaiveDate,
    pub ship_quantity: u64,
    pub required_arrival_date: NaiveDate,
    pub low_stock_alert: Option<LowStockAlert>,
}

impl OrderShipment {
    /// 下单到到货的天数
    pub fn lead_time_days(&self) -> i64 {
        (self.required_arrival_date - self.order_date).num_days()
    }
}

// ==========================================
// PlacedOrder - 已下单订单
// ==========================================
// 存储: product_order 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub product_id: i64,
    pub units: i64,
    pub expected_arrival_date: NaiveDate,
}

/// 新建/更新订单的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlacedOrder {
    pub product_id: i64,
    pub units: i64,
    pub expected_arrival_date: NaiveDate,
}

// ==========================================
// IncomingShipment - 到货事件
// ==========================================
// 时间线推演只关心 "哪天到、到多少"，规划建议与已下单订单统一转换为此结构
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomingShipment {
    pub arrival_date: NaiveDate,
    pub units: f64,
}

impl From<&OrderShipment> for IncomingShipment {
    fn from(order: &OrderShipment) -> Self {
        Self {
            arrival_date: order.required_arrival_date,
            units: order.ship_quantity as f64,
        }
    }
}

impl From<&PlacedOrder> for IncomingShipment {
    fn from(order: &PlacedOrder) -> Self {
        Self {
            arrival_date: order.expected_arrival_date,
            units: order.units as f64,
        }
    }
}
