// ==========================================
// FBA 补货推演系统 - 领域类型定义
// ==========================================
// 职责: 可编辑字段枚举、库存状态分级
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库存参数字段 (Param Field)
// ==========================================
// 用途: 参数表单逐字段编辑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamField {
    SafetyStockDays,         // 安全库存天数
    ProductionLeadTime,      // 生产周期(天)
    ShippingLeadTime,        // 头程运输周期(天)
    MaxStockDays,            // 最大库存天数
    CurrentFbaStock,         // 当前 FBA 库存
}

impl ParamField {
    /// 字段标识（与数据库列名一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamField::SafetyStockDays => "safety_stock_days",
            ParamField::ProductionLeadTime => "production_lead_time_days",
            ParamField::ShippingLeadTime => "shipping_lead_time",
            ParamField::MaxStockDays => "max_stock_days",
            ParamField::CurrentFbaStock => "current_stock_units",
        }
    }

    /// 是否为整数天字段
    pub fn is_whole_days(&self) -> bool {
        matches!(
            self,
            ParamField::ProductionLeadTime | ParamField::ShippingLeadTime
        )
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 周预测字段 (Forecast Field)
// ==========================================
// 仅这两列允许人工编辑，其余列均为推演结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastField {
    ForecastedDailySales, // 预测日销量
    IncomingShipments,    // 本周到货
}

impl fmt::Display for ForecastField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastField::ForecastedDailySales => write!(f, "FORECASTED_DAILY_SALES"),
            ForecastField::IncomingShipments => write!(f, "INCOMING_SHIPMENTS"),
        }
    }
}

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
// 用于预测表高亮：低于预警天数标红
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    Healthy, // 库存充足
    Low,     // 低于预警天数
    Out,     // 已断货 (库存 <= 0)
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Healthy => write!(f, "HEALTHY"),
            StockStatus::Low => write!(f, "LOW"),
            StockStatus::Out => write!(f, "OUT"),
        }
    }
}
