// ==========================================
// FBA 补货推演系统 - 商品领域模型
// ==========================================
// 存储: product 表
// 列名沿用历史库结构 (shipping_lead_time 无 _days 后缀)
// ==========================================

use crate::domain::inventory::InventoryParams;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub name: String,
    pub safety_stock_days: f64,
    pub production_lead_time_days: u32,
    pub shipping_lead_time: u32,
    pub max_stock_days: f64,
    pub current_stock_units: f64,
}

impl Product {
    /// 商品记录 → 引擎参数
    pub fn inventory_params(&self) -> InventoryParams {
        InventoryParams {
            safety_stock_days: self.safety_stock_days,
            production_lead_time_days: self.production_lead_time_days,
            shipping_lead_time_days: self.shipping_lead_time,
            max_stock_days: self.max_stock_days,
            current_fba_stock: self.current_stock_units,
        }
    }
}

/// 新建/整体更新商品的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub safety_stock_days: f64,
    pub production_lead_time_days: u32,
    pub shipping_lead_time: u32,
    pub max_stock_days: f64,
    pub current_stock_units: f64,
}

impl NewProduct {
    pub fn from_params(name: &str, params: &InventoryParams) -> Self {
        Self {
            name: name.to_string(),
            safety_stock_days: params.safety_stock_days,
            production_lead_time_days: params.production_lead_time_days,
            shipping_lead_time: params.shipping_lead_time_days,
            max_stock_days: params.max_stock_days,
            current_stock_units: params.current_fba_stock,
        }
    }

    pub fn inventory_params(&self) -> InventoryParams {
        InventoryParams {
            safety_stock_days: self.safety_stock_days,
            production_lead_time_days: self.production_lead_time_days,
            shipping_lead_time_days: self.shipping_lead_time,
            max_stock_days: self.max_stock_days,
            current_fba_stock: self.current_stock_units,
        }
    }
}
