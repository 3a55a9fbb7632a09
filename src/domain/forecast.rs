// ==========================================
// FBA 补货推演系统 - 周销量预测领域模型
// ==========================================
// 职责: 周粒度预测行 + 持久化的人工预测覆写
// ==========================================

use crate::domain::types::StockStatus;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 每周天数
pub const DAYS_PER_WEEK: i64 = 7;

// ==========================================
// WeeklyForecast - 周预测行
// ==========================================
// 约束: 序列按 date 严格递增，步长 7 天
// 派生字段: amazon_inventory / days_of_stock 由时间线推演写入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyForecast {
    pub date: NaiveDate,             // 周起始日
    pub incoming_shipments: f64,     // 本周到货 (件)
    pub amazon_inventory: f64,       // 周初库存 (推演)
    pub forecasted_daily_sales: f64, // 预测日销量 (件/天)
    pub days_of_stock: f64,          // 可售天数 (推演)
}

impl WeeklyForecast {
    /// 创建一条只含日期与日销量的预测行
    pub fn new(date: NaiveDate, forecasted_daily_sales: f64) -> Self {
        Self {
            date,
            incoming_shipments: 0.0,
            amazon_inventory: 0.0,
            forecasted_daily_sales,
            days_of_stock: 0.0,
        }
    }

    /// 本周最后一天 (date + 6)
    pub fn week_end(&self) -> NaiveDate {
        self.date
            .checked_add_signed(Duration::days(DAYS_PER_WEEK - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// 日期是否落在 [date, date+6]
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.date && day <= self.week_end()
    }

    /// 本周预测消耗量
    pub fn weekly_consumption(&self) -> f64 {
        self.forecasted_daily_sales * DAYS_PER_WEEK as f64
    }

    /// 所有数值字段是否有限
    pub fn is_finite(&self) -> bool {
        self.incoming_shipments.is_finite()
            && self.amazon_inventory.is_finite()
            && self.forecasted_daily_sales.is_finite()
            && self.days_of_stock.is_finite()
    }

    /// 按预警天数判定库存状态
    pub fn stock_status(&self, warning_days: f64) -> StockStatus {
        if self.amazon_inventory <= 0.0 {
            StockStatus::Out
        } else if self.days_of_stock < warning_days {
            StockStatus::Low
        } else {
            StockStatus::Healthy
        }
    }
}

// ==========================================
// ForecastOverride - 人工预测覆写
// ==========================================
// 存储: weekly_forecasted_sales 表
// 唯一键: (product_id, week_start_date)，重复保存即覆盖
// 同时作为编辑操作产出的 upsert 指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOverride {
    pub product_id: i64,
    pub week_start_date: NaiveDate,
    pub daily_forecasted_sales: f64,
}

impl ForecastOverride {
    /// 从预测行生成覆写记录
    pub fn from_week(product_id: i64, week: &WeeklyForecast) -> Self {
        Self {
            product_id,
            week_start_date: week.date,
            daily_forecasted_sales: week.forecasted_daily_sales,
        }
    }
}
