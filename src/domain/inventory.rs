// ==========================================
// FBA 补货推演系统 - 库存参数领域模型
// ==========================================
// 职责: 单品补货参数 + 合法性校验
// 红线: 五个字段均为有限非负数；天数类字段不超过 MAX_PLANNING_DAYS
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 参数校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("参数必须为有限非负数 (field={field}): {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("天数超出上限 (field={field}): {value} > {max}")]
    DaysOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

/// 提前期 / 规划窗口的天数上限（十年）
pub const MAX_PLANNING_DAYS: u32 = 3650;

/// 校验规划窗口天数
pub fn validate_horizon(horizon_days: u32) -> Result<(), ParamsError> {
    if horizon_days > MAX_PLANNING_DAYS {
        return Err(ParamsError::DaysOutOfRange {
            field: "horizon_days",
            value: horizon_days,
            max: MAX_PLANNING_DAYS,
        });
    }
    Ok(())
}

// ==========================================
// InventoryParams - 库存参数
// ==========================================
// 归属: 商品记录 (product 表)
// 用途: 补货规划 + 时间线推演的唯一配置输入，按值传入引擎
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InventoryParams {
    pub safety_stock_days: f64,         // 安全库存天数 (按平均日销折算)
    pub production_lead_time_days: u32, // 下单 → 生产完成
    pub shipping_lead_time_days: u32,   // 发货 → 入仓可售
    pub max_stock_days: f64,            // 到货后库存上限天数
    pub current_fba_stock: f64,         // 推演起点库存 (件)
}

impl Default for InventoryParams {
    fn default() -> Self {
        Self {
            safety_stock_days: 45.0,
            production_lead_time_days: 30,
            shipping_lead_time_days: 50,
            max_stock_days: 100.0,
            current_fba_stock: 0.0,
        }
    }
}

impl InventoryParams {
    /// 总提前期（生产 + 运输），单位: 天
    pub fn total_lead_time_days(&self) -> u32 {
        self.production_lead_time_days
            .saturating_add(self.shipping_lead_time_days)
    }

    /// 按平均日销折算的安全库存件数
    pub fn safety_stock_units(&self, avg_daily_sales: f64) -> f64 {
        self.safety_stock_days * avg_daily_sales
    }

    /// 校验所有浮点字段为有限非负数，提前期不超过上限
    ///
    /// 整数天字段由类型保证非负
    pub fn validate(&self) -> Result<(), ParamsError> {
        let lead_times = [
            ("production_lead_time_days", self.production_lead_time_days),
            ("shipping_lead_time_days", self.shipping_lead_time_days),
        ];
        for (field, value) in lead_times {
            if value > MAX_PLANNING_DAYS {
                return Err(ParamsError::DaysOutOfRange {
                    field,
                    value,
                    max: MAX_PLANNING_DAYS,
                });
            }
        }

        let checks = [
            ("safety_stock_days", self.safety_stock_days),
            ("max_stock_days", self.max_stock_days),
            ("current_fba_stock", self.current_fba_stock),
        ];

        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError::InvalidValue { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_lead_time() {
        let params = InventoryParams {
            production_lead_time_days: 30,
            shipping_lead_time_days: 50,
            ..InventoryParams::default()
        };
        assert_eq!(params.total_lead_time_days(), 80);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let negative = InventoryParams {
            current_fba_stock: -1.0,
            ..InventoryParams::default()
        };
        assert_eq!(
            negative.validate(),
            Err(ParamsError::InvalidValue {
                field: "current_fba_stock",
                value: -1.0
            })
        );

        let nan = InventoryParams {
            max_stock_days: f64::NAN,
            ..InventoryParams::default()
        };
        assert!(nan.validate().is_err());

        assert!(InventoryParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_caps_lead_times_and_horizon() {
        let huge = InventoryParams {
            production_lead_time_days: 400_000_000,
            ..InventoryParams::default()
        };
        assert_eq!(
            huge.validate(),
            Err(ParamsError::DaysOutOfRange {
                field: "production_lead_time_days",
                value: 400_000_000,
                max: MAX_PLANNING_DAYS,
            })
        );

        let at_cap = InventoryParams {
            shipping_lead_time_days: MAX_PLANNING_DAYS,
            ..InventoryParams::default()
        };
        assert!(at_cap.validate().is_ok());

        assert!(validate_horizon(168).is_ok());
        assert!(validate_horizon(MAX_PLANNING_DAYS + 1).is_err());
    }
}
