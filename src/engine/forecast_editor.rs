// ==========================================
// FBA 补货推演系统 - 周预测编辑
// ==========================================
// 职责:
// 1. 生成默认恒定日销的周预测种子
// 2. 叠加持久化的人工覆写
// 3. 单点编辑 / 向下填充
// 红线: 非法输入在边界处拒绝，不修改任何状态
// ==========================================

use crate::domain::forecast::{ForecastOverride, WeeklyForecast, DAYS_PER_WEEK};
use crate::domain::inventory::MAX_PLANNING_DAYS;
use crate::domain::types::ForecastField;
use crate::engine::calendar::{add_days, week_start};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ==========================================
// 编辑结果
// ==========================================

/// 编辑被拒绝的原因
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditRejection {
    #[error("无法解析为数字: {0:?}")]
    NotANumber(String),

    #[error("不允许负数: {0}")]
    Negative(f64),

    #[error("天数必须为整数: {0}")]
    NotWholeDays(f64),

    #[error("天数超出上限: {value} > {max}")]
    TooManyDays { value: f64, max: u32 },

    #[error("周索引越界: index={index}, len={len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 编辑结果
///
/// 被拒绝的编辑不是错误，只是不生效
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditOutcome {
    Applied,
    Rejected(EditRejection),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

// ==========================================
// 输入解析
// ==========================================

/// 解析有限非负数
pub fn parse_non_negative(raw: &str) -> Result<f64, EditRejection> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| EditRejection::NotANumber(raw.to_string()))?;

    if !value.is_finite() {
        return Err(EditRejection::NotANumber(raw.to_string()));
    }
    if value < 0.0 {
        return Err(EditRejection::Negative(value));
    }
    Ok(value)
}

/// 解析非负整数天数
pub fn parse_whole_days(raw: &str) -> Result<u32, EditRejection> {
    let value = parse_non_negative(raw)?;
    if value.fract() != 0.0 {
        return Err(EditRejection::NotWholeDays(value));
    }
    if value > f64::from(MAX_PLANNING_DAYS) {
        return Err(EditRejection::TooManyDays {
            value,
            max: MAX_PLANNING_DAYS,
        });
    }
    Ok(value as u32)
}

// ==========================================
// 种子与覆写
// ==========================================

/// 生成恒定日销的周预测
///
/// 第一周从 today 所在周的周起始日开始
pub fn seed_forecasts(
    today: NaiveDate,
    first_weekday: Weekday,
    weeks: u32,
    daily_sales: f64,
) -> Vec<WeeklyForecast> {
    let first = week_start(today, first_weekday);
    (0..i64::from(weeks))
        .map(|i| WeeklyForecast::new(add_days(first, i * DAYS_PER_WEEK), daily_sales))
        .collect()
}

/// 用持久化覆写替换对应周的日销量
///
/// # 返回
/// 实际命中的周数（覆写日期不在序列内则忽略）
pub fn apply_overrides(forecasts: &mut [WeeklyForecast], overrides: &[ForecastOverride]) -> usize {
    let by_week: HashMap<NaiveDate, f64> = overrides
        .iter()
        .map(|o| (o.week_start_date, o.daily_forecasted_sales))
        .collect();

    let mut applied = 0;
    for week in forecasts.iter_mut() {
        if let Some(sales) = by_week.get(&week.date) {
            week.forecasted_daily_sales = *sales;
            applied += 1;
        }
    }
    applied
}

// ==========================================
// 编辑操作
// ==========================================

/// 单点编辑: 设置第 index 周的日销或到货
pub fn set_forecast_value(
    forecasts: &mut [WeeklyForecast],
    index: usize,
    field: ForecastField,
    raw: &str,
) -> EditOutcome {
    let len = forecasts.len();
    let Some(week) = forecasts.get_mut(index) else {
        return EditOutcome::Rejected(EditRejection::IndexOutOfRange { index, len });
    };

    let value = match parse_non_negative(raw) {
        Ok(v) => v,
        Err(rejection) => return EditOutcome::Rejected(rejection),
    };

    match field {
        ForecastField::ForecastedDailySales => week.forecasted_daily_sales = value,
        ForecastField::IncomingShipments => week.incoming_shipments = value,
    }
    EditOutcome::Applied
}

/// 向下填充: 第 index 周当前日销复制到 index..末尾
///
/// 0..index 的周不受影响
pub fn fill_down(forecasts: &mut [WeeklyForecast], index: usize) -> EditOutcome {
    let len = forecasts.len();
    let Some(value) = forecasts.get(index).map(|w| w.forecasted_daily_sales) else {
        return EditOutcome::Rejected(EditRejection::IndexOutOfRange { index, len });
    };

    for week in &mut forecasts[index..] {
        week.forecasted_daily_sales = value;
    }
    EditOutcome::Applied
}

/// 为 forecasts[range] 生成 upsert 指令
pub fn overrides_for(
    product_id: i64,
    forecasts: &[WeeklyForecast],
    range: std::ops::Range<usize>,
) -> Vec<ForecastOverride> {
    forecasts
        .get(range)
        .unwrap_or(&[])
        .iter()
        .map(|week| ForecastOverride::from_week(product_id, week))
        .collect()
}
