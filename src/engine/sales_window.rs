// ==========================================
// FBA 补货推演系统 - 区间平均日销
// ==========================================
// 职责: 计算任意日期区间内的加权平均日销量
// 说明: 提前期窗口很少与周边界对齐，按重叠天数加权
// ==========================================

use crate::domain::forecast::{WeeklyForecast, DAYS_PER_WEEK};
use crate::engine::calendar::{add_days, overlap_days};
use chrono::NaiveDate;

/// 区间 [start, end) 的加权平均日销量
///
/// # 规则
/// - 每个与区间重叠的周累加 `日销 × 重叠天数` 与 `重叠天数`
/// - 无任何重叠周时返回 0.0（调用方需对 0 单独处理）
pub fn average_daily_sales(start: NaiveDate, end: NaiveDate, forecasts: &[WeeklyForecast]) -> f64 {
    if end <= start {
        return 0.0;
    }

    let mut weighted_sales = 0.0;
    let mut covered_days: i64 = 0;

    for week in forecasts {
        let week_end_exclusive = add_days(week.date, DAYS_PER_WEEK);
        let overlap = overlap_days(start, end, week.date, week_end_exclusive);
        if overlap == 0 {
            continue;
        }
        weighted_sales += week.forecasted_daily_sales * overlap as f64;
        covered_days += overlap;
    }

    if covered_days == 0 {
        0.0
    } else {
        weighted_sales / covered_days as f64
    }
}
