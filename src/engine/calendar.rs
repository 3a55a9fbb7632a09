// ==========================================
// FBA 补货推演系统 - 日期工具
// ==========================================
// 职责: 周起始日对齐、按天偏移、区间重叠天数
// 粒度: 全部按自然日 (NaiveDate)，不涉及时区
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 日期按天偏移（可为负），超出可表示范围时返回 None
pub fn checked_add_days(day: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| day.checked_add_signed(delta))
}

/// 日期按天偏移（可为负），溢出时钳制到 NaiveDate::MIN / MAX
pub fn add_days(day: NaiveDate, days: i64) -> NaiveDate {
    checked_add_days(day, days).unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// from → to 的天数差
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// 所在周的周起始日
///
/// # 参数
/// - `day`: 任意日期
/// - `week_start`: 周起始星期（默认周一）
pub fn week_start(day: NaiveDate, week_start: Weekday) -> NaiveDate {
    let current = i64::from(day.weekday().num_days_from_monday());
    let start = i64::from(week_start.num_days_from_monday());
    let offset = (current - start).rem_euclid(7);
    add_days(day, -offset)
}

/// 两个半开区间 [a_start, a_end) 与 [b_start, b_end) 的重叠天数
///
/// 无重叠返回 0
pub fn overlap_days(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> i64 {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    days_between(start, end).max(0)
}

/// 解析配置中的周起始星期 ("MON" / "Monday" / "sun" ...)
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    raw.trim().parse::<Weekday>().ok()
}
