// ==========================================
// FBA 补货推演系统 - 引擎层
// ==========================================
// 职责: 补货规划 + 库存时间线推演 + 预测编辑
// 红线: Engine 不拼 SQL，不持有全局状态，参数显式传入
// ==========================================

pub mod calendar;
pub mod forecast_editor;
pub mod projection;
pub mod reorder_planner;
pub mod sales_window;
pub mod session;
pub mod timeline;

// 重导出核心引擎
pub use forecast_editor::{EditOutcome, EditRejection};
pub use projection::{ProjectionEngine, ProjectionResult, TimelineChangeGuard, TimelineUpdate};
pub use reorder_planner::ReorderPlanner;
pub use sales_window::average_daily_sales;
pub use session::{PlanningSession, SessionEdit};
pub use timeline::ForecastTimelineBuilder;
