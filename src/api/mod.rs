// ==========================================
// FBA 补货推演系统 - API 层
// ==========================================
// 职责: 业务接口，组合仓储与引擎，供宿主应用调用
// ==========================================

pub mod error;
pub mod planning_api;
pub mod product_api;

pub use error::{ApiError, ApiResult};
pub use planning_api::{PlanningApi, ProductProjection};
pub use product_api::{ProductApi, DEFAULT_RECENT_ORDERS};
