// ==========================================
// FBA 补货推演系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod forecast;
pub mod inventory;
pub mod order;
pub mod product;
pub mod types;

// 重导出核心类型
pub use forecast::{ForecastOverride, WeeklyForecast, DAYS_PER_WEEK};
pub use inventory::{validate_horizon, InventoryParams, ParamsError, MAX_PLANNING_DAYS};
pub use order::{IncomingShipment, LowStockAlert, NewPlacedOrder, OrderShipment, PlacedOrder};
pub use product::{NewProduct, Product};
pub use types::{ForecastField, ParamField, StockStatus};
