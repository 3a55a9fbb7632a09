// ==========================================
// FBA 补货推演系统 - 数据仓储层
// ==========================================
// 职责: 数据访问，不含业务逻辑
// 红线: Repository 不含引擎逻辑
// ==========================================

pub mod error;
pub mod forecast_repo;
pub mod order_repo;
pub mod product_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use forecast_repo::ForecastRepository;
pub use order_repo::OrderRepository;
pub use product_repo::ProductRepository;
