// ==========================================
// FBA 补货推演系统 - 核心库
// ==========================================
// 系统定位: 单品补货决策支持（人工最终控制权）
// 技术栈: Rust + SQLite
// 核心流程: 周预测 → 补货规划 → 库存时间线推演
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 补货规划与推演
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ForecastField, ParamField, StockStatus};

// 领域实体
pub use domain::{
    ForecastOverride, IncomingShipment, InventoryParams, LowStockAlert, NewPlacedOrder,
    NewProduct, OrderShipment, PlacedOrder, Product, WeeklyForecast,
};

// 引擎
pub use engine::{
    ForecastTimelineBuilder, PlanningSession, ProjectionEngine, ProjectionResult,
    ReorderPlanner,
};

// API
pub use api::{ApiError, ApiResult, PlanningApi, ProductApi};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "FBA 补货推演系统";
