// ==========================================
// FBA 补货推演系统 - 配置层
// ==========================================
// 职责: 全局规划配置的加载、查询与覆写
// 存储: config_kv 表 (scope_id = 'global')
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, ConfigManager, PlanningConfig};
