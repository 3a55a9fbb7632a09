// ==========================================
// FBA 补货推演系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{PlanningApi, ProductApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{ForecastRepository, OrderRepository, ProductRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FBA_REPLENISHMENT_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 商品与订单API
    pub product_api: Arc<ProductApi>,

    /// 规划API
    pub planning_api: Arc<PlanningApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并幂等建表
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let forecast_repo = Arc::new(ForecastRepository::from_connection(conn.clone()));
        let order_repo = Arc::new(OrderRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let product_api = Arc::new(ProductApi::new(product_repo.clone(), order_repo.clone()));
        let planning_api = Arc::new(PlanningApi::new(
            product_repo,
            forecast_repo,
            order_repo,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            product_api,
            planning_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先读取环境变量 FBA_REPLENISHMENT_DB_PATH，否则使用用户数据目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("fba-replenishment");

    if let Err(e) = std::fs::create_dir_all(&path) {
        tracing::warn!("无法创建数据目录 {}: {}", path.display(), e);
    }

    path.push("fba_replenishment.db");
    path.to_string_lossy().to_string()
}
