// ==========================================
// FBA 补货推演系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::inventory::validate_horizon;
use crate::engine::calendar::parse_weekday;
use chrono::Weekday;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 配置键
pub mod config_keys {
    /// 规划窗口（天）
    pub const HORIZON_DAYS: &str = "horizon_days";
    /// 种子预测周数
    pub const SEED_WEEKS: &str = "seed_weeks";
    /// 种子预测的默认日销
    pub const DEFAULT_DAILY_SALES: &str = "default_daily_sales";
    /// 周起始日 (MON / SUN ...)
    pub const WEEK_START: &str = "week_start";
    /// 库存天数预警阈值
    pub const DAYS_OF_STOCK_WARNING: &str = "days_of_stock_warning";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// PlanningConfig - 规划配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub horizon_days: u32,
    pub seed_weeks: u32,
    pub default_daily_sales: f64,
    pub week_start: Weekday,
    pub days_of_stock_warning: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            horizon_days: 168,
            seed_weeks: 24,
            default_daily_sales: 10.0,
            week_start: Weekday::Mon,
            days_of_stock_warning: 45.0,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入（或覆盖）global scope 的配置值
    pub fn upsert_config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 读取数值配置，缺失或无法解析时回退默认值
    fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: std::str::FromStr + Copy,
    {
        match self.get_global_config_value(key)? {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(key, raw = %raw, "配置值无法解析，使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 规划窗口天数，超过 MAX_PLANNING_DAYS 时回退默认值
    pub fn get_horizon_days(&self) -> Result<u32, Box<dyn Error>> {
        let default = PlanningConfig::default().horizon_days;
        let value = self.get_parsed_or(config_keys::HORIZON_DAYS, default)?;
        if let Err(e) = validate_horizon(value) {
            warn!(error = %e, "规划窗口非法，使用默认值");
            return Ok(default);
        }
        Ok(value)
    }

    pub fn get_seed_weeks(&self) -> Result<u32, Box<dyn Error>> {
        self.get_parsed_or(config_keys::SEED_WEEKS, PlanningConfig::default().seed_weeks)
    }

    pub fn get_default_daily_sales(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_parsed_or(
            config_keys::DEFAULT_DAILY_SALES,
            PlanningConfig::default().default_daily_sales,
        )?;
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            warn!(value, "默认日销非法，使用默认值");
            Ok(PlanningConfig::default().default_daily_sales)
        }
    }

    pub fn get_week_start(&self) -> Result<Weekday, Box<dyn Error>> {
        let default = PlanningConfig::default().week_start;
        Ok(match self.get_global_config_value(config_keys::WEEK_START)? {
            Some(raw) => parse_weekday(&raw).unwrap_or_else(|| {
                warn!(raw = %raw, "周起始日无法解析，使用默认值");
                default
            }),
            None => default,
        })
    }

    pub fn get_days_of_stock_warning(&self) -> Result<f64, Box<dyn Error>> {
        self.get_parsed_or(
            config_keys::DAYS_OF_STOCK_WARNING,
            PlanningConfig::default().days_of_stock_warning,
        )
    }

    /// 一次性加载全部规划配置
    pub fn load_planning_config(&self) -> Result<PlanningConfig, Box<dyn Error>> {
        Ok(PlanningConfig {
            horizon_days: self.get_horizon_days()?,
            seed_weeks: self.get_seed_weeks()?,
            default_daily_sales: self.get_default_daily_sales()?,
            week_start: self.get_week_start()?,
            days_of_stock_warning: self.get_days_of_stock_warning()?,
        })
    }

    /// 获取所有 global 配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }
}
