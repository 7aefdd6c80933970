//! Engine configuration
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | ORDER_NUMBER_PREFIX | AMR | 订单号前缀 |
//! | MAX_ITEM_QUANTITY | 99 | 单项最大数量 |
//! | SAVE_TIMEOUT_MS | 10000 | 远程写入超时(毫秒) |
//! | ORDER_SOURCE | web | 订单来源 |
//! | ORDER_LOCALE | id-ID | 区域设置 |
//! | OWNER_FETCH_LIMIT | 20 | 按用户查询的默认条数 |

#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix for client-generated order numbers
    pub order_number_prefix: String,
    /// Cap on a single cart entry's quantity; updates above it are
    /// rejected (no-op), never clamped
    pub max_item_quantity: u32,
    /// Remote write timeout in milliseconds. A hung write fails with
    /// `PersistenceError::Timeout` instead of pending forever.
    pub save_timeout_ms: u64,
    /// Originating surface recorded in order metadata
    pub order_source: String,
    /// Locale recorded in order metadata
    pub order_locale: String,
    /// Default fetch size for by-owner history queries
    pub owner_fetch_limit: usize,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            order_number_prefix: std::env::var("ORDER_NUMBER_PREFIX")
                .unwrap_or(defaults.order_number_prefix),
            max_item_quantity: std::env::var("MAX_ITEM_QUANTITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_item_quantity),
            save_timeout_ms: std::env::var("SAVE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.save_timeout_ms),
            order_source: std::env::var("ORDER_SOURCE").unwrap_or(defaults.order_source),
            order_locale: std::env::var("ORDER_LOCALE").unwrap_or(defaults.order_locale),
            owner_fetch_limit: std::env::var("OWNER_FETCH_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.owner_fetch_limit),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_number_prefix: "AMR".to_string(),
            max_item_quantity: 99,
            save_timeout_ms: 10_000,
            order_source: "web".to_string(),
            order_locale: "id-ID".to_string(),
            owner_fetch_limit: 20,
        }
    }
}
