//! 原始配置文档
//!
//! 校验前与磁盘上的结构一一对应：
//!
//! ```toml
//! [moduleConf]
//! accessToken = "EAAB..."
//! apiVersion = "v18.0"
//! pixelId = "123456789"
//! debug = false          # 或 "payload" / "request"
//! testCode = "TEST1234"  # 启用 debug 时必填
//! ```

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 配置文件顶层结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "moduleConf", default)]
    pub module_conf: ModuleConf,
}

/// `moduleConf` 配置段
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConf {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub access_token: Option<String>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub api_version: Option<String>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub pixel_id: Option<String>,

    #[serde(default)]
    pub debug: DebugValue,

    pub test_code: Option<String>,

    /// Graph API 主机覆盖
    #[validate(url(message = "must be an http(s) URL"))]
    pub graph_base_url: Option<String>,
}

/// `debug` 可为布尔值或模式字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebugValue {
    Flag(bool),
    Mode(String),
}

impl Default for DebugValue {
    fn default() -> Self {
        Self::Flag(false)
    }
}
