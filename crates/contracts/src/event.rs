//! 事件 payload 结构
//!
//! 字段名与嵌套结构遵循 Conversions API 线上格式。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 标准事件名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    PageView,
    Purchase,
    CompleteRegistration,
    InitiateCheckout,
    ViewContent,
    AddToCart,
}

impl EventName {
    pub const ALL: [EventName; 6] = [
        EventName::PageView,
        EventName::Purchase,
        EventName::CompleteRegistration,
        EventName::InitiateCheckout,
        EventName::ViewContent,
        EventName::AddToCart,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PageView => "PageView",
            Self::Purchase => "Purchase",
            Self::CompleteRegistration => "CompleteRegistration",
            Self::InitiateCheckout => "InitiateCheckout",
            Self::ViewContent => "ViewContent",
            Self::AddToCart => "AddToCart",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 转化发生的渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    #[default]
    Website,
}

/// 访客标识
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub client_user_agent: String,

    pub client_ip_address: String,

    /// `_fbp` cookie 值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbp: Option<String>,

    /// `_fbc` cookie 值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fbc: Option<String>,

    /// 邮箱的 SHA-256 十六进制摘要
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub em: Option<String>,
}

/// AddToCart 的单个购物车条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub quantity: u32,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

/// 事件专属字段；未设置的字段不输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// 保留两位小数的金额（如 "20.00"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<ContentItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CustomData {
    /// 所有字段均未设置时为 true
    pub fn is_empty(&self) -> bool {
        self.currency.is_none()
            && self.value.is_none()
            && self.content_type.is_none()
            && self.content_name.is_none()
            && self.content_ids.is_none()
            && self.contents.is_none()
            && self.status.is_none()
    }
}

/// 单个服务端事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEvent {
    pub event_name: EventName,

    /// Unix 时间戳（秒）
    pub event_time: i64,

    pub event_source_url: String,

    #[serde(default)]
    pub action_source: ActionSource,

    pub user_data: UserData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// 事件端点的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub data: Vec<ServerEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_event_code: Option<String>,
}

impl Payload {
    /// 首个事件名，用于日志
    pub fn event_name(&self) -> Option<EventName> {
        self.data.first().map(|e| e.event_name)
    }
}
