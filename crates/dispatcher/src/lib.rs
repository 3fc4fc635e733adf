//! # Dispatcher
//!
//! 转化事件分发模块。
//!
//! 负责：
//! - 根据事件字段与 `RequestContext` 构建 `Payload`
//! - 按调试模式路由：渲染检查，或 POST 至事件端点
//! - 吞掉发送失败（fire-and-forget）

pub mod dispatcher;
pub mod error;
pub mod events;
pub mod metrics;
pub mod payload;
pub mod sinks;

pub use contracts::{EventTransport, Inspector, Payload, RequestContext};
pub use dispatcher::{DispatchOutcome, EventDispatcher, ResponseBody};
pub use error::DispatcherError;
pub use events::{format_value, ConversionEvent, DEFAULT_CURRENCY, PRODUCT_CONTENT_TYPE};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use payload::{hash_email, Clock, FixedClock, PayloadBuilder, SystemClock};
pub use sinks::{BufferInspector, GraphApiTransport, LogInspector, StdoutInspector};
