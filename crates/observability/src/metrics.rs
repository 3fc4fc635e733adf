//! 指标模块
//!
//! 对 `metrics` 宏的薄封装，指标名集中定义于此。

use contracts::{DebugMode, EventName};
use metrics::{counter, histogram};

/// Payload 的分发路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRoute {
    /// 仅渲染供检查
    Inspected,
    /// 发送至事件端点
    Transmitted,
}

impl DispatchRoute {
    /// 调试模式对应的路径
    pub fn for_mode(mode: DebugMode) -> Self {
        match mode {
            DebugMode::Payload => Self::Inspected,
            DebugMode::Off | DebugMode::Request => Self::Transmitted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inspected => "inspected",
            Self::Transmitted => "transmitted",
        }
    }
}

/// 记录已构建的 payload
pub fn record_event_built(event_name: EventName) {
    counter!(
        "pixel_relay_events_built_total",
        "event_name" => event_name.as_str()
    )
    .increment(1);
}

/// 记录分发结果
pub fn record_event_dispatched(event_name: EventName, route: DispatchRoute, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "pixel_relay_events_dispatched_total",
        "event_name" => event_name.as_str(),
        "route" => route.as_str(),
        "status" => status
    )
    .increment(1);
}

/// 记录端点返回的 HTTP 状态码
pub fn record_response_status(status: u16) {
    counter!(
        "pixel_relay_response_status_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录单次 POST 的往返耗时
pub fn record_transport_latency_ms(latency_ms: f64) {
    histogram!("pixel_relay_transport_latency_ms").record(latency_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_mode() {
        assert_eq!(DispatchRoute::for_mode(DebugMode::Payload), DispatchRoute::Inspected);
        assert_eq!(DispatchRoute::for_mode(DebugMode::Off), DispatchRoute::Transmitted);
        assert_eq!(DispatchRoute::for_mode(DebugMode::Request), DispatchRoute::Transmitted);
    }

    #[test]
    fn test_record_without_recorder_is_noop() {
        // 未安装全局 recorder 时调用不得 panic
        record_event_built(EventName::Purchase);
        record_event_dispatched(EventName::Purchase, DispatchRoute::Transmitted, false);
        record_response_status(400);
        record_transport_latency_ms(12.5);
    }
}
