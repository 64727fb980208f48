//! 可用性变更事件（AvailabilityChanged）
//!
//! 提示订阅者"某个操作的可用性可能已变化，应重新评估"。
//! 事件只携带操作名与门状态快照，不携带评估结果本身。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 可用性变更信号
///
/// - `operation`：发生变化的操作名（仅用于诊断与路由）；
/// - `busy`：发出事件时忙碌门的快照；
/// - `occurred_at`：事件发生时间。
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityChanged {
    operation: String,
    busy: bool,
    occurred_at: DateTime<Utc>,
}

impl AvailabilityChanged {
    /// 以当前时间构造事件
    pub fn now(operation: impl Into<String>, busy: bool) -> Self {
        Self::builder()
            .operation(operation.into())
            .busy(busy)
            .occurred_at(Utc::now())
            .build()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }
}
