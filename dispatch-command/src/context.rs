use bon::Builder;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 调用上下文（Invocation Context）
///
/// 承载一次命令调用的横切信息，随失败一起交给错误处理器，
/// 便于日志与呈现层做关联：
/// - `operation`：构造命令时给定的操作名（仅用于诊断）；
/// - `invocation_id`：本次调用的唯一标识；
/// - `started_at`：调用开始时间。
#[derive(Builder, Clone, Debug)]
pub struct InvocationContext {
    invocation_id: Uuid,
    operation: String,
    started_at: DateTime<Utc>,
}

impl InvocationContext {
    /// 为一次新调用生成上下文
    pub fn begin(operation: impl Into<String>) -> Self {
        Self::builder()
            .invocation_id(Uuid::new_v4())
            .operation(operation.into())
            .started_at(Utc::now())
            .build()
    }

    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn started_at(&self) -> &DateTime<Utc> {
        &self.started_at
    }
}
