//! 错误处理器（ErrorHandler）协议与标准实现
//!
//! 执行器只负责把失败恰好一次交到处理器手里；
//! 失败最终如何呈现（记录、提示、快速失败）是处理器的策略。
//!
use async_trait::async_trait;
use std::sync::Arc;

use crate::context::InvocationContext;

/// 错误处理器：接收（调用上下文, 失败）并决定最终呈现方式
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, ctx: &InvocationContext, failure: &anyhow::Error);
}

/// 呈现能力：向用户呈现一条人类可读的失败消息
pub trait Presenter: Send + Sync {
    fn present(&self, operation: &str, message: &str);
}

/// 日志处理器（呈现变体）
///
/// 记录失败到日志，并在配置了 [`Presenter`] 时额外呈现；
/// 永不 panic，也不等待用户交互。
#[derive(Default)]
pub struct LoggingErrorHandler {
    presenter: Option<Arc<dyn Presenter>>,
}

impl LoggingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presenter(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            presenter: Some(presenter),
        }
    }
}

#[async_trait]
impl ErrorHandler for LoggingErrorHandler {
    async fn handle(&self, ctx: &InvocationContext, failure: &anyhow::Error) {
        tracing::error!(
            operation = ctx.operation(),
            invocation_id = %ctx.invocation_id(),
            failure = %failure,
            "command failed"
        );

        if let Some(presenter) = &self.presenter {
            presenter.present(ctx.operation(), &failure.to_string());
        }
    }
}

/// 断言处理器（验证变体）
///
/// 记录后以 panic 重新抛出，让测试环境响亮地失败；
/// 经由 [`crate::async_command::Invocation::join`] 等待的调用会把该
/// panic 继续展开到等待方。
#[derive(Debug, Default)]
pub struct PanickingErrorHandler;

#[async_trait]
impl ErrorHandler for PanickingErrorHandler {
    async fn handle(&self, ctx: &InvocationContext, failure: &anyhow::Error) {
        tracing::error!(
            operation = ctx.operation(),
            failure = %failure,
            "command failed"
        );
        panic!("command '{}' failed: {failure}", ctx.operation());
    }
}

// panic 载荷转为可读原因，供执行器把工作中的展开转换为普通失败
pub(crate) fn panic_reason(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(reason) = panic.downcast_ref::<&str>() {
        reason
    } else if let Some(reason) = panic.downcast_ref::<String>() {
        reason
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct SpyPresenter {
        messages: Mutex<Vec<(String, String)>>,
    }

    impl Presenter for SpyPresenter {
        fn present(&self, operation: &str, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((operation.to_string(), message.to_string()));
        }
    }

    #[tokio::test]
    async fn logging_handler_forwards_to_presenter() {
        let presenter = Arc::new(SpyPresenter::default());
        let handler = LoggingErrorHandler::with_presenter(presenter.clone());

        let ctx = InvocationContext::begin("checkout");
        handler.handle(&ctx, &anyhow::anyhow!("network error")).await;

        assert_eq!(
            presenter.messages.lock().unwrap().as_slice(),
            &[("checkout".to_string(), "network error".to_string())]
        );
    }

    #[tokio::test]
    async fn logging_handler_without_presenter_never_panics() {
        let handler = LoggingErrorHandler::new();
        let ctx = InvocationContext::begin("checkout");

        handler.handle(&ctx, &anyhow::anyhow!("network error")).await;
    }

    #[tokio::test]
    #[should_panic(expected = "command 'checkout' failed")]
    async fn panicking_handler_reraises_with_operation_name() {
        let handler = PanickingErrorHandler;
        let ctx = InvocationContext::begin("checkout");

        handler.handle(&ctx, &anyhow::anyhow!("network error")).await;
    }

    #[test]
    fn panic_reason_reads_common_payloads() {
        assert_eq!(panic_reason(&"boom"), "boom");
        assert_eq!(panic_reason(&"boom".to_string()), "boom");
        assert_eq!(panic_reason(&42_u32), "unknown panic");
    }
}
