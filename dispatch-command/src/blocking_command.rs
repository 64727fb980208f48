//! 阻塞命令（BlockingCommand）
//!
//! 与 [`crate::async_command::AsyncCommand`] 同形，但工作单元在调用
//! 返回前内联执行完毕。忙碌门与可用性定义同异步变体保持一致：
//! 可用性 = 非忙碌 且 谓词为真。失败（含 panic）被当场捕获、
//! 同步路由到错误处理器，门经守卫在一切路径上释放。
//!
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use bon::Builder;

use dispatch_signal::{
    AvailabilityChanged, BusyGate, BusyGuard, ChangeNotifier, ListenerRegistry, SubscriptionId,
};

use crate::async_command::AvailabilityFn;
use crate::context::InvocationContext;
use crate::error::CommandError;
use crate::handler::{ErrorHandler, panic_reason};

/// 阻塞工作函数：参数 -> 结果
pub type BlockingWorkFn<P> = Arc<dyn Fn(P) -> anyhow::Result<()> + Send + Sync>;

/// 阻塞命令
#[derive(Builder)]
pub struct BlockingCommand<P> {
    name: String,
    availability: AvailabilityFn<P>,
    work: BlockingWorkFn<P>,
    error_handler: Arc<dyn ErrorHandler>,
    #[builder(skip)]
    gate: Arc<BusyGate>,
    #[builder(skip)]
    listeners: Arc<ListenerRegistry>,
}

impl<P> BlockingCommand<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// 当前是否可调用（无副作用）
    pub fn can_invoke(&self, parameter: &P) -> bool {
        !self.gate.is_busy() && (self.availability)(parameter)
    }

    /// 登记可用性变更监听者
    pub fn on_availability_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AvailabilityChanged) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// 外部条件变化时，强制广播一次重新评估信号
    pub fn notify_availability_changed(&self) {
        self.listeners
            .notify_changed(&AvailabilityChanged::now(self.name.clone(), self.gate.is_busy()));
    }

    /// 执行一次调用；工作在返回前完成
    ///
    /// 门已被持有时返回 [`CommandError::Busy`]。工作失败不从这里
    /// 返回，而是同步交给错误处理器。
    pub async fn invoke(&self, parameter: P) -> Result<(), CommandError> {
        let notifier: Arc<dyn ChangeNotifier> = self.listeners.clone();
        let Some(_guard) = BusyGuard::acquire(self.name.as_str(), self.gate.clone(), notifier)
        else {
            return Err(CommandError::Busy {
                operation: self.name.clone(),
            });
        };

        let ctx = InvocationContext::begin(self.name.as_str());
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| (self.work)(parameter)));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(failure)) => self.error_handler.handle(&ctx, &failure).await,
            Err(panic) => {
                let failure = anyhow::anyhow!("work panicked: {}", panic_reason(&*panic));
                self.error_handler.handle(&ctx, &failure).await;
            }
        }

        Ok(())
    }
}
