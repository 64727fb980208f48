//! 异步命令（AsyncCommand）
//!
//! 将一个异步工作单元包装为可安全触发的命令：
//! - `can_invoke`：可用性 = 非忙碌 且 谓词为真，无副作用；
//! - `invoke_async`：赢得单飞门后调度工作，返回可等待的调用句柄；
//!   忙碌转换在返回前同步完成，在途期间的再次调用被显式拒绝；
//! - `invoke`：即发即忘入口，仅供界面触发；
//! - 工作失败（含 panic）恰好一次路由到错误处理器，随后才清除忙碌态。
//!
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use bon::Builder;
use futures_util::FutureExt;
use tokio::task::JoinHandle;

use dispatch_signal::{
    AvailabilityChanged, BusyGate, BusyGuard, ChangeNotifier, ListenerRegistry, SubscriptionId,
};

use crate::context::InvocationContext;
use crate::error::CommandError;
use crate::handler::{ErrorHandler, panic_reason};

/// 工作单元的补全（类型擦除后的 Future）
pub type WorkFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// 异步工作函数：参数 -> 补全
pub type AsyncWorkFn<P> = Arc<dyn Fn(P) -> WorkFuture + Send + Sync>;

/// 可用性谓词：对参数的纯函数，每次检查重新求值，不得有副作用
pub type AvailabilityFn<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// 异步命令
///
/// 构造后除忙碌门外不可变；门与监听者注册表由命令独占持有。
/// 参数类型 `P` 对命令完全不透明，由调用方领域定义。
#[derive(Builder)]
pub struct AsyncCommand<P> {
    name: String,
    availability: AvailabilityFn<P>,
    work: AsyncWorkFn<P>,
    error_handler: Arc<dyn ErrorHandler>,
    #[builder(skip)]
    gate: Arc<BusyGate>,
    #[builder(skip)]
    listeners: Arc<ListenerRegistry>,
}

impl<P> AsyncCommand<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// 当前是否可调用（无副作用，不阻塞，可在任意上下文调用）
    pub fn can_invoke(&self, parameter: &P) -> bool {
        !self.gate.is_busy() && (self.availability)(parameter)
    }

    /// 登记可用性变更监听者；监听者在自身销毁前负责退订
    pub fn on_availability_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AvailabilityChanged) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// 外部条件（谓词的输入）变化时，强制广播一次重新评估信号
    pub fn notify_availability_changed(&self) {
        self.listeners
            .notify_changed(&AvailabilityChanged::now(self.name.clone(), self.gate.is_busy()));
    }

    /// 启动一次调用，返回可等待补全的句柄
    ///
    /// 需在 tokio 运行时内调用。忙碌转换（及其通知）在本函数返回前
    /// 同步完成；门已被持有时返回 [`CommandError::Busy`]，落败调用
    /// 被拒绝而非排队。
    pub fn invoke_async(&self, parameter: P) -> Result<Invocation, CommandError> {
        let notifier: Arc<dyn ChangeNotifier> = self.listeners.clone();
        let Some(guard) = BusyGuard::acquire(self.name.as_str(), self.gate.clone(), notifier)
        else {
            return Err(CommandError::Busy {
                operation: self.name.clone(),
            });
        };

        let ctx = InvocationContext::begin(self.name.as_str());
        let work = (self.work)(parameter);
        let handler = self.error_handler.clone();

        let task = tokio::spawn(async move {
            // 守卫随任务结束释放门并广播第二次转换；
            // 失败路由发生在守卫仍持有期间
            let _guard = guard;

            match AssertUnwindSafe(work).catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(failure)) => handler.handle(&ctx, &failure).await,
                Err(panic) => {
                    let failure = anyhow::anyhow!("work panicked: {}", panic_reason(&*panic));
                    handler.handle(&ctx, &failure).await;
                }
            }
        });

        Ok(Invocation { task })
    }

    /// 即发即忘入口，仅供界面触发使用
    ///
    /// 丢弃调用句柄，调用方无法观察补全；需要等待副作用可见时
    /// 必须改用 [`Self::invoke_async`]。忙碌拒绝仅记录日志。
    pub fn invoke(&self, parameter: P) {
        match self.invoke_async(parameter) {
            Ok(invocation) => invocation.detach(),
            Err(err) => tracing::warn!(
                operation = self.name.as_str(),
                error = %err,
                "fire-and-forget invocation rejected"
            ),
        }
    }
}

/// 在途调用句柄
pub struct Invocation {
    task: JoinHandle<()>,
}

impl Invocation {
    /// 等待本次调用完成
    ///
    /// 工作失败已在任务内路由，不会从这里返回；
    /// 错误处理器自身的 panic（如验证变体）在此处继续展开。
    pub async fn join(self) {
        if let Err(err) = self.task.await {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }

    /// 放弃观察补全（任务仍运行至结束）
    pub fn detach(self) {}
}
