//! 信号基础库（dispatch-signal）
//!
//! 为命令执行提供状态信号原语，用于在应用中实现：
//! - 单飞门（`busy`）：同一动作同一时刻至多一次在途调用
//! - 可用性变更事件（`event`）：提示订阅者重新评估可用性
//! - 变更通知（`notifier`）：面向零或多个监听者的广播能力
//! - 监听者注册表（`registry`）：显式订阅/退订的回调登记
//! - 广播通知器（`broadcast`）：基于 tokio 广播通道的事件流
//!
//! 本 crate 不关心动作本身做什么，只定义"忙/闲"与"可用性可能变化"
//! 两类信号的协议与最小实现，供上层命令执行器组合使用。
//!
pub mod busy;
pub mod error;
pub mod event;
pub mod notifier;
pub mod registry;

#[cfg(feature = "broadcast")]
pub mod broadcast;

pub use busy::{BusyGate, BusyGuard};
pub use error::{SignalError, SignalResult};
pub use event::AvailabilityChanged;
pub use notifier::ChangeNotifier;
pub use registry::{ListenerRegistry, SubscriptionId};

#[cfg(feature = "broadcast")]
pub use broadcast::BroadcastNotifier;
