//! 广播通知器（BroadcastNotifier）
//!
//! 基于 `tokio::sync::broadcast` 实现的轻量事件扇出，满足 `ChangeNotifier` 协议：
//! - `notify_changed`：克隆并广播事件；
//! - `subscribe`：返回 `'static` 生命周期事件流，便于在 `tokio::spawn` 中消费；
//! - 典型用途：把同步的可用性通知桥接给异步消费者（界面刷新、测试观察）。
//!
//! 注意：若无订阅者时发送将被忽略；消费过慢导致的滞后以
//! `SignalError::Channel` 形式出现在流中。

use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{SignalError, SignalResult as Result};
use crate::event::AvailabilityChanged;
use crate::notifier::ChangeNotifier;

/// 简单的广播通知器实现
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<AvailabilityChanged>,
}

impl BroadcastNotifier {
    /// 创建通知器，`capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 返回一个 `'static` 生命周期的事件流
    pub fn subscribe(&self) -> BoxStream<'static, Result<AvailabilityChanged>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx).map(|r| {
            r.map_err(|e| SignalError::Channel {
                reason: e.to_string(),
            })
        });
        Box::pin(stream)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn notify_changed(&self, event: &AvailabilityChanged) {
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        let _ = self.tx.send(event.clone());
    }
}
