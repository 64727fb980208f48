use std::sync::Arc;
use std::time::Duration;

use dispatch_signal::{BroadcastNotifier, BusyGate, BusyGuard, ChangeNotifier};
use futures_util::StreamExt;

#[tokio::main]
async fn main() {
    let notifier = Arc::new(BroadcastNotifier::new(16));

    // 异步消费者：打印每一次可用性变更
    let mut stream = notifier.subscribe();
    let consumer = tokio::spawn(async move {
        while let Some(Ok(event)) = stream.next().await {
            println!(
                "operation={} busy={} at={}",
                event.operation(),
                event.busy(),
                event.occurred_at()
            );
        }
    });

    let gate = Arc::new(BusyGate::new());

    // 两个完整的忙碌周期，各广播一对转换
    for round in 0..2 {
        let guard = BusyGuard::acquire(
            format!("sync-round-{round}"),
            gate.clone(),
            notifier.clone() as Arc<dyn ChangeNotifier>,
        )
        .expect("gate should be idle between rounds");

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard);
    }

    // 留给消费者时间排空缓冲
    tokio::time::sleep(Duration::from_millis(100)).await;
    consumer.abort();
}
