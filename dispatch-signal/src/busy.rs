//! 忙碌门（BusyGate）与忙碌守卫（BusyGuard）
//!
//! 单飞（single-flight）原语：
//! - `BusyGate`：以原子比较交换竞争进入忙碌态，仅一个并发调用者获胜，
//!   落败者被拒绝而非排队；
//! - `BusyGuard`：RAII 守卫，获取时广播一次 `busy=true`，释放（Drop）时
//!   广播一次 `busy=false`，任何退出路径（含 panic 展开）都会释放门。
//!
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::AvailabilityChanged;
use crate::notifier::ChangeNotifier;

/// 单飞门：同一操作同一时刻至多一次在途调用
#[derive(Debug, Default)]
pub struct BusyGate {
    flag: AtomicBool,
}

impl BusyGate {
    /// 创建处于空闲态的门
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前是否忙碌（无副作用，不阻塞）
    pub fn is_busy(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// 尝试进入忙碌态；仅从空闲到忙碌的转换获胜者返回 `true`
    pub fn try_acquire(&self) -> bool {
        self.flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 退出忙碌态，返回此前是否处于忙碌
    pub fn release(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// 忙碌守卫
///
/// 将门的转换与变更通知绑定：每次真实转换恰好通知一次。
/// 守卫在作用域结束时释放门，panic 展开同样经过 `Drop`。
pub struct BusyGuard {
    gate: Arc<BusyGate>,
    notifier: Arc<dyn ChangeNotifier>,
    operation: String,
}

impl BusyGuard {
    /// 竞争进入忙碌态
    ///
    /// - 门已被持有时返回 `None`，不产生任何通知；
    /// - 获胜时在返回前同步广播 `busy=true`。
    pub fn acquire(
        operation: impl Into<String>,
        gate: Arc<BusyGate>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Option<Self> {
        if !gate.try_acquire() {
            return None;
        }

        let operation = operation.into();
        notifier.notify_changed(&AvailabilityChanged::now(operation.clone(), true));

        Some(Self {
            gate,
            notifier,
            operation,
        })
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.gate.release();
        self.notifier
            .notify_changed(&AvailabilityChanged::now(self.operation.clone(), false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<(String, bool)>>,
    }

    impl ChangeNotifier for RecordingNotifier {
        fn notify_changed(&self, event: &AvailabilityChanged) {
            self.events
                .lock()
                .unwrap()
                .push((event.operation().to_string(), event.busy()));
        }
    }

    #[test]
    fn gate_starts_idle() {
        let gate = BusyGate::new();
        assert!(!gate.is_busy());
    }

    #[test]
    fn gate_acquire_is_single_flight() {
        let gate = BusyGate::new();

        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        assert!(gate.release());
        assert!(gate.try_acquire());
    }

    #[test]
    fn gate_release_reports_previous_state() {
        let gate = BusyGate::new();
        assert!(!gate.release());

        gate.try_acquire();
        assert!(gate.release());
    }

    // 并发竞争：恰好一个赢家，落败者被拒绝
    #[test]
    fn gate_concurrent_acquire_has_one_winner() {
        let gate = Arc::new(BusyGate::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = gate.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    if gate.try_acquire() {
                        winners.fetch_add(1, Ordering::Relaxed);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::Relaxed), 1);
        assert!(gate.is_busy());
    }

    #[test]
    fn guard_notifies_each_transition_once() {
        let gate = Arc::new(BusyGate::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let guard = BusyGuard::acquire("demo", gate.clone(), notifier.clone()).unwrap();
        assert!(gate.is_busy());
        assert_eq!(guard.operation(), "demo");

        drop(guard);
        assert!(!gate.is_busy());

        let events = notifier.events.lock().unwrap();
        assert_eq!(
            events.as_slice(),
            &[("demo".to_string(), true), ("demo".to_string(), false)]
        );
    }

    #[test]
    fn guard_rejects_when_gate_held() {
        let gate = Arc::new(BusyGate::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let _held = BusyGuard::acquire("demo", gate.clone(), notifier.clone()).unwrap();
        let rejected = BusyGuard::acquire("demo", gate.clone(), notifier.clone());

        assert!(rejected.is_none());
        // 落败的尝试不产生通知
        assert_eq!(notifier.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn guard_releases_on_panic() {
        let gate = Arc::new(BusyGate::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = BusyGuard::acquire("demo", gate.clone(), notifier.clone()).unwrap();
            panic!("boom");
        }));

        assert!(outcome.is_err());
        assert!(!gate.is_busy());
        assert_eq!(notifier.events.lock().unwrap().len(), 2);
    }
}
