//! 监听者注册表（ListenerRegistry）
//!
//! 显式订阅/退订的回调登记，满足 `ChangeNotifier` 协议：
//! - `subscribe`：登记监听者，返回订阅标识；
//! - `unsubscribe`：监听者在自身销毁前负责退订；
//! - `notify_changed`：内联依次调用全部监听者。
//!
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::event::AvailabilityChanged;
use crate::notifier::ChangeNotifier;

/// 订阅标识，退订时使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Listener = Arc<dyn Fn(&AvailabilityChanged) + Send + Sync>;

/// 基于回调的监听者注册表
pub struct ListenerRegistry {
    listeners: DashMap<SubscriptionId, Listener>,
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self {
            listeners: DashMap::new(),
        }
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记监听者，返回用于退订的标识
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AvailabilityChanged) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.listeners.insert(id, Arc::new(listener));
        id
    }

    /// 退订；标识未登记时返回 `false`
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl ChangeNotifier for ListenerRegistry {
    fn notify_changed(&self, event: &AvailabilityChanged) {
        // 先克隆出监听者快照再调用：
        // 回调内若再订阅/退订，不能与分片锁互相等待
        let listeners: Vec<Listener> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscribed_listener_receives_events() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_in_listener = seen.clone();
        registry.subscribe(move |event| {
            seen_in_listener
                .lock()
                .unwrap()
                .push((event.operation().to_string(), event.busy()));
        });

        registry.notify_changed(&AvailabilityChanged::now("checkout", true));
        registry.notify_changed(&AvailabilityChanged::now("checkout", false));

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[
                ("checkout".to_string(), true),
                ("checkout".to_string(), false)
            ]
        );
    }

    #[test]
    fn every_listener_is_invoked() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            registry.subscribe(move |_| {
                calls.fetch_add(1, Ordering::Relaxed);
            });
        }
        assert_eq!(registry.len(), 3);

        registry.notify_changed(&AvailabilityChanged::now("demo", true));
        assert_eq!(calls.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_in_listener = calls.clone();
        let id = registry.subscribe(move |_| {
            calls_in_listener.fetch_add(1, Ordering::Relaxed);
        });

        registry.notify_changed(&AvailabilityChanged::now("demo", true));
        assert!(registry.unsubscribe(id));
        registry.notify_changed(&AvailabilityChanged::now("demo", false));

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_unknown_id_returns_false() {
        let registry = ListenerRegistry::new();
        let other = ListenerRegistry::new();
        let id = other.subscribe(|_| {});

        assert!(!registry.unsubscribe(id));
    }
}
