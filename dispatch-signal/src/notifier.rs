use crate::event::AvailabilityChanged;

/// 变更通知：向零或多个监听者广播可用性变更
///
/// - `notify_changed` 为同步调用，在忙碌转换点上必须先于任何挂起点完成；
/// - 不保证多个监听者之间的调用顺序。
pub trait ChangeNotifier: Send + Sync {
    fn notify_changed(&self, event: &AvailabilityChanged);
}
