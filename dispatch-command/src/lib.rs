//! 命令执行基础库（dispatch-command）
//!
//! 把一个工作单元（同步或异步）包装为可被界面或服务层安全触发的命令：
//! - 单飞门禁止同一命令的并发重入；
//! - 可用性由"非忙碌 且 谓词为真"共同决定，变更时广播通知；
//! - 工作失败恰好一次路由到注入的错误处理器，永不外泄、永不终止进程。
//!
pub mod async_command;
pub mod blocking_command;
pub mod context;
pub mod error;
pub mod handler;
pub mod registry;

pub use async_command::AsyncCommand;
pub use blocking_command::BlockingCommand;
pub use registry::CommandRegistry;
