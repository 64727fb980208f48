//! 信号层统一错误定义
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("notify channel error: {reason}")]
    Channel { reason: String },
}

/// 统一 Result 类型别名
pub type SignalResult<T> = Result<T, SignalError>;
