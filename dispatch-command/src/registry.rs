//! 命令注册表（CommandRegistry）
//!
//! 以操作名登记异步命令，供按名绑定动作的宿主（菜单、输入映射、
//! 接口边缘）查找与调度：
//! - 运行时以类型擦除（Any）方式传递参数并在入口处还原；
//! - `refresh_availability` 要求全部命令重新广播可用性。
//!
use std::any::{Any, type_name};
use std::sync::Arc;

use dashmap::DashMap;

use crate::async_command::{AsyncCommand, Invocation};
use crate::error::CommandError;

type BoxParameter = Box<dyn Any + Send>;

type DispatchFn = Arc<dyn Fn(BoxParameter) -> Result<Invocation, CommandError> + Send + Sync>;
type CanDispatchFn = Arc<dyn Fn(&dyn Any) -> Result<bool, CommandError> + Send + Sync>;
type RefreshFn = Arc<dyn Fn() + Send + Sync>;

struct Registered {
    dispatch: DispatchFn,
    can_dispatch: CanDispatchFn,
    refresh: RefreshFn,
}

/// 基于内存的命令注册表
pub struct CommandRegistry {
    commands: DashMap<String, Registered>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self {
            commands: DashMap::new(),
        }
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记命令；同名命令重复登记返回错误
    pub fn register<P>(&self, command: Arc<AsyncCommand<P>>) -> Result<(), CommandError>
    where
        P: Send + 'static,
    {
        let operation = command.name().to_string();
        if self.commands.contains_key(&operation) {
            return Err(CommandError::AlreadyRegistered { operation });
        }

        let dispatch: DispatchFn = {
            let command = command.clone();
            Arc::new(move |boxed| match boxed.downcast::<P>() {
                Ok(parameter) => command.invoke_async(*parameter),
                Err(_) => Err(CommandError::ParameterMismatch {
                    operation: command.name().to_string(),
                    expected: type_name::<P>(),
                }),
            })
        };

        let can_dispatch: CanDispatchFn = {
            let command = command.clone();
            Arc::new(move |parameter| match parameter.downcast_ref::<P>() {
                Some(parameter) => Ok(command.can_invoke(parameter)),
                None => Err(CommandError::ParameterMismatch {
                    operation: command.name().to_string(),
                    expected: type_name::<P>(),
                }),
            })
        };

        let refresh: RefreshFn = {
            let command = command.clone();
            Arc::new(move || command.notify_availability_changed())
        };

        self.commands.insert(
            operation,
            Registered {
                dispatch,
                can_dispatch,
                refresh,
            },
        );

        Ok(())
    }

    /// 调度到已登记命令，返回调用句柄
    pub fn dispatch(
        &self,
        operation: &str,
        parameter: BoxParameter,
    ) -> Result<Invocation, CommandError> {
        let Some(dispatch) = self.commands.get(operation).map(|e| e.dispatch.clone()) else {
            return Err(CommandError::NotRegistered {
                operation: operation.to_string(),
            });
        };

        (dispatch)(parameter)
    }

    /// 查询可用性（无副作用）
    pub fn can_dispatch(&self, operation: &str, parameter: &dyn Any) -> Result<bool, CommandError> {
        let Some(can) = self.commands.get(operation).map(|e| e.can_dispatch.clone()) else {
            return Err(CommandError::NotRegistered {
                operation: operation.to_string(),
            });
        };

        (can)(parameter)
    }

    /// 外部条件变化后，要求全部命令重新广播可用性
    pub fn refresh_availability(&self) {
        for entry in self.commands.iter() {
            (entry.value().refresh)();
        }
    }

    /// 已登记的操作名列表（只读视图）
    pub fn registered_operations(&self) -> Vec<String> {
        self.commands.iter().map(|e| e.key().clone()).collect()
    }
}
