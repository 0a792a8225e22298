//! Arbiter 抽象层（arbiter-abstractions）
//!
//! 定义进程内中介者（Mediator）所需的全部契约，不包含任何调度实现：
//! - 消息分类：命令（`command`）、查询（`query`）、通知（`notification`）
//! - 处理器契约：`CommandHandler` / `QueryHandler` / `NotificationHandler`
//! - 环境上下文（`context`）：关联/因果/租户/用户信息与幂等键，按逻辑流传播
//! - 中介者门面（`mediator`）与统一错误（`error`）
//!
//! 调度表的构建与运行时分发位于 `arbiter-core`。
//!
pub mod command;
pub mod command_handler;
pub mod context;
pub mod error;
pub mod mediator;
pub mod notification;
pub mod notification_handler;
pub mod query;
pub mod query_handler;

pub use command::Command;
pub use command_handler::CommandHandler;
pub use context::{ContextAccessor, MessageContext, TaskLocalContextAccessor};
pub use error::{ArbiterError, ArbiterResult, DuplicateHandler, MessageKind};
pub use mediator::Mediator;
pub use notification::Notification;
pub use notification_handler::NotificationHandler;
pub use query::Query;
pub use query_handler::QueryHandler;

pub use tokio_util::sync::CancellationToken;
