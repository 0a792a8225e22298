//! 统一错误定义
//!
//! 覆盖调度表构建（重复处理器）、运行时路由（找不到处理器）、
//! 服务解析、内部类型不变量以及处理器自身失败。
//!
use std::fmt;

/// 单一处理器槽位的消息种类；通知允许多个处理器，因此不在此列
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    Command,
    Query,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Command => "command",
            MessageKind::Query => "query",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 同一消息类型上发现的多个处理器实现
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateHandler {
    pub kind: MessageKind,
    /// 消息类型的完整路径名
    pub message: &'static str,
    /// 全部重复实现的完整路径名（按发现顺序）
    pub handlers: Vec<&'static str>,
}

impl fmt::Display for DuplicateHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            MessageKind::Command => "Command",
            MessageKind::Query => "Query  ",
        };
        write!(f, "{label} {}: {}", self.message, self.handlers.join(", "))
    }
}

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ArbiterError {
    #[error("{}", format_duplicates(.duplicates))]
    DuplicateHandlers { duplicates: Vec<DuplicateHandler> },

    #[error("No {kind} handler for {message}")]
    HandlerNotFound {
        kind: MessageKind,
        message: &'static str,
    },

    #[error("no service registered for contract {contract}")]
    ServiceNotRegistered { contract: &'static str },

    #[error("ambiguous service for contract {contract}: {count} registrations")]
    AmbiguousService { contract: &'static str, count: usize },

    #[error(
        "type mismatch: expected={expected}, found={found}; this indicates a registry misconfiguration"
    )]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// 处理器返回的错误，原样透传
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

/// 统一 Result 类型别名
pub type ArbiterResult<T> = Result<T, ArbiterError>;

fn format_duplicates(duplicates: &[DuplicateHandler]) -> String {
    let lines: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
    format!(
        "Multiple handlers were found for the same message type (duplicate registrations):\n - {}",
        lines.join("\n - ")
    )
}
