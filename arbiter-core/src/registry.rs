//! 调度表（Dispatch Table）
//!
//! 由 [`TableBuilder`](crate::builder::TableBuilder) 一次性构建，之后只读：
//! 没有公开的修改入口，可在任意多个并发调用间共享而无需加锁。
//!
use crate::invoker::{NotificationInvoker, RequestInvoker};
use arbiter_abstractions::MessageKind;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// 单一处理器槽位的键：(消息种类, 消息类型)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    kind: MessageKind,
    message_type: TypeId,
}

impl HandlerKey {
    pub fn new(kind: MessageKind, message_type: TypeId) -> Self {
        Self { kind, message_type }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn message_type(&self) -> TypeId {
        self.message_type
    }
}

/// 命令/查询路由
#[derive(Clone)]
pub struct RequestRoute {
    message: &'static str,
    result: &'static str,
    handler: &'static str,
    invoker: RequestInvoker,
}

impl RequestRoute {
    pub(crate) fn new(
        message: &'static str,
        result: &'static str,
        handler: &'static str,
        invoker: RequestInvoker,
    ) -> Self {
        Self {
            message,
            result,
            handler,
            invoker,
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn result(&self) -> &'static str {
        self.result
    }

    /// 构建时发现的实现类型名
    ///
    /// 调度时只会调用定位器中以该名称登记的实例；
    /// 定位器中同一契约下的其他实现不会被使用。
    pub fn handler(&self) -> &'static str {
        self.handler
    }

    /// 允许调用的实现（仅 [`handler`](Self::handler) 一个）
    pub fn implementations(&self) -> &[&'static str] {
        std::slice::from_ref(&self.handler)
    }

    pub fn invoker(&self) -> &RequestInvoker {
        &self.invoker
    }
}

/// 通知路由：一个调用器负责扇出到全部处理器
#[derive(Clone)]
pub struct NotificationRoute {
    message: &'static str,
    handlers: Vec<&'static str>,
    invoker: NotificationInvoker,
}

impl NotificationRoute {
    pub(crate) fn new(message: &'static str, invoker: NotificationInvoker) -> Self {
        Self {
            message,
            handlers: Vec::new(),
            invoker,
        }
    }

    pub(crate) fn add_handler(&mut self, handler: &'static str) {
        if !self.handlers.contains(&handler) {
            self.handlers.push(handler);
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    /// 构建时发现的实现类型名
    ///
    /// 扇出时只执行定位器中以这些名称登记的实例，顺序仍以定位器为准。
    pub fn handlers(&self) -> &[&'static str] {
        &self.handlers
    }

    pub fn invoker(&self) -> &NotificationInvoker {
        &self.invoker
    }
}

#[derive(Clone, Default)]
pub struct HandlerTable {
    single: HashMap<HandlerKey, RequestRoute>,
    notifications: HashMap<TypeId, NotificationRoute>,
}

impl HandlerTable {
    /// 命令/查询查找；未注册返回 `None`
    pub fn lookup_single(&self, kind: MessageKind, message_type: TypeId) -> Option<&RequestRoute> {
        self.single.get(&HandlerKey::new(kind, message_type))
    }

    /// 通知查找；未注册是正常情况
    pub fn lookup_notification(&self, message_type: TypeId) -> Option<&NotificationRoute> {
        self.notifications.get(&message_type)
    }

    /// 已注册的命令类型名（排序后）
    pub fn commands(&self) -> Vec<&'static str> {
        self.single_names(MessageKind::Command)
    }

    /// 已注册的查询类型名（排序后）
    pub fn queries(&self) -> Vec<&'static str> {
        self.single_names(MessageKind::Query)
    }

    /// 已注册的通知类型名（排序后）
    pub fn notifications(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.notifications.values().map(|r| r.message).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.single.len() + self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.notifications.is_empty()
    }

    pub(crate) fn contains_single(&self, key: &HandlerKey) -> bool {
        self.single.contains_key(key)
    }

    pub(crate) fn insert_single(&mut self, key: HandlerKey, route: RequestRoute) {
        self.single.insert(key, route);
    }

    pub(crate) fn notification_entry(
        &mut self,
        message_type: TypeId,
        make: impl FnOnce() -> NotificationRoute,
    ) -> &mut NotificationRoute {
        self.notifications.entry(message_type).or_insert_with(make)
    }

    fn single_names(&self, kind: MessageKind) -> Vec<&'static str> {
        let mut names: Vec<_> = self
            .single
            .iter()
            .filter(|(k, _)| k.kind == kind)
            .map(|(_, r)| r.message)
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("commands", &self.commands())
            .field("queries", &self.queries())
            .field("notifications", &self.notifications())
            .finish()
    }
}
