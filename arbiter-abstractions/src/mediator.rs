use crate::{
    command::Command, error::ArbiterError, notification::Notification, query::Query,
};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 中介者（Mediator）
///
/// 调用方唯一的入口：发送命令、提出查询、发布通知，而不关心具体由哪个处理器处理。
/// - `send` / `ask`：必须恰好有一个处理器，缺失时返回 `HandlerNotFound`；
/// - `publish`：可以没有处理器（静默成功），有多个时按顺序逐个执行，首个失败即中止；
/// - `*_with` 变体接收取消令牌，不带后缀的版本使用一个从不取消的新令牌。
///
/// 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait Mediator: Send + Sync {
    async fn send_with<C>(
        &self,
        command: C,
        cancel: &CancellationToken,
    ) -> Result<C::Result, ArbiterError>
    where
        C: Command;

    async fn ask_with<Q>(&self, query: Q, cancel: &CancellationToken) -> Result<Q::Result, ArbiterError>
    where
        Q: Query;

    async fn publish_with<N>(
        &self,
        notification: N,
        cancel: &CancellationToken,
    ) -> Result<(), ArbiterError>
    where
        N: Notification;

    /// 发送命令到唯一的处理器
    async fn send<C>(&self, command: C) -> Result<C::Result, ArbiterError>
    where
        C: Command,
    {
        let cancel = CancellationToken::new();
        self.send_with(command, &cancel).await
    }

    /// 提出查询到唯一的处理器
    async fn ask<Q>(&self, query: Q) -> Result<Q::Result, ArbiterError>
    where
        Q: Query,
    {
        let cancel = CancellationToken::new();
        self.ask_with(query, &cancel).await
    }

    /// 发布通知到全部处理器
    async fn publish<N>(&self, notification: N) -> Result<(), ArbiterError>
    where
        N: Notification,
    {
        let cancel = CancellationToken::new();
        self.publish_with(notification, &cancel).await
    }
}
