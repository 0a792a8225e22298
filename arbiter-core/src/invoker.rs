//! 调用器（Invoker）
//!
//! 每个调用器在构建期绑定到一个具体消息类型（及其结果类型），运行时签名统一：
//! `(定位器, 已发现的实现, 擦除后的消息, 上下文, 取消令牌) -> 擦除后的结果`。
//! 调用器内部先把消息还原为绑定的具体类型，再通过定位器解析处理器并调用；
//! 只有实现类型名出现在路由中的实例才会被调用，被过滤掉的实现即使已登记也不会执行。
//!
use crate::erased::Erased;
use crate::locator::{ServiceLocator, resolve_discovered, resolve_single_discovered};
use arbiter_abstractions::{
    ArbiterError, Command, CommandHandler, MessageContext, Notification, NotificationHandler,
    Query, QueryHandler,
};
use std::any::type_name;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub type InvokeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ArbiterError>> + Send + 'a>>;

/// 命令/查询调用器：解析唯一处理器并返回擦除后的结果
pub type RequestInvoker = Arc<
    dyn for<'a> Fn(
            &'a dyn ServiceLocator,
            &'a [&'static str],
            Erased,
            &'a MessageContext,
            &'a CancellationToken,
        ) -> InvokeFuture<'a, Erased>
        + Send
        + Sync,
>;

/// 通知调用器：解析全部处理器并依次执行
pub type NotificationInvoker = Arc<
    dyn for<'a> Fn(
            &'a dyn ServiceLocator,
            &'a [&'static str],
            Erased,
            &'a MessageContext,
            &'a CancellationToken,
        ) -> InvokeFuture<'a, ()>
        + Send
        + Sync,
>;

pub(crate) fn command_invoker<C: Command>() -> RequestInvoker {
    Arc::new(invoke_command::<C>)
}

pub(crate) fn query_invoker<Q: Query>() -> RequestInvoker {
    Arc::new(invoke_query::<Q>)
}

pub(crate) fn notification_invoker<N: Notification>() -> NotificationInvoker {
    Arc::new(invoke_notification::<N>)
}

fn invoke_command<'a, C: Command>(
    locator: &'a dyn ServiceLocator,
    implementations: &'a [&'static str],
    message: Erased,
    ctx: &'a MessageContext,
    cancel: &'a CancellationToken,
) -> InvokeFuture<'a, Erased> {
    Box::pin(async move {
        // 键与调用器由同一泛型 C 生成，正常情况下这里的还原永远不会失败
        let cmd = message.downcast::<C>()?;
        let handler = resolve_single_discovered::<dyn CommandHandler<C>>(locator, implementations)?;
        let result = handler.handle(ctx, cmd, cancel).await?;
        Ok(Erased::new(result))
    })
}

fn invoke_query<'a, Q: Query>(
    locator: &'a dyn ServiceLocator,
    implementations: &'a [&'static str],
    message: Erased,
    ctx: &'a MessageContext,
    cancel: &'a CancellationToken,
) -> InvokeFuture<'a, Erased> {
    Box::pin(async move {
        let q = message.downcast::<Q>()?;
        let handler = resolve_single_discovered::<dyn QueryHandler<Q>>(locator, implementations)?;
        let result = handler.handle(ctx, q, cancel).await?;
        Ok(Erased::new(result))
    })
}

fn invoke_notification<'a, N: Notification>(
    locator: &'a dyn ServiceLocator,
    implementations: &'a [&'static str],
    message: Erased,
    ctx: &'a MessageContext,
    cancel: &'a CancellationToken,
) -> InvokeFuture<'a, ()> {
    Box::pin(async move {
        let notification = message.downcast::<N>()?;
        let handlers = resolve_discovered::<dyn NotificationHandler<N>>(locator, implementations)?;
        debug!(
            notification = type_name::<N>(),
            handlers = handlers.len(),
            correlation_id = ctx.correlation_id(),
            "fanning out notification"
        );

        // 顺序执行：前一个完成后才开始下一个，首个失败立即返回
        for handler in handlers {
            handler.handle(ctx, &notification, cancel).await?;
        }
        Ok(())
    })
}
