use crate::builder::TableBuilder;
use crate::erased::Erased;
use crate::locator::ServiceLocator;
use crate::options::MediatorOptions;
use crate::registry::HandlerTable;
use crate::source::CandidateSource;
use arbiter_abstractions::{
    ArbiterError, Command, ContextAccessor, Mediator, MessageContext, MessageKind, Notification,
    Query, TaskLocalContextAccessor,
};
use async_trait::async_trait;
use std::any::{TypeId, type_name};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// 默认中介者实现
/// - 只持有不可变调度表、外部服务定位器与上下文访问器，本身无状态
/// - 每次调用：查表 → 取环境上下文（无则新建）→ 调用器解析处理器并执行
#[derive(Clone)]
pub struct DefaultMediator {
    table: Arc<HandlerTable>,
    locator: Arc<dyn ServiceLocator>,
    context: Arc<dyn ContextAccessor>,
}

impl DefaultMediator {
    pub fn new(table: Arc<HandlerTable>, locator: Arc<dyn ServiceLocator>) -> Self {
        Self {
            table,
            locator,
            context: Arc::new(TaskLocalContextAccessor),
        }
    }

    /// 扫描来源构建调度表并组装中介者
    pub fn from_sources(
        sources: &[&dyn CandidateSource],
        locator: Arc<dyn ServiceLocator>,
        options: MediatorOptions,
    ) -> Result<Self, ArbiterError> {
        let table = TableBuilder::with_options(options).build(sources)?;
        Ok(Self::new(Arc::new(table), locator))
    }

    /// 替换环境上下文访问器
    pub fn with_context_accessor(mut self, accessor: Arc<dyn ContextAccessor>) -> Self {
        self.context = accessor;
        self
    }

    pub fn table(&self) -> &HandlerTable {
        &self.table
    }

    // 复用当前逻辑流上的上下文；没有时新建一个，只用于本次调用，不回写
    fn resolve_context(&self) -> MessageContext {
        self.context.current().unwrap_or_else(MessageContext::new)
    }

    async fn dispatch_single<M, R>(
        &self,
        kind: MessageKind,
        message: M,
        cancel: &CancellationToken,
    ) -> Result<R, ArbiterError>
    where
        M: Send + 'static,
        R: 'static,
    {
        let Some(route) = self.table.lookup_single(kind, TypeId::of::<M>()) else {
            return Err(ArbiterError::HandlerNotFound {
                kind,
                message: type_name::<M>(),
            });
        };

        let ctx = self.resolve_context();
        debug!(
            %kind,
            message = route.message(),
            correlation_id = ctx.correlation_id(),
            "dispatching"
        );

        let out = (route.invoker())(
            self.locator.as_ref(),
            route.implementations(),
            Erased::new(message),
            &ctx,
            cancel,
        )
        .await?;
        out.downcast::<R>()
    }
}

#[async_trait]
impl Mediator for DefaultMediator {
    async fn send_with<C>(
        &self,
        command: C,
        cancel: &CancellationToken,
    ) -> Result<C::Result, ArbiterError>
    where
        C: Command,
    {
        self.dispatch_single::<C, C::Result>(MessageKind::Command, command, cancel)
            .await
    }

    async fn ask_with<Q>(&self, query: Q, cancel: &CancellationToken) -> Result<Q::Result, ArbiterError>
    where
        Q: Query,
    {
        self.dispatch_single::<Q, Q::Result>(MessageKind::Query, query, cancel)
            .await
    }

    async fn publish_with<N>(
        &self,
        notification: N,
        cancel: &CancellationToken,
    ) -> Result<(), ArbiterError>
    where
        N: Notification,
    {
        let Some(route) = self.table.lookup_notification(TypeId::of::<N>()) else {
            debug!(
                notification = type_name::<N>(),
                "no notification handlers, skipping"
            );
            return Ok(());
        };

        let ctx = self.resolve_context();
        (route.invoker())(
            self.locator.as_ref(),
            route.handlers(),
            Erased::new(notification),
            &ctx,
            cancel,
        )
        .await
    }
}
