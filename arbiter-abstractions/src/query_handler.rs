use crate::{context::MessageContext, query::Query};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(
        &self,
        ctx: &MessageContext,
        q: Q,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Q::Result>;
}
