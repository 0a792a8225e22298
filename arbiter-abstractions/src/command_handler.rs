use crate::{command::Command, context::MessageContext};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(
        &self,
        ctx: &MessageContext,
        cmd: C,
        cancel: &CancellationToken,
    ) -> anyhow::Result<C::Result>;
}
