use crate::{context::MessageContext, notification::Notification};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 通知处理器：同一通知的多个处理器共享同一个通知实例（按引用传入）
#[async_trait]
pub trait NotificationHandler<N>: Send + Sync
where
    N: Notification,
{
    async fn handle(
        &self,
        ctx: &MessageContext,
        notification: &N,
        cancel: &CancellationToken,
    ) -> anyhow::Result<()>;
}
