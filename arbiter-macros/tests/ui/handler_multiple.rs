use arbiter_core::{
    CancellationToken, Candidate, CandidateType, ContractKind, MessageContext, Notification,
    NotificationHandler, QueryHandler,
};
use arbiter_macros::Handler;
use async_trait::async_trait;

mod orders {
    pub struct GetOrderId;

    impl arbiter_core::Query for GetOrderId {
        type Result = u64;
    }
}

struct OrderCreated;
impl Notification for OrderCreated {}

struct OrderShipped;
impl Notification for OrderShipped {}

// 一个类型同时声明查询与多个通知契约，可写在一个或多个属性里
#[derive(Handler)]
#[handler(query = orders::GetOrderId, notification = OrderCreated)]
#[handler(notification = OrderShipped)]
struct OrderProjection;

#[async_trait]
impl QueryHandler<orders::GetOrderId> for OrderProjection {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _q: orders::GetOrderId,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<u64> {
        Ok(42)
    }
}

#[async_trait]
impl NotificationHandler<OrderCreated> for OrderProjection {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _n: &OrderCreated,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler<OrderShipped> for OrderProjection {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _n: &OrderShipped,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

fn main() {
    let candidate = CandidateType::of::<OrderProjection>();
    let kinds: Vec<_> = candidate.contracts().iter().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ContractKind::Query,
            ContractKind::Notification,
            ContractKind::Notification
        ]
    );
    assert_eq!(candidate.contracts()[1].result_name(), None);
    let _ = <OrderProjection as Candidate>::contracts();
}
