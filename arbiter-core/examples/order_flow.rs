//! 订单流程示例：命令 → 查询 → 通知扇出
//!
//! 运行：`RUST_LOG=debug cargo run -p arbiter-core --example order_flow`
//!
use arbiter_core::{
    CancellationToken, Command, CommandHandler, DefaultMediator, HandlerModule, Mediator,
    MediatorOptions, MessageContext, Notification, NotificationHandler, Query, QueryHandler,
    ServiceRegistry,
};
use arbiter_macros::Handler;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct PlaceOrder {
    customer: String,
    amount: u64,
}

impl Command for PlaceOrder {
    type Result = String;
}

struct OrderTotal {
    order_id: String,
}

impl Query for OrderTotal {
    type Result = Option<u64>;
}

struct OrderPlaced {
    order_id: String,
    customer: String,
}

impl Notification for OrderPlaced {}

#[derive(Default)]
struct Orders {
    totals: DashMap<String, u64>,
}

#[derive(Handler)]
#[handler(command = PlaceOrder, query = OrderTotal)]
struct OrderService {
    orders: Arc<Orders>,
}

#[async_trait]
impl CommandHandler<PlaceOrder> for OrderService {
    async fn handle(
        &self,
        ctx: &MessageContext,
        cmd: PlaceOrder,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<String> {
        anyhow::ensure!(cmd.amount > 0, "order amount must be positive");
        let id = format!("ord-{}", uuid::Uuid::new_v4().simple());
        self.orders.totals.insert(id.clone(), cmd.amount);
        tracing::info!(order_id = %id, customer = %cmd.customer, correlation_id = ctx.correlation_id(), "order placed");
        Ok(id)
    }
}

#[async_trait]
impl QueryHandler<OrderTotal> for OrderService {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        q: OrderTotal,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Option<u64>> {
        Ok(self.orders.totals.get(&q.order_id).map(|v| *v))
    }
}

#[derive(Handler)]
#[handler(notification = OrderPlaced)]
struct ReceiptMailer;

#[async_trait]
impl NotificationHandler<OrderPlaced> for ReceiptMailer {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        n: &OrderPlaced,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!(order_id = %n.order_id, customer = %n.customer, "receipt sent");
        Ok(())
    }
}

#[derive(Handler)]
#[handler(notification = OrderPlaced)]
struct LoyaltyPoints;

#[async_trait]
impl NotificationHandler<OrderPlaced> for LoyaltyPoints {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        n: &OrderPlaced,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!(customer = %n.customer, "loyalty points granted");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let module = HandlerModule::new("orders")
        .handler::<OrderService>()
        .handler::<ReceiptMailer>()
        .handler::<LoyaltyPoints>();

    let orders = Arc::new(Orders::default());
    let service = Arc::new(OrderService { orders });
    let registry = ServiceRegistry::new();
    registry.add_command_handler::<PlaceOrder, _>(service.clone());
    registry.add_query_handler::<OrderTotal, _>(service);
    registry.add_notification_handler::<OrderPlaced, _>(Arc::new(ReceiptMailer));
    registry.add_notification_handler::<OrderPlaced, _>(Arc::new(LoyaltyPoints));

    let mediator =
        DefaultMediator::from_sources(&[&module], Arc::new(registry), MediatorOptions::default())?;
    tracing::info!(table = ?mediator.table(), "mediator ready");

    let ctx = MessageContext::builder()
        .tenant_id("acme")
        .user_id("alice")
        .build();

    ctx.scope(async {
        let order_id = mediator
            .send(PlaceOrder {
                customer: "alice".into(),
                amount: 1_200,
            })
            .await?;

        let total = mediator
            .ask(OrderTotal {
                order_id: order_id.clone(),
            })
            .await?;
        tracing::info!(%order_id, ?total, "order total");

        mediator
            .publish(OrderPlaced {
                order_id,
                customer: "alice".into(),
            })
            .await?;

        if let Err(err) = mediator
            .send(PlaceOrder {
                customer: "bob".into(),
                amount: 0,
            })
            .await
        {
            tracing::warn!(error = %err, "order rejected");
        }

        anyhow::Ok(())
    })
    .await
}
