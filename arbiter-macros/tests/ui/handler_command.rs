use arbiter_core::{
    CancellationToken, Candidate, Command, CommandHandler, ContractKind, MessageContext,
};
use arbiter_macros::Handler;
use async_trait::async_trait;

struct CreateOrder {
    sku: String,
}

impl Command for CreateOrder {
    type Result = String;
}

#[derive(Handler)]
#[handler(command = CreateOrder)]
struct CreateOrderHandler;

#[async_trait]
impl CommandHandler<CreateOrder> for CreateOrderHandler {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        cmd: CreateOrder,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<String> {
        Ok(format!("order-{}", cmd.sku))
    }
}

fn main() {
    let contracts = CreateOrderHandler::contracts();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].kind(), ContractKind::Command);
    assert!(contracts[0].message_name().ends_with("CreateOrder"));
    assert_eq!(contracts[0].result_name(), Some(std::any::type_name::<String>()));
}
