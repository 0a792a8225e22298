use arbiter_core::{
    ArbiterError, CancellationToken, CandidateType, Command, CommandHandler, DefaultMediator,
    HandlerContract, HandlerModule, Mediator, MediatorOptions, MessageContext, MessageKind,
    Notification, NotificationHandler, Query, QueryHandler, ScanError, ServiceRegistry,
    TableBuilder,
};
use arbiter_macros::Handler;
use async_trait::async_trait;
use std::any::{TypeId, type_name};
use std::sync::Arc;

struct CreateOrder;

impl Command for CreateOrder {
    type Result = u64;
}

struct GetOrderId;

impl Query for GetOrderId {
    type Result = Option<u64>;
}

struct OrderCreated;

impl Notification for OrderCreated {}

#[derive(Handler)]
#[handler(command = CreateOrder, query = GetOrderId)]
struct OrderService;

#[async_trait]
impl CommandHandler<CreateOrder> for OrderService {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _cmd: CreateOrder,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<u64> {
        Ok(1)
    }
}

#[async_trait]
impl QueryHandler<GetOrderId> for OrderService {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _q: GetOrderId,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Option<u64>> {
        Ok(Some(1))
    }
}

#[derive(Handler)]
#[handler(query = GetOrderId)]
struct LegacyOrderLookup;

#[async_trait]
impl QueryHandler<GetOrderId> for LegacyOrderLookup {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _q: GetOrderId,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Option<u64>> {
        Ok(None)
    }
}

#[derive(Handler)]
#[handler(command = CreateOrder)]
struct LegacyOrderWriter;

#[async_trait]
impl CommandHandler<CreateOrder> for LegacyOrderWriter {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _cmd: CreateOrder,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<u64> {
        Ok(0)
    }
}

#[derive(Handler)]
#[handler(notification = OrderCreated)]
struct Mailer;

#[async_trait]
impl NotificationHandler<OrderCreated> for Mailer {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _n: &OrderCreated,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Handler)]
#[handler(notification = OrderCreated)]
struct Auditor;

#[async_trait]
impl NotificationHandler<OrderCreated> for Auditor {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _n: &OrderCreated,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

fn duplicates_of(err: ArbiterError) -> Vec<arbiter_core::abstractions::DuplicateHandler> {
    match err {
        ArbiterError::DuplicateHandlers { duplicates } => duplicates,
        other => panic!("expected duplicate handlers, got {other:?}"),
    }
}

#[test]
fn builds_routes_for_every_declared_contract() {
    let module = HandlerModule::new("orders")
        .handler::<OrderService>()
        .handler::<Mailer>()
        .handler::<Auditor>();

    let table = TableBuilder::new().build(&[&module]).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.commands(), vec![type_name::<CreateOrder>()]);
    assert_eq!(table.queries(), vec![type_name::<GetOrderId>()]);
    assert_eq!(table.notifications(), vec![type_name::<OrderCreated>()]);

    let route = table
        .lookup_single(MessageKind::Query, TypeId::of::<GetOrderId>())
        .unwrap();
    assert_eq!(route.handler(), type_name::<OrderService>());
    assert_eq!(route.result(), type_name::<Option<u64>>());

    // 同一类型在命令与查询两个槽位互不影响
    assert!(
        table
            .lookup_single(MessageKind::Query, TypeId::of::<CreateOrder>())
            .is_none()
    );

    let fan_out = table
        .lookup_notification(TypeId::of::<OrderCreated>())
        .unwrap();
    assert_eq!(
        fan_out.handlers(),
        &[type_name::<Mailer>(), type_name::<Auditor>()]
    );
}

#[test]
fn duplicate_query_handlers_fail_with_both_names() {
    let module = HandlerModule::new("orders")
        .handler::<OrderService>()
        .handler::<LegacyOrderLookup>();

    let err = TableBuilder::new().build(&[&module]).unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("Multiple handlers were found for the same message type"));
    assert!(text.contains("GetOrderId"));
    assert!(text.contains(type_name::<OrderService>()));
    assert!(text.contains(type_name::<LegacyOrderLookup>()));

    let duplicates = duplicates_of(err);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].kind, MessageKind::Query);
    assert_eq!(
        duplicates[0].handlers,
        vec![type_name::<OrderService>(), type_name::<LegacyOrderLookup>()]
    );
}

#[test]
fn all_duplicate_groups_are_reported_together() {
    let module = HandlerModule::new("orders")
        .handler::<LegacyOrderLookup>()
        .handler::<OrderService>()
        .handler::<LegacyOrderWriter>();

    let duplicates = duplicates_of(TableBuilder::new().build(&[&module]).unwrap_err());

    assert_eq!(duplicates.len(), 2);
    // 命令排在查询之前
    assert_eq!(duplicates[0].kind, MessageKind::Command);
    assert_eq!(duplicates[0].message, type_name::<CreateOrder>());
    assert_eq!(duplicates[1].kind, MessageKind::Query);
    assert_eq!(duplicates[1].message, type_name::<GetOrderId>());
}

#[test]
fn same_type_listed_twice_is_not_a_duplicate() {
    let first = HandlerModule::new("first").handler::<OrderService>();
    let second = HandlerModule::new("second")
        .handler::<OrderService>()
        .handler::<Mailer>()
        .handler::<Mailer>();

    let table = TableBuilder::new().build(&[&first, &second]).unwrap();

    assert_eq!(table.commands().len(), 1);
    let fan_out = table
        .lookup_notification(TypeId::of::<OrderCreated>())
        .unwrap();
    assert_eq!(fan_out.handlers(), &[type_name::<Mailer>()]);
}

#[test]
fn notifications_allow_many_handlers() {
    let module = HandlerModule::new("events")
        .handler::<Mailer>()
        .handler::<Auditor>();

    let table = TableBuilder::new().build(&[&module]).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        table
            .lookup_notification(TypeId::of::<OrderCreated>())
            .unwrap()
            .handlers()
            .len(),
        2
    );
}

#[test]
fn unreadable_candidates_are_skipped() {
    let module = HandlerModule::new("partial")
        .loader(|| Err(ScanError::new("plugins::Broken", "dependency failed to load")))
        .handler::<OrderService>();

    let table = TableBuilder::new().build(&[&module]).unwrap();
    assert_eq!(table.commands(), vec![type_name::<CreateOrder>()]);
}

#[test]
fn type_filter_excludes_candidates_before_validation() {
    let module = HandlerModule::new("orders")
        .handler::<OrderService>()
        .handler::<LegacyOrderLookup>()
        .handler::<LegacyOrderWriter>();

    let options =
        MediatorOptions::default().with_type_filter(|c| !c.short_name().starts_with("Legacy"));
    let table = TableBuilder::with_options(options).build(&[&module]).unwrap();

    let route = table
        .lookup_single(MessageKind::Command, TypeId::of::<CreateOrder>())
        .unwrap();
    assert_eq!(route.handler(), type_name::<OrderService>());
}

#[test]
fn hand_written_candidates_need_no_derive() {
    struct Manual;

    #[async_trait]
    impl CommandHandler<CreateOrder> for Manual {
        async fn handle(
            &self,
            _ctx: &MessageContext,
            _cmd: CreateOrder,
            _cancel: &CancellationToken,
        ) -> anyhow::Result<u64> {
            Ok(7)
        }
    }

    let candidate =
        CandidateType::new::<Manual>(vec![]).with_contract(HandlerContract::command::<CreateOrder, Manual>());
    let module = HandlerModule::new("manual").candidate(candidate);

    let table = TableBuilder::new().build(&[&module]).unwrap();
    assert_eq!(
        table
            .lookup_single(MessageKind::Command, TypeId::of::<CreateOrder>())
            .unwrap()
            .handler(),
        type_name::<Manual>()
    );
}

#[test]
fn building_twice_yields_equivalent_tables() {
    let module = HandlerModule::new("orders")
        .handler::<OrderService>()
        .handler::<Mailer>()
        .handler::<Auditor>();
    let builder = TableBuilder::new();

    let a = builder.build(&[&module]).unwrap();
    let b = builder.build(&[&module]).unwrap();

    assert_eq!(a.commands(), b.commands());
    assert_eq!(a.queries(), b.queries());
    assert_eq!(a.notifications(), b.notifications());
    assert_eq!(
        a.lookup_notification(TypeId::of::<OrderCreated>())
            .unwrap()
            .handlers(),
        b.lookup_notification(TypeId::of::<OrderCreated>())
            .unwrap()
            .handlers()
    );
}

#[tokio::test]
async fn empty_table_routes_nothing() {
    let table = TableBuilder::new().build(&[]).unwrap();
    assert!(table.is_empty());

    let mediator = DefaultMediator::new(Arc::new(table), Arc::new(ServiceRegistry::new()));

    let err = mediator.send(CreateOrder).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("No command handler for {}", type_name::<CreateOrder>())
    );

    let err = mediator.ask(GetOrderId).await.unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::HandlerNotFound {
            kind: MessageKind::Query,
            ..
        }
    ));
    assert!(err.to_string().starts_with("No query handler for "));

    mediator.publish(OrderCreated).await.unwrap();
}

#[tokio::test]
async fn duplicate_registration_blocks_mediator_construction() {
    let module = HandlerModule::new("orders")
        .handler::<OrderService>()
        .handler::<LegacyOrderLookup>();

    let result = DefaultMediator::from_sources(
        &[&module],
        Arc::new(ServiceRegistry::new()),
        MediatorOptions::default(),
    );
    assert!(matches!(result, Err(ArbiterError::DuplicateHandlers { .. })));
}
