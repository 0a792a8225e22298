//! Arbiter 调度核心（arbiter-core）
//!
//! 在进程启动时从一组候选处理器类型构建类型安全的调度表，并在运行时完成分发：
//! - 候选（`candidate`/`source`）：处理器类型及其声明的契约、可容错枚举的来源
//! - 构建（`builder`）：唯一性校验（命令/查询至多一个处理器）与调用器合成
//! - 调度表（`registry`）：构建后只读，O(1) 查找
//! - 调用器（`invoker`）：类型擦除的统一签名，内部一次带检查的还原
//! - 服务定位（`locator`/`service_registry`）：处理器实例的外部解析契约及内存实现
//! - 中介者（`mediator`）：`send` / `ask` / `publish` 门面，环境上下文的复用或新建
//!
//! 典型用法：
//! 1. 定义消息并实现处理器，用 `#[derive(Handler)]` 声明其契约；
//! 2. 把处理器类型放入 `HandlerModule`，实例登记到 `ServiceRegistry`；
//! 3. `DefaultMediator::from_sources` 构建调度表并得到中介者；
//! 4. 通过 `Mediator` trait 调用。
//!
pub mod builder;
pub mod candidate;
pub mod erased;
pub mod invoker;
pub mod locator;
pub mod mediator;
pub mod options;
pub mod registry;
pub mod service_registry;
pub mod source;

pub use arbiter_abstractions as abstractions;
pub use arbiter_abstractions::{
    ArbiterError, ArbiterResult, CancellationToken, Command, CommandHandler, Mediator,
    MessageContext, MessageKind, Notification, NotificationHandler, Query, QueryHandler,
};

pub use builder::TableBuilder;
pub use candidate::{Candidate, CandidateType, ContractKind, HandlerContract};
pub use erased::Erased;
pub use locator::{ContractType, Resolved, ServiceLocator};
pub use mediator::DefaultMediator;
pub use options::MediatorOptions;
pub use registry::HandlerTable;
pub use service_registry::ServiceRegistry;
pub use source::{CandidateSource, HandlerModule, ScanError};

// 允许在本 crate 内部通过 ::arbiter_core 进行自引用，
// 以便派生宏在本 crate 的单元测试中也能解析到 ::arbiter_core 路径。
extern crate self as arbiter_core;
