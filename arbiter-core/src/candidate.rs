//! 候选处理器类型（Candidate）
//!
//! 描述一个具体实现类型所实现的全部处理器契约。每个契约记录
//! `(契约种类, 消息类型, 结果类型)`，并携带一个把具体类型固化进统一签名的
//! 调用器合成函数。契约构造函数要求 `H: CommandHandler<C>` 等约束，
//! 因此声明的契约在编译期就完成了结构匹配校验。
//!
use crate::invoker::{self, NotificationInvoker, RequestInvoker};
use arbiter_abstractions::{
    Command, CommandHandler, MessageKind, Notification, NotificationHandler, Query, QueryHandler,
};
use std::any::{TypeId, type_name};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    Command,
    Query,
    Notification,
}

impl ContractKind {
    /// 单一处理器槽位的种类；通知返回 `None`
    pub fn message_kind(&self) -> Option<MessageKind> {
        match self {
            ContractKind::Command => Some(MessageKind::Command),
            ContractKind::Query => Some(MessageKind::Query),
            ContractKind::Notification => None,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum Synthesizer {
    Request(fn() -> RequestInvoker),
    Notification(fn() -> NotificationInvoker),
}

/// 一个具体的处理器契约
#[derive(Clone)]
pub struct HandlerContract {
    kind: ContractKind,
    message_type: TypeId,
    message_name: &'static str,
    result_name: Option<&'static str>,
    synthesizer: Synthesizer,
}

impl HandlerContract {
    /// `H` 作为命令 `C` 的处理器
    pub fn command<C, H>() -> Self
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        Self {
            kind: ContractKind::Command,
            message_type: TypeId::of::<C>(),
            message_name: type_name::<C>(),
            result_name: Some(type_name::<C::Result>()),
            synthesizer: Synthesizer::Request(invoker::command_invoker::<C>),
        }
    }

    /// `H` 作为查询 `Q` 的处理器
    pub fn query<Q, H>() -> Self
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        Self {
            kind: ContractKind::Query,
            message_type: TypeId::of::<Q>(),
            message_name: type_name::<Q>(),
            result_name: Some(type_name::<Q::Result>()),
            synthesizer: Synthesizer::Request(invoker::query_invoker::<Q>),
        }
    }

    /// `H` 作为通知 `N` 的处理器之一
    pub fn notification<N, H>() -> Self
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        Self {
            kind: ContractKind::Notification,
            message_type: TypeId::of::<N>(),
            message_name: type_name::<N>(),
            result_name: None,
            synthesizer: Synthesizer::Notification(invoker::notification_invoker::<N>),
        }
    }

    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn message_type(&self) -> TypeId {
        self.message_type
    }

    pub fn message_name(&self) -> &'static str {
        self.message_name
    }

    pub fn result_name(&self) -> Option<&'static str> {
        self.result_name
    }

    pub(crate) fn synthesizer(&self) -> Synthesizer {
        self.synthesizer
    }
}

impl fmt::Debug for HandlerContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerContract")
            .field("kind", &self.kind)
            .field("message", &self.message_name)
            .field("result", &self.result_name)
            .finish()
    }
}

/// 可被扫描的处理器类型，通常由 `#[derive(Handler)]` 实现
pub trait Candidate: 'static {
    fn contracts() -> Vec<HandlerContract>;
}

/// 一个候选实现类型及其契约
#[derive(Clone, Debug)]
pub struct CandidateType {
    type_id: TypeId,
    type_name: &'static str,
    contracts: Vec<HandlerContract>,
}

impl CandidateType {
    pub fn of<H: Candidate>() -> Self {
        Self::new::<H>(H::contracts())
    }

    pub fn new<H: 'static>(contracts: Vec<HandlerContract>) -> Self {
        Self {
            type_id: TypeId::of::<H>(),
            type_name: type_name::<H>(),
            contracts,
        }
    }

    pub fn with_contract(mut self, contract: HandlerContract) -> Self {
        self.contracts.push(contract);
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 实现类型的完整路径名
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 去掉模块路径后的类型名
    pub fn short_name(&self) -> &'static str {
        let path = self.type_name.split('<').next().unwrap_or(self.type_name);
        match path.rfind("::") {
            Some(idx) => &self.type_name[idx + 2..],
            None => self.type_name,
        }
    }

    pub fn contracts(&self) -> &[HandlerContract] {
        &self.contracts
    }
}
