use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;

tokio::task_local! {
    static CURRENT: MessageContext;
}

/// 消息上下文（Message Context）
///
/// 承载一次调度（命令/查询/通知）所需的横切信息，例如：
/// - 关联追踪 `correlation_id`（始终存在）、因果链 `causation_id`；
/// - 租户 `tenant_id`、用户 `user_id`；
/// - 幂等键（`idempotency_key`）：用于在处理器或基础设施层实现请求幂等；
/// - 扩展项（`items`）：键唯一、值不透明的附加信息。
///
/// 上下文是不可变值：需要变化时构造一个新的上下文替换旧值，而不是原地修改。
///
/// 典型用法：
/// ```rust
/// use arbiter_abstractions::context::MessageContext;
///
/// let ctx = MessageContext::builder()
///     .correlation_id("cor-123")
///     .causation_id("cau-abc")
///     .tenant_id("t-1")
///     .user_id("u-1")
///     .idempotency_key("idem-xyz")
///     .build();
///
/// assert_eq!(ctx.correlation_id(), "cor-123");
/// assert_eq!(ctx.tenant_id(), Some("t-1"));
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    /// 关联ID（缺省时自动生成）
    #[builder(into, default = new_correlation_id())]
    correlation_id: String,
    /// 因果ID
    #[builder(into)]
    causation_id: Option<String>,
    /// 租户ID
    #[builder(into)]
    tenant_id: Option<String>,
    /// 用户ID
    #[builder(into)]
    user_id: Option<String>,
    /// 幂等键（可选）：为空则由处理器决定是否参与幂等
    #[builder(into)]
    idempotency_key: Option<String>,
    /// 扩展项
    #[builder(default)]
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    items: HashMap<String, Value>,
}

impl Default for MessageContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageContext {
    /// 生成一个全新的上下文：新的关联ID，其余字段为空
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    pub fn items(&self) -> &HashMap<String, Value> {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    /// 返回追加（或覆盖）了一个扩展项的新上下文，原上下文保持不变
    pub fn with_item(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.items.insert(key.into(), value.into());
        next
    }

    /// 当前逻辑流（tokio 任务）上的环境上下文；未建立时返回 `None`
    pub fn current() -> Option<MessageContext> {
        CURRENT.try_with(Clone::clone).ok()
    }

    /// 以 `self` 作为环境上下文执行 `fut`。
    ///
    /// 仅对该 future 所在的逻辑流生效；嵌套调用会替换（而非合并）外层上下文，
    /// 退出后恢复外层值。
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(self, fut).await
    }

    /// 同步版本的 [`scope`](Self::scope)
    pub fn sync_scope<F, R>(self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT.sync_scope(self, f)
    }
}

fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 环境上下文访问器
///
/// 中介者通过它读取当前逻辑流上的上下文；默认实现基于 tokio task-local。
pub trait ContextAccessor: Send + Sync {
    fn current(&self) -> Option<MessageContext>;
}

/// 基于 `tokio::task_local!` 的访问器，读取 [`MessageContext::scope`] 建立的值
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskLocalContextAccessor;

impl ContextAccessor for TaskLocalContextAccessor {
    fn current(&self) -> Option<MessageContext> {
        MessageContext::current()
    }
}
