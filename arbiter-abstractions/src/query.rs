/// 查询（Query）
///
/// 表达只读意图，不改变状态。
/// - 每个查询类型有且仅有一个处理器；
/// - 与 [`Command`](crate::command::Command) 相对，`Query` 应避免副作用。
pub trait Query: Send + 'static {
    /// 查询返回的结果类型
    type Result: Send + 'static;
}
