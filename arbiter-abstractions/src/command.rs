/// 命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改状态，并返回一个结果。
/// - 每个命令类型有且仅有一个处理器（构建调度表时校验）；
/// - 与 [`Query`](crate::query::Query) 相对，`Command` 允许产生副作用；
/// - 建议保持语义化的“动宾结构”命名，如 `CreateOrder`、`CloseOrder`。
pub trait Command: Send + 'static {
    /// 命令执行后返回的结果类型
    type Result: Send + 'static;
}
