/// 通知（Notification）
///
/// 已发生事实的广播，不返回结果。一个通知类型可以有零个或多个处理器，
/// 发布时按解析顺序依次执行。
pub trait Notification: Send + Sync + 'static {}
