use proc_macro::TokenStream;

mod handler;

/// 处理器派生宏
/// - 通过一个或多个 `#[handler(...)]` 声明类型实现的处理器契约：
///   `command = C`、`query = Q`、`notification = N`（可重复）
/// - 生成 `::arbiter_core::candidate::Candidate` 实现，供调度表构建时扫描
/// - 每个契约都带有 `Self: CommandHandler<C>` 等约束，声明与实现不一致时编译失败
///
/// ```rust,ignore
/// #[derive(Handler)]
/// #[handler(command = CreateOrder, notification = OrderCreated)]
/// struct OrderService;
/// ```
#[proc_macro_derive(Handler, attributes(handler))]
pub fn derive_handler(input: TokenStream) -> TokenStream {
    handler::expand(input)
}
