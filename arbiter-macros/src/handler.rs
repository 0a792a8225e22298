use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    DeriveInput, Ident, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[derive(Handler)] 宏实现
/// - 收集全部 `#[handler(kind = Type, ...)]` 契约，kind ∈ command | query | notification
/// - 至少需要一个契约；同一契约重复声明视为错误
/// - 生成 `Candidate::contracts()`，按声明顺序返回 `HandlerContract`
pub(crate) fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let contracts = match collect_contracts(&input) {
        Ok(c) => c,
        Err(err) => return err.to_compile_error().into(),
    };

    if contracts.is_empty() {
        return syn::Error::new(
            input.ident.span(),
            "#[derive(Handler)] requires at least one #[handler(command = .. | query = .. | notification = ..)]",
        )
        .to_compile_error()
        .into();
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let entries = contracts.iter().map(|c| {
        let ty = &c.ty;
        let ctor = c.kind.constructor();
        quote! { ::arbiter_core::candidate::HandlerContract::#ctor::<#ty, Self>() }
    });

    let out = quote! {
        impl #impl_generics ::arbiter_core::candidate::Candidate for #ident #ty_generics #where_clause {
            fn contracts() -> ::std::vec::Vec<::arbiter_core::candidate::HandlerContract> {
                ::std::vec![ #( #entries ),* ]
            }
        }
    };

    TokenStream::from(out)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ContractKind {
    Command,
    Query,
    Notification,
}

impl ContractKind {
    fn from_ident(key: &Ident) -> Result<Self> {
        match key.to_string().as_str() {
            "command" => Ok(Self::Command),
            "query" => Ok(Self::Query),
            "notification" => Ok(Self::Notification),
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key; expected 'command' | 'query' | 'notification'",
            )),
        }
    }

    fn constructor(&self) -> Ident {
        let name = match self {
            Self::Command => "command",
            Self::Query => "query",
            Self::Notification => "notification",
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }
}

struct Contract {
    kind: ContractKind,
    ty: Type,
}

fn collect_contracts(input: &DeriveInput) -> Result<Vec<Contract>> {
    let mut out: Vec<Contract> = Vec::new();
    // 以 (种类, 类型文本) 判重
    let mut seen: Vec<(ContractKind, String)> = Vec::new();

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("handler")) {
        let pairs: Punctuated<KvType, Token![,]> =
            attr.parse_args_with(Punctuated::<KvType, Token![,]>::parse_terminated)?;

        for kv in pairs {
            let kind = ContractKind::from_ident(&kv.key)?;
            let key = (kind, kv.ty.to_token_stream().to_string());
            if seen.contains(&key) {
                return Err(syn::Error::new(
                    kv.ty.span(),
                    "duplicate handler contract in attribute",
                ));
            }
            seen.push(key);
            out.push(Contract { kind, ty: kv.ty });
        }
    }

    Ok(out)
}

// 解析键值参数：<kind> = <Type>
struct KvType {
    key: Ident,
    #[allow(dead_code)]
    eq: Token![=],
    ty: Type,
}

impl Parse for KvType {
    fn parse(input: ParseStream) -> Result<Self> {
        Ok(Self {
            key: input.parse()?,
            eq: input.parse()?,
            ty: input.parse()?,
        })
    }
}
