//! 服务定位器（Service Locator）契约
//!
//! 处理器实例的创建与生命周期由外部负责；调度核心只通过契约类型
//! （如 `dyn CommandHandler<C>`）请求一个或全部实现。实例以 `Arc<dyn …>`
//! 的形式装在 [`Erased`] 中传递，并附带实现类型名，以便调度时只使用构建期发现的实现。
//!
use crate::erased::Erased;
use arbiter_abstractions::ArbiterError;
use std::any::{TypeId, type_name};
use std::sync::Arc;

/// 处理器契约类型的运行时标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContractType {
    id: TypeId,
    name: &'static str,
}

impl ContractType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// 定位器解析出的一个实例
#[derive(Debug)]
pub struct Resolved {
    implementation: &'static str,
    service: Erased,
}

impl Resolved {
    pub fn new(implementation: &'static str, service: Erased) -> Self {
        Self {
            implementation,
            service,
        }
    }

    /// 实现类型名，与扫描得到的 `CandidateType::type_name` 对应
    pub fn implementation(&self) -> &'static str {
        self.implementation
    }

    pub fn into_service(self) -> Erased {
        self.service
    }
}

pub trait ServiceLocator: Send + Sync {
    /// 解析唯一实现；未注册或注册了多个时失败
    fn resolve_one(&self, contract: &ContractType) -> Result<Resolved, ArbiterError>;

    /// 解析全部实现，顺序必须稳定；未注册时返回空列表
    fn resolve_all(&self, contract: &ContractType) -> Result<Vec<Resolved>, ArbiterError>;
}

/// 以契约类型 `T` 解析唯一实现并还原为 `Arc<T>`
pub fn resolve_one<T>(locator: &dyn ServiceLocator) -> Result<Arc<T>, ArbiterError>
where
    T: ?Sized + Send + Sync + 'static,
{
    locator
        .resolve_one(&ContractType::of::<T>())?
        .into_service()
        .downcast::<Arc<T>>()
}

/// 以契约类型 `T` 解析全部实现，保持定位器给出的顺序
pub fn resolve_all<T>(locator: &dyn ServiceLocator) -> Result<Vec<Arc<T>>, ArbiterError>
where
    T: ?Sized + Send + Sync + 'static,
{
    locator
        .resolve_all(&ContractType::of::<T>())?
        .into_iter()
        .map(|r| r.into_service().downcast::<Arc<T>>())
        .collect()
}

/// 解析全部实现，只保留实现类型名在 `implementations` 中的实例（保持定位器顺序）
pub fn resolve_discovered<T>(
    locator: &dyn ServiceLocator,
    implementations: &[&'static str],
) -> Result<Vec<Arc<T>>, ArbiterError>
where
    T: ?Sized + Send + Sync + 'static,
{
    locator
        .resolve_all(&ContractType::of::<T>())?
        .into_iter()
        .filter(|r| implementations.contains(&r.implementation()))
        .map(|r| r.into_service().downcast::<Arc<T>>())
        .collect()
}

/// 在构建期发现的实现中解析唯一实例
pub fn resolve_single_discovered<T>(
    locator: &dyn ServiceLocator,
    implementations: &[&'static str],
) -> Result<Arc<T>, ArbiterError>
where
    T: ?Sized + Send + Sync + 'static,
{
    let mut found = resolve_discovered::<T>(locator, implementations)?;
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(ArbiterError::ServiceNotRegistered {
            contract: type_name::<T>(),
        }),
        count => Err(ArbiterError::AmbiguousService {
            contract: type_name::<T>(),
            count,
        }),
    }
}
