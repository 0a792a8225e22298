use crate::erased::Erased;
use crate::locator::{ContractType, Resolved, ServiceLocator};
use arbiter_abstractions::{
    ArbiterError, Command, CommandHandler, Notification, NotificationHandler, Query, QueryHandler,
};
use dashmap::DashMap;
use std::any::{TypeId, type_name};
use std::sync::Arc;
use tracing::debug;

type ServiceFactory = Arc<dyn Fn() -> Erased + Send + Sync>;

#[derive(Clone)]
struct ServiceEntry {
    implementation: &'static str,
    factory: ServiceFactory,
}

impl ServiceEntry {
    fn resolve(&self) -> Resolved {
        Resolved::new(self.implementation, (self.factory)())
    }
}

/// 基于内存的服务定位器实现
/// - 以契约类型（如 `dyn CommandHandler<C>`）的 TypeId 为键登记实现
/// - 同一契约可登记多个实现，`resolve_all` 按登记顺序返回
/// - 单例（共享同一个 `Arc`）与瞬态（每次解析调用工厂）两种生命周期
/// - 实现名需与处理器的 `type_name` 一致才会被中介者调度；
///   `add_*_handler` 自动使用 `std::any::type_name::<H>()`
pub struct ServiceRegistry {
    services: DashMap<TypeId, Vec<ServiceEntry>>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self {
            services: DashMap::new(),
        }
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记单例实现：每次解析返回同一个实例
    pub fn add_singleton<T>(&self, implementation: &'static str, service: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let factory: ServiceFactory = Arc::new(move || Erased::new(service.clone()));
        self.insert::<T>(implementation, factory);
    }

    /// 登记瞬态实现：每次解析都调用工厂创建新实例
    pub fn add_transient<T, F>(&self, implementation: &'static str, factory: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        let factory: ServiceFactory = Arc::new(move || Erased::new(factory()));
        self.insert::<T>(implementation, factory);
    }

    /// 登记命令处理器（单例）
    pub fn add_command_handler<C, H>(&self, handler: Arc<H>)
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        self.add_singleton::<dyn CommandHandler<C>>(type_name::<H>(), handler);
    }

    /// 登记查询处理器（单例）
    pub fn add_query_handler<Q, H>(&self, handler: Arc<H>)
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        self.add_singleton::<dyn QueryHandler<Q>>(type_name::<H>(), handler);
    }

    /// 登记通知处理器（单例）；同一通知可登记多个
    pub fn add_notification_handler<N, H>(&self, handler: Arc<H>)
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        self.add_singleton::<dyn NotificationHandler<N>>(type_name::<H>(), handler);
    }

    /// 获取某契约已登记的实现名列表（只读视图，按登记顺序）
    pub fn implementations(&self, contract: &ContractType) -> Vec<&'static str> {
        self.services
            .get(&contract.id())
            .map(|entries| entries.iter().map(|e| e.implementation).collect())
            .unwrap_or_default()
    }

    fn insert<T: ?Sized + 'static>(&self, implementation: &'static str, factory: ServiceFactory) {
        debug!(
            contract = type_name::<T>(),
            implementation, "service registered"
        );
        self.services
            .entry(TypeId::of::<T>())
            .or_default()
            .push(ServiceEntry {
                implementation,
                factory,
            });
    }

    // 先克隆出条目再调用工厂，避免工厂内回调注册表时持有分片锁
    fn entries(&self, contract: &ContractType) -> Vec<ServiceEntry> {
        self.services
            .get(&contract.id())
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl ServiceLocator for ServiceRegistry {
    fn resolve_one(&self, contract: &ContractType) -> Result<Resolved, ArbiterError> {
        match self.entries(contract).as_slice() {
            [] => Err(ArbiterError::ServiceNotRegistered {
                contract: contract.name(),
            }),
            [entry] => Ok(entry.resolve()),
            many => Err(ArbiterError::AmbiguousService {
                contract: contract.name(),
                count: many.len(),
            }),
        }
    }

    fn resolve_all(&self, contract: &ContractType) -> Result<Vec<Resolved>, ArbiterError> {
        Ok(self
            .entries(contract)
            .iter()
            .map(ServiceEntry::resolve)
            .collect())
    }
}
