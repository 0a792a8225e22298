//! 类型擦除载荷（Erased）
//!
//! 外层调度只搬运不透明的载荷，内层强类型调用器执行一次显式、带检查的还原。
//! 载荷记住原始类型名，还原失败时能同时报告期望类型与实际类型。
//!
use arbiter_abstractions::ArbiterError;
use std::any::{Any, TypeId, type_name};
use std::fmt;

pub struct Erased {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Erased {
    pub fn new<T>(value: T) -> Self
    where
        T: Send + 'static,
    {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// 载荷实际类型的完整路径名
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        (*self.value).type_id() == TypeId::of::<T>()
    }

    /// 还原为具体类型；类型不符时返回 `TypeMismatch`，绝不做强制转换
    pub fn downcast<T: 'static>(self) -> Result<T, ArbiterError> {
        let found = self.type_name;
        match self.value.downcast::<T>() {
            Ok(v) => Ok(*v),
            Err(_) => Err(ArbiterError::TypeMismatch {
                expected: type_name::<T>(),
                found,
            }),
        }
    }
}

impl fmt::Debug for Erased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Erased")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
