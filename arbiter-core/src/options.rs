use crate::candidate::CandidateType;
use std::fmt;
use std::sync::Arc;

pub type TypeFilter = Arc<dyn Fn(&CandidateType) -> bool + Send + Sync>;

/// 中介者配置
#[derive(Clone, Default)]
pub struct MediatorOptions {
    /// 候选类型过滤：返回 `false` 的候选在检查前即被排除；为空时全部保留
    pub type_filter: Option<TypeFilter>,
}

impl MediatorOptions {
    pub fn with_type_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&CandidateType) -> bool + Send + Sync + 'static,
    {
        self.type_filter = Some(Arc::new(filter));
        self
    }

    pub(crate) fn accepts(&self, candidate: &CandidateType) -> bool {
        self.type_filter
            .as_ref()
            .is_none_or(|filter| filter(candidate))
    }
}

impl fmt::Debug for MediatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediatorOptions")
            .field("type_filter", &self.type_filter.is_some())
            .finish()
    }
}
