//! 候选来源（Candidate Source）
//!
//! 提供“所有可供检查的具体类型”。枚举对单个候选容错：无法检查的候选以
//! `Err(ScanError)` 形式给出，由构建器跳过，其余候选照常处理。
//!
use crate::candidate::{Candidate, CandidateType};
use std::fmt;
use std::sync::Arc;

/// 单个候选无法被检查
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("candidate {candidate} could not be inspected: {reason}")]
pub struct ScanError {
    candidate: String,
    reason: String,
}

impl ScanError {
    pub fn new(candidate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            reason: reason.into(),
        }
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

pub trait CandidateSource: Send + Sync {
    /// 来源名称（用于日志）
    fn name(&self) -> &str;

    /// 每个候选一项；失败项不影响其余候选
    fn candidates(&self) -> Vec<Result<CandidateType, ScanError>>;
}

type CandidateLoader = Arc<dyn Fn() -> Result<CandidateType, ScanError> + Send + Sync>;

/// 处理器模块：一组具名的候选类型
///
/// ```rust,ignore
/// let module = HandlerModule::new("orders")
///     .handler::<CreateOrderHandler>()
///     .handler::<OrderCreatedMailer>();
/// ```
#[derive(Clone)]
pub struct HandlerModule {
    name: String,
    loaders: Vec<CandidateLoader>,
}

impl HandlerModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaders: Vec::new(),
        }
    }

    /// 加入一个实现了 [`Candidate`] 的处理器类型
    pub fn handler<H: Candidate>(self) -> Self {
        self.loader(|| Ok(CandidateType::of::<H>()))
    }

    /// 加入一个手工描述的候选
    pub fn candidate(self, candidate: CandidateType) -> Self {
        self.loader(move || Ok(candidate.clone()))
    }

    /// 加入一个延迟加载的候选，加载失败时该候选被跳过
    pub fn loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<CandidateType, ScanError> + Send + Sync + 'static,
    {
        self.loaders.push(Arc::new(loader));
        self
    }
}

impl CandidateSource for HandlerModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn candidates(&self) -> Vec<Result<CandidateType, ScanError>> {
        self.loaders.iter().map(|load| load()).collect()
    }
}

impl fmt::Debug for HandlerModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerModule")
            .field("name", &self.name)
            .field("candidates", &self.loaders.len())
            .finish()
    }
}
