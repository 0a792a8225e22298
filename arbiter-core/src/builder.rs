//! 调度表构建器（Table Builder）
//!
//! 把一组无序的候选类型转换为经过校验、不可变的调度表：
//! 1. 枚举全部来源的候选，跳过无法检查的项，应用类型过滤；
//! 2. 记录每个候选声明的 `(契约种类, 消息, 结果, 实现类型)`；
//! 3. 唯一性校验：同一命令/查询类型出现多个不同实现时，汇总全部冲突后一次性失败；
//! 4. 为每个 (种类, 消息) 合成一个调用器，为每个通知类型合成一个扇出调用器。
//!
//! 构建没有任何全局副作用，同样的输入总是得到等价的调度表。
//!
use crate::candidate::{CandidateType, HandlerContract, Synthesizer};
use crate::options::MediatorOptions;
use crate::registry::{HandlerKey, HandlerTable, NotificationRoute, RequestRoute};
use crate::source::CandidateSource;
use arbiter_abstractions::{ArbiterError, DuplicateHandler};
use std::any::TypeId;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Default)]
pub struct TableBuilder {
    options: MediatorOptions,
}

struct Discovered<'c> {
    implementation: &'c CandidateType,
    contract: &'c HandlerContract,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MediatorOptions) -> Self {
        Self { options }
    }

    /// 构建调度表；存在重复的命令/查询处理器时整体失败，不产生部分结果
    pub fn build(&self, sources: &[&dyn CandidateSource]) -> Result<HandlerTable, ArbiterError> {
        let candidates = self.enumerate(sources);

        let discovered: Vec<Discovered<'_>> = candidates
            .iter()
            .flat_map(|implementation| {
                implementation
                    .contracts()
                    .iter()
                    .map(move |contract| Discovered {
                        implementation,
                        contract,
                    })
            })
            .collect();

        let mut detector = DuplicateDetector::default();
        for d in &discovered {
            detector.track(d);
        }
        detector.into_result()?;

        let table = synthesize(&discovered);
        info!(
            candidates = candidates.len(),
            commands = table.commands().len(),
            queries = table.queries().len(),
            notifications = table.notifications().len(),
            "handler table built"
        );
        Ok(table)
    }

    fn enumerate(&self, sources: &[&dyn CandidateSource]) -> Vec<CandidateType> {
        let mut out = Vec::new();
        for source in sources {
            for entry in source.candidates() {
                match entry {
                    Ok(candidate) if self.options.accepts(&candidate) => out.push(candidate),
                    Ok(candidate) => {
                        debug!(
                            source = source.name(),
                            candidate = candidate.type_name(),
                            "candidate excluded by type filter"
                        );
                    }
                    Err(err) => {
                        warn!(source = source.name(), error = %err, "skipping candidate");
                    }
                }
            }
        }
        out
    }
}

fn synthesize(discovered: &[Discovered<'_>]) -> HandlerTable {
    let mut table = HandlerTable::default();

    for d in discovered {
        let contract = d.contract;
        match contract.synthesizer() {
            Synthesizer::Request(make) => {
                let Some(kind) = contract.kind().message_kind() else {
                    continue;
                };
                let key = HandlerKey::new(kind, contract.message_type());
                // 同一实现类型可能被多个来源重复列出，只合成一次
                if table.contains_single(&key) {
                    continue;
                }
                table.insert_single(
                    key,
                    RequestRoute::new(
                        contract.message_name(),
                        contract.result_name().unwrap_or("()"),
                        d.implementation.type_name(),
                        make(),
                    ),
                );
            }
            Synthesizer::Notification(make) => {
                table
                    .notification_entry(contract.message_type(), || {
                        NotificationRoute::new(contract.message_name(), make())
                    })
                    .add_handler(d.implementation.type_name());
            }
        }
    }

    table
}

/// 命令/查询的重复实现检测（通知不参与）
#[derive(Default)]
struct DuplicateDetector {
    groups: Vec<Group>,
    index: HashMap<HandlerKey, usize>,
}

struct Group {
    key: HandlerKey,
    message: &'static str,
    implementations: Vec<(TypeId, &'static str)>,
}

impl DuplicateDetector {
    fn track(&mut self, d: &Discovered<'_>) {
        let Some(kind) = d.contract.kind().message_kind() else {
            return;
        };
        let key = HandlerKey::new(kind, d.contract.message_type());

        let idx = *self.index.entry(key).or_insert_with(|| {
            self.groups.push(Group {
                key,
                message: d.contract.message_name(),
                implementations: Vec::new(),
            });
            self.groups.len() - 1
        });

        let group = &mut self.groups[idx];
        let implementation = (d.implementation.type_id(), d.implementation.type_name());
        if !group
            .implementations
            .iter()
            .any(|(id, _)| *id == implementation.0)
        {
            group.implementations.push(implementation);
        }
    }

    fn into_result(self) -> Result<(), ArbiterError> {
        let mut duplicates: Vec<DuplicateHandler> = self
            .groups
            .into_iter()
            .filter(|g| g.implementations.len() > 1)
            .map(|g| DuplicateHandler {
                kind: g.key.kind(),
                message: g.message,
                handlers: g.implementations.into_iter().map(|(_, name)| name).collect(),
            })
            .collect();

        if duplicates.is_empty() {
            return Ok(());
        }

        // 命令在前、查询在后；同类内保持发现顺序
        duplicates.sort_by_key(|d| d.kind);
        for d in &duplicates {
            warn!(
                kind = %d.kind,
                message = d.message,
                handlers = ?d.handlers,
                "duplicate handlers"
            );
        }
        Err(ArbiterError::DuplicateHandlers { duplicates })
    }
}
