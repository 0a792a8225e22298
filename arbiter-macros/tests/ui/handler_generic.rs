use arbiter_core::{CancellationToken, Candidate, Command, CommandHandler, MessageContext};
use arbiter_macros::Handler;
use async_trait::async_trait;
use std::marker::PhantomData;

struct Reset;

impl Command for Reset {
    type Result = ();
}

trait Store: Send + Sync + 'static {}

struct MemoryStore;
impl Store for MemoryStore {}

#[derive(Handler)]
#[handler(command = Reset)]
struct ResetHandler<S: Store> {
    _store: PhantomData<S>,
}

#[async_trait]
impl<S: Store> CommandHandler<Reset> for ResetHandler<S> {
    async fn handle(
        &self,
        _ctx: &MessageContext,
        _cmd: Reset,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

fn main() {
    assert_eq!(ResetHandler::<MemoryStore>::contracts().len(), 1);
}
