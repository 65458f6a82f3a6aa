use crate::bridge::{BridgeCommand, BridgeGateway, HostReply, PendingReplies};
use crate::callbacks::{ErrorHandler, SuccessHandler};
use crate::model::NavigationModel;

/// In-process gateway that records commands and lets the caller play the host
#[derive(Default)]
pub struct MemoryGateway {
    commands: Vec<BridgeCommand>,
    pending: PendingReplies,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command received, oldest first
    pub fn commands(&self) -> &[BridgeCommand] {
        &self.commands
    }

    /// Models received through `update`, oldest first
    pub fn models(&self) -> Vec<&NavigationModel> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                BridgeCommand::Update(model, _) => Some(model),
                _ => None,
            })
            .collect()
    }

    pub fn last_model(&self) -> Option<&NavigationModel> {
        self.models().pop()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Acknowledge every pending update; returns how many continuations fired
    pub fn acknowledge_all(&mut self) -> usize {
        self.pending
            .ids()
            .into_iter()
            .filter(|&id| self.pending.resolve(HostReply::ok(id)))
            .count()
    }

    /// Fail every pending update with `message`
    pub fn fail_all(&mut self, message: &str) -> usize {
        self.pending
            .ids()
            .into_iter()
            .filter(|&id| self.pending.resolve(HostReply::error(id, message)))
            .count()
    }
}

impl BridgeGateway for MemoryGateway {
    fn init(&mut self) {
        self.commands.push(BridgeCommand::Init);
    }

    fn update(&mut self, model: NavigationModel, force: bool, on_success: SuccessHandler, on_error: ErrorHandler) {
        let id = self.pending.next_request_id();
        self.pending.wait(id, on_success, on_error);
        self.commands.push(BridgeCommand::Update(model, force));
    }

    fn show(&mut self) {
        self.commands.push(BridgeCommand::Show);
    }

    fn hide(&mut self) {
        self.commands.push(BridgeCommand::Hide);
    }
}
