//! Command channel to the native host shell
//!
//! The core talks to the host only through [`BridgeGateway`]: `init`, `update`,
//! `show` and `hide`. Only `update` carries continuations; they fire when the
//! host replies, on a later turn than the call itself.

pub mod json;
pub mod memory;

pub use json::JsonGateway;
pub use memory::MemoryGateway;

use crate::callbacks::{ErrorHandler, SuccessHandler};
use crate::error::NavError;
use crate::model::NavigationModel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The narrow interface the host shell implements
pub trait BridgeGateway {
    /// Prepare the native bar; fire-and-forget
    fn init(&mut self);

    /// Replace the native bar's contents with `model`
    fn update(&mut self, model: NavigationModel, force: bool, on_success: SuccessHandler, on_error: ErrorHandler);

    /// Fire-and-forget
    fn show(&mut self);

    /// Fire-and-forget
    fn hide(&mut self);
}

/// A command as it travels to the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", content = "args", rename_all = "lowercase")]
pub enum BridgeCommand {
    Init,
    /// `[model]`, or `[model, true]` when forcing
    #[serde(serialize_with = "update_args::serialize", deserialize_with = "update_args::deserialize")]
    Update(NavigationModel, bool),
    Show,
    Hide,
}

impl BridgeCommand {
    pub fn action(&self) -> &'static str {
        match self {
            BridgeCommand::Init => "init",
            BridgeCommand::Update(..) => "update",
            BridgeCommand::Show => "show",
            BridgeCommand::Hide => "hide",
        }
    }
}

mod update_args {
    use crate::model::NavigationModel;
    use serde::de::{self, SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(model: &NavigationModel, force: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(if *force { 2 } else { 1 }))?;
        seq.serialize_element(model)?;
        if *force {
            seq.serialize_element(force)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<(NavigationModel, bool), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ArgsVisitor)
    }

    struct ArgsVisitor;

    impl<'de> Visitor<'de> for ArgsVisitor {
        type Value = (NavigationModel, bool);

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("[model] or [model, force]")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let model = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(0, &self))?;
            let force = seq.next_element()?.unwrap_or(false);
            Ok((model, force))
        }
    }
}

/// Request id plus command, one JSON object per message
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub id: u64,

    #[serde(flatten)]
    pub command: &'a BridgeCommand,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Ok,
    Error,
}

/// The host's answer to a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostReply {
    pub id: u64,

    pub status: ReplyStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HostReply {
    pub fn ok(id: u64) -> Self {
        Self { id, status: ReplyStatus::Ok, message: None }
    }

    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            status: ReplyStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// Continuations waiting for a host reply, keyed by request id
#[derive(Default)]
pub struct PendingReplies {
    next_id: u64,
    waiting: IndexMap<u64, (SuccessHandler, ErrorHandler)>,
}

impl PendingReplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id for the next outgoing request
    pub fn next_request_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn wait(&mut self, id: u64, on_success: SuccessHandler, on_error: ErrorHandler) {
        self.waiting.insert(id, (on_success, on_error));
    }

    /// Fire the continuation matching `reply`; returns false if nothing was waiting
    pub fn resolve(&mut self, reply: HostReply) -> bool {
        let Some((on_success, on_error)) = self.waiting.shift_remove(&reply.id) else {
            log::debug!("No pending request for host reply {}", reply.id);
            return false;
        };

        match reply.status {
            ReplyStatus::Ok => on_success(),
            ReplyStatus::Error => on_error(&NavError::Host(reply.message.unwrap_or_default())),
        }
        true
    }

    /// Ids still waiting, oldest first
    pub fn ids(&self) -> Vec<u64> {
        self.waiting.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_command_wire_format() {
        let init = serde_json::to_value(Envelope { id: 1, command: &BridgeCommand::Init }).unwrap();
        assert_eq!(init, json!({"id": 1, "action": "init"}));

        let update = BridgeCommand::Update(NavigationModel::default(), true);
        let value = serde_json::to_value(Envelope { id: 2, command: &update }).unwrap();
        assert_eq!(value["action"], json!("update"));
        assert_eq!(value["args"][0]["nav"], json!("none"));
        assert_eq!(value["args"][1], json!(true));
        assert_eq!(update.action(), "update");

        let plain = BridgeCommand::Update(NavigationModel::default(), false);
        let value = serde_json::to_value(Envelope { id: 3, command: &plain }).unwrap();
        assert_eq!(value["args"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_update_args_parse() {
        let model = json!({"title": "Inbox", "nav": "back"});

        let plain: BridgeCommand = serde_json::from_value(json!({"action": "update", "args": [model]})).unwrap();
        assert!(matches!(plain, BridgeCommand::Update(ref m, false) if m.title == "Inbox"));

        let forced: BridgeCommand =
            serde_json::from_value(json!({"action": "update", "args": [model, true]})).unwrap();
        assert!(matches!(forced, BridgeCommand::Update(_, true)));

        assert!(serde_json::from_value::<BridgeCommand>(json!({"action": "update", "args": []})).is_err());
    }

    #[test]
    fn test_host_reply_parse() {
        let ok: HostReply = serde_json::from_str(r#"{"id": 3, "status": "ok"}"#).unwrap();
        assert_eq!(ok, HostReply::ok(3));

        let err: HostReply = serde_json::from_str(r#"{"id": 4, "status": "error", "message": "no bar"}"#).unwrap();
        assert_eq!(err, HostReply::error(4, "no bar"));
    }

    #[test]
    fn test_pending_resolve() {
        let successes = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));

        let mut pending = PendingReplies::new();
        let a = pending.next_request_id();
        let b = pending.next_request_id();
        assert_ne!(a, b);

        let s = successes.clone();
        let e = errors.clone();
        let on_success: SuccessHandler = Arc::new(move || {
            s.fetch_add(1, Ordering::SeqCst);
        });
        let on_error: ErrorHandler = Arc::new(move |err: &NavError| e.lock().unwrap().push(err.to_string()));

        pending.wait(a, on_success.clone(), on_error.clone());
        pending.wait(b, on_success, on_error);
        assert_eq!(pending.ids(), vec![a, b]);

        assert!(pending.resolve(HostReply::ok(a)));
        assert!(pending.resolve(HostReply::error(b, "Invalid Navigation Type")));
        assert!(!pending.resolve(HostReply::ok(a)));

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(*errors.lock().unwrap(), vec!["Invalid Navigation Type".to_string()]);
        assert!(pending.is_empty());
    }
}
