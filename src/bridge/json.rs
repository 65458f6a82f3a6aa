use crate::bridge::{BridgeCommand, BridgeGateway, Envelope, HostReply, PendingReplies};
use crate::callbacks::{ErrorHandler, SuccessHandler};
use crate::error::{NavError, Result};
use crate::model::NavigationModel;
use std::io::Write;

/// Writes each command as one JSON line; replies are fed back with [`JsonGateway::handle_reply`]
pub struct JsonGateway<W> {
    writer: W,
    pending: PendingReplies,
}

impl<W: Write> JsonGateway<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending: PendingReplies::new(),
        }
    }

    fn send(&mut self, command: &BridgeCommand) -> Result<u64> {
        let id = self.pending.next_request_id();
        let line = serde_json::to_string(&Envelope { id, command })?;

        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| NavError::Transport(format!("Failed to send {}: {}", command.action(), e)))?;

        log::debug!("Sent {} request {}", command.action(), id);
        Ok(id)
    }

    fn send_without_reply(&mut self, command: BridgeCommand) {
        if let Err(e) = self.send(&command) {
            log::warn!("{}", e);
        }
    }

    /// Parse one reply line from the host and fire its continuation
    pub fn handle_reply(&mut self, line: &str) -> Result<bool> {
        let reply: HostReply = serde_json::from_str(line.trim())?;
        Ok(self.resolve(reply))
    }

    pub fn resolve(&mut self, reply: HostReply) -> bool {
        self.pending.resolve(reply)
    }

    /// Number of updates still waiting for the host
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> BridgeGateway for JsonGateway<W> {
    fn init(&mut self) {
        self.send_without_reply(BridgeCommand::Init);
    }

    fn update(&mut self, model: NavigationModel, force: bool, on_success: SuccessHandler, on_error: ErrorHandler) {
        match self.send(&BridgeCommand::Update(model, force)) {
            Ok(id) => self.pending.wait(id, on_success, on_error),
            Err(e) => on_error(&e),
        }
    }

    fn show(&mut self) {
        self.send_without_reply(BridgeCommand::Show);
    }

    fn hide(&mut self) {
        self.send_without_reply(BridgeCommand::Hide);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "host went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(gateway: &JsonGateway<Vec<u8>>) -> Vec<serde_json::Value> {
        String::from_utf8(gateway.writer().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_commands_written_as_lines() {
        let mut gateway = JsonGateway::new(Vec::new());
        gateway.init();
        gateway.update(NavigationModel::default(), false, Arc::new(|| {}), Arc::new(|_: &NavError| {}));
        gateway.show();
        gateway.hide();

        let sent = lines(&gateway);
        let actions: Vec<_> = sent.iter().map(|v| v["action"].as_str().unwrap().to_string()).collect();
        assert_eq!(actions, vec!["init", "update", "show", "hide"]);
        assert_eq!(sent[1]["id"], serde_json::json!(2));
        assert_eq!(gateway.pending(), 1);
    }

    #[test]
    fn test_reply_fires_success() {
        let successes = Arc::new(AtomicUsize::new(0));
        let s = successes.clone();

        let mut gateway = JsonGateway::new(Vec::new());
        gateway.update(
            NavigationModel::default(),
            false,
            Arc::new(move || {
                s.fetch_add(1, Ordering::SeqCst);
            }),
            Arc::new(|_: &NavError| {}),
        );

        assert!(gateway.handle_reply(r#"{"id": 1, "status": "ok"}"#).unwrap());
        assert!(!gateway.handle_reply(r#"{"id": 1, "status": "ok"}"#).unwrap());
        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert!(gateway.handle_reply("not json").is_err());
    }

    #[test]
    fn test_transport_failure_goes_to_error_continuation() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let e = errors.clone();

        let mut gateway = JsonGateway::new(BrokenPipe);
        gateway.init();
        gateway.update(
            NavigationModel::default(),
            false,
            Arc::new(|| {}),
            Arc::new(move |err: &NavError| e.lock().unwrap().push(err.to_string())),
        );

        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Failed to send update"));
        assert_eq!(gateway.pending(), 0);
    }
}
