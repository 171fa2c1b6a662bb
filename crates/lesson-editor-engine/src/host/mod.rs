//! # Host Messages
//!
//! JSON messages exchanged with the application embedding the editor.
//!
//! Inbound [`HostCommand`]s toggle editing mode, clear the ledger or ask for
//! the current edits. Outbound [`HostMessage`]s broadcast every ledger
//! change and answer snapshot requests. Delivery is fire-and-forget: a
//! [`HostChannel`] that fails to send logs the failure and moves on.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ledger::{LedgerObserver, LedgerSnapshot};
use crate::session::LessonSession;

/// Commands the host sends to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostCommand {
    SetEditingMode { enabled: bool },
    ClearEdits,
    RequestEdits,
}

impl HostCommand {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Messages the editor sends to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostMessage {
    /// Broadcast after every ledger mutation.
    EditsChanged(LedgerSnapshot),
    /// Reply to [`HostCommand::RequestEdits`].
    EditsSnapshot(LedgerSnapshot),
}

/// Outbound transport to the host.
pub trait HostChannel {
    fn send(&mut self, message: &HostMessage);
}

impl<C: HostChannel + ?Sized> HostChannel for Rc<RefCell<C>> {
    fn send(&mut self, message: &HostMessage) {
        self.borrow_mut().send(message);
    }
}

/// Writes one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesChannel<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesChannel<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    fn write_line(&mut self, message: &HostMessage) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write> HostChannel for JsonLinesChannel<W> {
    fn send(&mut self, message: &HostMessage) {
        if let Err(err) = self.write_line(message) {
            warn!(%err, "dropping host message");
        }
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChannel;

impl HostChannel for NullChannel {
    fn send(&mut self, _message: &HostMessage) {}
}

/// Ledger observer broadcasting each change as [`HostMessage::EditsChanged`].
pub struct ChannelObserver<C: HostChannel> {
    channel: C,
}

impl<C: HostChannel> ChannelObserver<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }
}

impl<C: HostChannel> LedgerObserver for ChannelObserver<C> {
    fn ledger_changed(&mut self, snapshot: &LedgerSnapshot) {
        self.channel
            .send(&HostMessage::EditsChanged(snapshot.clone()));
    }
}

/// Subscribes `channel` to the session's ledger.
pub fn connect<C: HostChannel + 'static>(session: &mut LessonSession, channel: C) {
    session.ledger_mut().subscribe(ChannelObserver::new(channel));
}

/// Applies a host command. Returns the synchronous reply, if the command
/// has one.
pub fn handle_command(session: &mut LessonSession, command: &HostCommand) -> Option<HostMessage> {
    debug!(?command, "host command");
    match command {
        HostCommand::SetEditingMode { enabled } => {
            session.set_editing_enabled(*enabled);
            None
        }
        HostCommand::ClearEdits => {
            session.clear_edits();
            None
        }
        HostCommand::RequestEdits => Some(HostMessage::EditsSnapshot(session.ledger().snapshot())),
    }
}
