//! The call table
//!
//! All calls live in a map owned by a single actor task. Everything else holds
//! a cloneable [`CallTable`] handle and sends it commands; each command is
//! applied in full before the next one is read, so check-then-act sequences
//! such as "remove the call only if it is still confirmed" are atomic.
//!
//! Each call also has a `watch` channel carrying its [`CallState`]. The actor
//! publishes every transition on it, which is what the ACK watchdog waits on.

use std::collections::HashMap;

use siprec_sip_core::SessionDescription;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, trace};

use crate::dialog::{CallSession, CallState};
use crate::errors::{DialogError, DialogResult};

const COMMAND_CHANNEL_CAPACITY: usize = 256;

type Reply<T> = oneshot::Sender<T>;

enum TableCommand {
    Insert {
        session: CallSession,
        reply: Reply<DialogResult<watch::Receiver<CallState>>>,
    },
    MarkAnswered {
        call_id: String,
        offer: SessionDescription,
        metadata: Option<String>,
        reply: Reply<DialogResult<CallState>>,
    },
    ReceiveAck {
        call_id: String,
        reply: Reply<DialogResult<()>>,
    },
    Remove {
        call_id: String,
        reply: Reply<Option<CallSession>>,
    },
    TakeConfirmed {
        call_id: String,
        reply: Reply<Option<CallSession>>,
    },
    Get {
        call_id: String,
        reply: Reply<Option<CallSession>>,
    },
    Len {
        reply: Reply<usize>,
    },
}

struct Entry {
    session: CallSession,
    state_tx: watch::Sender<CallState>,
}

impl Entry {
    fn publish(&self) {
        self.state_tx.send_replace(self.session.state());
    }
}

/// Handle to the call table actor
#[derive(Debug, Clone)]
pub struct CallTable {
    commands: mpsc::Sender<TableCommand>,
}

impl std::fmt::Debug for TableCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableCommand::Insert { .. } => "Insert",
            TableCommand::MarkAnswered { .. } => "MarkAnswered",
            TableCommand::ReceiveAck { .. } => "ReceiveAck",
            TableCommand::Remove { .. } => "Remove",
            TableCommand::TakeConfirmed { .. } => "TakeConfirmed",
            TableCommand::Get { .. } => "Get",
            TableCommand::Len { .. } => "Len",
        };
        f.write_str(name)
    }
}

impl CallTable {
    /// Start the actor; it stops once every handle is dropped
    pub fn spawn() -> Self {
        let (commands, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        tokio::spawn(run_actor(rx));
        Self { commands }
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> TableCommand) -> DialogResult<T> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| DialogError::internal("call table is not running"))?;
        rx.await
            .map_err(|_| DialogError::internal("call table dropped a reply"))
    }

    /// Add a new call; fails with `DialogExists` if the Call-ID is taken.
    ///
    /// Returns a receiver that observes every state change of the call.
    pub async fn insert(&self, session: CallSession) -> DialogResult<watch::Receiver<CallState>> {
        self.request(|reply| TableCommand::Insert { session, reply }).await?
    }

    /// Record that the 200 OK was sent; returns the resulting state
    pub async fn mark_answered(
        &self,
        call_id: &str,
        offer: SessionDescription,
        metadata: Option<String>,
    ) -> DialogResult<CallState> {
        let call_id = call_id.to_string();
        self.request(|reply| TableCommand::MarkAnswered { call_id, offer, metadata, reply })
            .await?
    }

    /// Apply an ACK; `UnknownDialog` if no such call
    pub async fn receive_ack(&self, call_id: &str) -> DialogResult<()> {
        let call_id = call_id.to_string();
        self.request(|reply| TableCommand::ReceiveAck { call_id, reply }).await?
    }

    /// Terminate and remove a call in any state
    pub async fn remove(&self, call_id: &str) -> DialogResult<Option<CallSession>> {
        let call_id = call_id.to_string();
        self.request(|reply| TableCommand::Remove { call_id, reply }).await
    }

    /// Terminate and remove a call only if it is confirmed
    pub async fn take_confirmed(&self, call_id: &str) -> DialogResult<Option<CallSession>> {
        let call_id = call_id.to_string();
        self.request(|reply| TableCommand::TakeConfirmed { call_id, reply }).await
    }

    /// Snapshot of a call
    pub async fn get(&self, call_id: &str) -> DialogResult<Option<CallSession>> {
        let call_id = call_id.to_string();
        self.request(|reply| TableCommand::Get { call_id, reply }).await
    }

    pub async fn len(&self) -> DialogResult<usize> {
        self.request(|reply| TableCommand::Len { reply }).await
    }
}

async fn run_actor(mut rx: mpsc::Receiver<TableCommand>) {
    let mut calls: HashMap<String, Entry> = HashMap::new();

    while let Some(command) = rx.recv().await {
        trace!("Call table command: {:?}", command);
        // A dropped reply receiver only means the caller stopped waiting
        match command {
            TableCommand::Insert { session, reply } => {
                let result = if calls.contains_key(&session.call_id) {
                    Err(DialogError::DialogExists { call_id: session.call_id })
                } else {
                    let (state_tx, state_rx) = watch::channel(session.state());
                    debug!("Registered call {}", session.call_id);
                    calls.insert(session.call_id.clone(), Entry { session, state_tx });
                    Ok(state_rx)
                };
                let _ = reply.send(result);
            }
            TableCommand::MarkAnswered { call_id, offer, metadata, reply } => {
                let result = match calls.get_mut(&call_id) {
                    Some(entry) => entry.session.mark_answered(offer, metadata).map(|_| {
                        entry.publish();
                        entry.session.state()
                    }),
                    None => Err(DialogError::unknown_dialog(call_id)),
                };
                let _ = reply.send(result);
            }
            TableCommand::ReceiveAck { call_id, reply } => {
                let result = match calls.get_mut(&call_id) {
                    Some(entry) => entry.session.receive_ack().map(|_| entry.publish()),
                    None => Err(DialogError::unknown_dialog(call_id)),
                };
                let _ = reply.send(result);
            }
            TableCommand::Remove { call_id, reply } => {
                let _ = reply.send(remove(&mut calls, &call_id));
            }
            TableCommand::TakeConfirmed { call_id, reply } => {
                let confirmed = calls
                    .get(&call_id)
                    .is_some_and(|entry| entry.session.state() == CallState::Confirmed);
                let taken = if confirmed { remove(&mut calls, &call_id) } else { None };
                let _ = reply.send(taken);
            }
            TableCommand::Get { call_id, reply } => {
                let _ = reply.send(calls.get(&call_id).map(|entry| entry.session.clone()));
            }
            TableCommand::Len { reply } => {
                let _ = reply.send(calls.len());
            }
        }
    }

    debug!("Call table stopped with {} calls", calls.len());
}

fn remove(calls: &mut HashMap<String, Entry>, call_id: &str) -> Option<CallSession> {
    let mut entry = calls.remove(call_id)?;
    entry.session.terminate();
    entry.publish();
    debug!("Unregistered call {}", call_id);
    Some(entry.session)
}
