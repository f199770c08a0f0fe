//! Core CallManager implementation

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use siprec_sip_transport::{external_ip_or_loopback, Transport};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::call_table::CallTable;
use crate::builders::ServerIdentity;
use crate::config::ServerConfig;
use crate::dialog::{CallSession, CallState};
use crate::errors::DialogResult;
use crate::events::CallEvent;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Handles SIPREC calls arriving on a transport
#[derive(Clone)]
pub struct CallManager {
    inner: Arc<CallManagerInner>,
}

struct CallManagerInner {
    config: ServerConfig,
    transport: Arc<dyn Transport>,
    calls: CallTable,
    identity: ServerIdentity,
    events_tx: broadcast::Sender<CallEvent>,
}

impl CallManager {
    /// Create a manager sending through `transport`.
    ///
    /// The advertised address is `config.advertised_ip` if set, otherwise the
    /// discovered outbound interface address.
    pub async fn new(config: ServerConfig, transport: Arc<dyn Transport>) -> DialogResult<Self> {
        config.validate()?;

        let ip = match config.advertised_ip {
            Some(ip) => ip,
            None => external_ip_or_loopback().await,
        };
        let port = transport.local_addr()?.port();
        let identity = ServerIdentity::new(ip, port, config.user_agent.clone());
        info!("Advertising SIPREC server as {}", identity);

        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            inner: Arc::new(CallManagerInner {
                config,
                transport,
                calls: CallTable::spawn(),
                identity,
                events_tx,
            }),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.inner.identity
    }

    pub fn calls(&self) -> &CallTable {
        &self.inner.calls
    }

    /// Subscribe to call lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Current state of a call, `None` once it has been removed
    pub async fn call_state(&self, call_id: &str) -> DialogResult<Option<CallState>> {
        Ok(self.inner.calls.get(call_id).await?.map(|call| call.state()))
    }

    /// Snapshot of a call
    pub async fn call(&self, call_id: &str) -> DialogResult<Option<CallSession>> {
        self.inner.calls.get(call_id).await
    }

    pub async fn active_calls(&self) -> DialogResult<usize> {
        self.inner.calls.len().await
    }

    pub(crate) fn emit(&self, event: CallEvent) {
        // No subscribers is fine
        if self.inner.events_tx.send(event).is_err() {
            debug!("No subscribers for call event");
        }
    }

    pub(crate) async fn send(&self, text: String, destination: SocketAddr) -> DialogResult<()> {
        self.inner
            .transport
            .send_message(Bytes::from(text), destination)
            .await?;
        Ok(())
    }
}

impl fmt::Debug for CallManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallManager")
            .field("identity", &self.inner.identity)
            .field("transport", &self.inner.transport)
            .finish()
    }
}
