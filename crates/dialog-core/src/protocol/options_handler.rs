//! OPTIONS Request Handler
//!
//! OPTIONS is used by SBCs as a keep-alive probe. It is answered out of
//! dialog with a fresh tag and the server's capabilities.

use std::net::SocketAddr;

use siprec_sip_core::Message;
use tracing::debug;

use crate::builders::ok_options;
use crate::dialog::generate_tag;
use crate::errors::DialogResult;
use crate::manager::CallManager;

/// OPTIONS-specific handling operations
pub trait OptionsHandler {
    fn handle_options_method(
        &self,
        request: Message,
        source: SocketAddr,
    ) -> impl std::future::Future<Output = DialogResult<()>> + Send;
}

impl OptionsHandler for CallManager {
    async fn handle_options_method(&self, request: Message, source: SocketAddr) -> DialogResult<()> {
        let response = ok_options(&request, source, &generate_tag(), self.identity())?;
        self.send(response, source).await?;
        debug!("Answered OPTIONS from {}", source);
        Ok(())
    }
}
