//! Shared fixtures for call flow tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use siprec_dialog_core::prelude::*;
use siprec_sip_core::{parse_message, Message};
use siprec_sip_transport::{Error as TransportError, Result as TransportResult, Transport};

pub const PEER: &str = "192.0.2.10:5060";
pub const SERVER_IP: &str = "10.0.0.100";
pub const CALL_ID: &str = "3089C795-74CB11E9-961DA422-D6FC9BE1@y.y.y.y";

/// A SIPREC INVITE from a Cisco SBC: two labelled audio streams and metadata
pub const CISCO_INVITE: &str = concat!(
    "INVITE sip:AAAA@10.0.0.100:5060 SIP/2.0\r\n",
    "Via: SIP/2.0/UDP y.y.y.y:5060;branch=z9hG4bK11BD2CA;rport\r\n",
    "From: <sip:y.y.y.y>;tag=F75AD7F-2065\r\n",
    "To: <sip:AAAA@10.0.0.100>\r\n",
    "Call-ID: 3089C795-74CB11E9-961DA422-D6FC9BE1@y.y.y.y\r\n",
    "Supported: 100rel,timer,resource-priority,replaces,sdp-anat\r\n",
    "Require: siprec\r\n",
    "CSeq: 101 INVITE\r\n",
    "Max-Forwards: 70\r\n",
    "Contact: <sip:y.y.y.y:5060>;+sip.src\r\n",
    "Session-Expires: 1800\r\n",
    "Content-Type: multipart/mixed;boundary=uniqueBoundary\r\n",
    "Mime-Version: 1.0\r\n",
    "\r\n",
    "--uniqueBoundary\r\n",
    "Content-Type: application/sdp\r\n",
    "Content-Disposition: session;handling=required\r\n",
    "\r\n",
    "v=0\r\n",
    "o=CiscoSystemsSIP-GW-UserAgent 5511 2889 IN IP4 y.y.y.y\r\n",
    "s=SIP Call\r\n",
    "c=IN IP4 y.y.y.y\r\n",
    "t=0 0\r\n",
    "m=audio 8086 RTP/AVP 0 101 19\r\n",
    "a=rtpmap:0 PCMU/8000\r\n",
    "a=rtpmap:101 telephone-event/8000\r\n",
    "a=sendonly\r\n",
    "a=label:1\r\n",
    "\r\n",
    "m=audio 8088 RTP/AVP 0 101 19\r\n",
    "a=rtpmap:0 PCMU/8000\r\n",
    "a=rtpmap:101 telephone-event/8000\r\n",
    "a=sendonly\r\n",
    "a=label:2\r\n",
    "\r\n",
    "--uniqueBoundary\r\n",
    "Content-Type: application/rs-metadata+xml\r\n",
    "Content-Disposition: recording-session\r\n",
    "\r\n",
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n",
    "<recording xmlns=\"urn:ietf:params:xml:ns:recording:1\">\r\n",
    "  <datamode>complete</datamode>\r\n",
    "</recording>\r\n",
    "\r\n",
    "--uniqueBoundary--\r\n",
);

/// One datagram handed to the mock transport
#[derive(Debug, Clone)]
pub struct Sent {
    pub raw: String,
    pub message: Message,
    pub destination: SocketAddr,
}

/// Transport that records every send instead of touching the network
#[derive(Debug)]
pub struct MockTransport {
    local: SocketAddr,
    sent: Mutex<Vec<Sent>>,
    closed: AtomicBool,
}

impl MockTransport {
    pub fn new(local: SocketAddr) -> Self {
        Self {
            local,
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn local_addr(&self) -> TransportResult<SocketAddr> {
        Ok(self.local)
    }

    async fn send_message(&self, data: Bytes, destination: SocketAddr) -> TransportResult<()> {
        if self.is_closed() {
            return Err(TransportError::TransportClosed);
        }
        let raw = String::from_utf8_lossy(&data).into_owned();
        let message = parse_message(&raw);
        self.sent.lock().unwrap().push(Sent { raw, message, destination });
        Ok(())
    }

    async fn close(&self) -> TransportResult<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

pub fn peer() -> SocketAddr {
    PEER.parse().unwrap()
}

pub fn test_config() -> ServerConfig {
    ServerConfig::default()
        .with_advertised_ip(SERVER_IP.parse().unwrap())
        .with_user_agent("siprec-test")
}

/// A manager over a mock transport bound to 10.0.0.100:5060
pub async fn setup() -> (CallManager, Arc<MockTransport>) {
    setup_with(test_config()).await
}

pub async fn setup_with(config: ServerConfig) -> (CallManager, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new("10.0.0.100:5060".parse().unwrap()));
    let manager = CallManager::new(config, transport.clone()).await.unwrap();
    (manager, transport)
}

pub fn invite() -> Message {
    parse_message(CISCO_INVITE)
}

/// ACK for the fixture call carrying the tag from our 200 OK
pub fn ack(to_tag: &str) -> Message {
    parse_message(&format!(
        "ACK sip:10.0.0.100:5060 SIP/2.0\r\n\
         Via: SIP/2.0/UDP y.y.y.y:5060;branch=z9hG4bK11BD3A1;rport\r\n\
         From: <sip:y.y.y.y>;tag=F75AD7F-2065\r\n\
         To: <sip:AAAA@10.0.0.100>;tag={}\r\n\
         Call-ID: {}\r\n\
         CSeq: 101 ACK\r\n\
         Max-Forwards: 70\r\n\
         Content-Length: 0\r\n\r\n",
        to_tag, CALL_ID
    ))
}

/// BYE from the peer for `call_id`
pub fn peer_bye(call_id: &str, to_tag: &str) -> Message {
    parse_message(&format!(
        "BYE sip:10.0.0.100:5060 SIP/2.0\r\n\
         Via: SIP/2.0/UDP y.y.y.y:5060;branch=z9hG4bK11BE1C9;rport\r\n\
         From: <sip:y.y.y.y>;tag=F75AD7F-2065\r\n\
         To: <sip:AAAA@10.0.0.100>;tag={}\r\n\
         Call-ID: {}\r\n\
         CSeq: 102 BYE\r\n\
         Max-Forwards: 70\r\n\
         Content-Length: 0\r\n\r\n",
        to_tag, call_id
    ))
}

pub fn options() -> Message {
    parse_message(
        "OPTIONS sip:siprec@10.0.0.100 SIP/2.0\r\n\
         Via: SIP/2.0/UDP 10.0.0.5:5060;branch=z9hG4bKopt;rport\r\n\
         From: <sip:check@10.0.0.5>;tag=1234\r\n\
         To: <sip:siprec@10.0.0.100>\r\n\
         Call-ID: check999@10.0.0.5\r\n\
         CSeq: 77 OPTIONS\r\n\r\n",
    )
}

/// The value of the `tag` parameter of a From/To header
pub fn tag_of(value: &str) -> Option<&str> {
    value
        .split(';')
        .skip(1)
        .find_map(|param| param.trim().strip_prefix("tag="))
}

/// Drain every event received so far
pub fn drain(events: &mut tokio::sync::broadcast::Receiver<CallEvent>) -> Vec<CallEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
