//! End-to-end call flows against a mock transport
//!
//! All tests run on tokio's paused clock, so the 30 s ACK timeout and the
//! 10 s teardown delay elapse instantly and deterministically.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use siprec_dialog_core::prelude::*;
use siprec_sip_core::{parse_sdp, CSeq, Method, ViaParams};
use siprec_sip_transport::TransportEvent;
use tokio::sync::mpsc;
use tokio::time::sleep;

use common::*;

/// Send the fixture INVITE and return the tag from our 200 OK
async fn establish(manager: &CallManager, transport: &MockTransport) -> String {
    manager.handle_message(invite(), peer()).await;
    let sent = transport.sent();
    assert_eq!(sent.len(), 2, "expected 100 Trying and 200 OK");
    tag_of(sent[1].message.header("To").unwrap()).unwrap().to_string()
}

#[tokio::test(start_paused = true)]
async fn test_invite_gets_trying_then_ok() {
    let (manager, transport) = setup().await;
    let mut events = manager.subscribe();

    manager.handle_message(invite(), peer()).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    let request = invite();

    let trying = &sent[0];
    assert_eq!(trying.destination, peer());
    assert_eq!(trying.message.status_code(), Some(100));
    assert_eq!(trying.message.call_id(), Some(CALL_ID));
    assert_eq!(trying.message.cseq().unwrap(), CSeq::new(101, Method::Invite));
    assert_eq!(trying.message.header("From"), request.header("From"));
    assert_eq!(trying.message.header("To"), request.header("To"));
    assert_eq!(
        trying.message.header("Via"),
        Some("SIP/2.0/UDP y.y.y.y:5060;rport=5060;received=192.0.2.10;branch=z9hG4bK11BD2CA")
    );

    let ok = &sent[1];
    assert_eq!(ok.destination, peer());
    assert_eq!(ok.message.start_line, "SIP/2.0 200 OK");
    let tag = tag_of(ok.message.header("To").unwrap()).unwrap();
    assert_eq!(tag.len(), 8);
    assert_eq!(ok.message.header("Contact"), Some("<sip:10.0.0.100:5060>;+sip.srs"));
    assert_eq!(ok.message.header("Session-Expires"), Some("1800;refresher=uas"));
    assert_eq!(ok.message.content_type(), Some("application/sdp"));
    assert_eq!(
        ok.message.header("Content-Length").unwrap(),
        ok.message.body.len().to_string()
    );
    assert!(ok.raw.ends_with(&ok.message.body));

    let answer = parse_sdp(&ok.message.body).unwrap();
    assert_eq!(answer.labels(), vec![Some("1"), Some("2")]);
    assert_eq!(answer.media[0].port, 10000);
    assert_eq!(answer.media[1].port, 10002);
    assert_eq!(answer.session.connection.as_deref(), Some("IN IP4 10.0.0.100"));
    assert!(answer.media.iter().all(|m| m.direction() == Some("recvonly")));

    let call = manager.call(CALL_ID).await.unwrap().unwrap();
    assert_eq!(call.state(), CallState::AwaitingAck);
    assert_eq!(call.to_tag, tag);
    assert!(call.metadata.as_deref().unwrap().contains("<datamode>complete</datamode>"));

    let events = drain(&mut events);
    assert!(matches!(
        events.as_slice(),
        [CallEvent::CallEstablished { call_id, offer, .. }] if call_id == CALL_ID && offer.media.len() == 2
    ));
}

#[tokio::test(start_paused = true)]
async fn test_ack_then_teardown_bye() {
    let (manager, transport) = setup().await;
    let mut events = manager.subscribe();
    let tag = establish(&manager, &transport).await;

    manager.handle_message(ack(&tag), peer()).await;
    assert_eq!(manager.call_state(CALL_ID).await.unwrap(), Some(CallState::Confirmed));
    // ACK is never answered
    assert_eq!(transport.sent().len(), 2);

    sleep(Duration::from_secs(9)).await;
    assert_eq!(transport.sent().len(), 2);

    sleep(Duration::from_secs(2)).await;
    let sent = transport.sent();
    assert_eq!(sent.len(), 3);

    let bye = &sent[2];
    assert_eq!(bye.destination, peer());
    assert_eq!(bye.message.method(), Some(Method::Bye));
    assert_eq!(bye.message.request_line().unwrap().uri, "sip:y.y.y.y:5060");
    assert_eq!(bye.message.cseq().unwrap(), CSeq::new(102, Method::Bye));
    assert_eq!(bye.message.call_id(), Some(CALL_ID));
    assert_eq!(tag_of(bye.message.header("From").unwrap()), Some(tag.as_str()));
    assert_eq!(bye.message.header("To"), Some("<sip:y.y.y.y>;tag=F75AD7F-2065"));
    let via = ViaParams::parse(bye.message.header("Via").unwrap());
    assert_eq!(via.sent_by, "SIP/2.0/UDP 10.0.0.100:5060");

    assert_eq!(manager.call_state(CALL_ID).await.unwrap(), None);
    assert_eq!(manager.active_calls().await.unwrap(), 0);

    let events = drain(&mut events);
    assert!(events.iter().any(|e| matches!(e, CallEvent::CallConfirmed { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        CallEvent::CallTerminated { reason: TerminationReason::LocalTeardown, .. }
    )));
    assert!(!events.iter().any(|e| matches!(e, CallEvent::AckTimeout { .. })));

    // Nothing else fires later
    sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_missing_ack_reports_timeout_and_keeps_call() {
    let (manager, transport) = setup().await;
    let mut events = manager.subscribe();
    establish(&manager, &transport).await;

    sleep(Duration::from_secs(29)).await;
    assert!(!drain(&mut events).iter().any(|e| matches!(e, CallEvent::AckTimeout { .. })));

    sleep(Duration::from_secs(2)).await;
    let events = drain(&mut events);
    assert!(matches!(
        events.as_slice(),
        [CallEvent::AckTimeout { call_id }] if call_id == CALL_ID
    ));

    assert_eq!(manager.call_state(CALL_ID).await.unwrap(), Some(CallState::AwaitingAck));
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_peer_bye_echoes_session_tag() {
    let (manager, transport) = setup().await;
    let mut events = manager.subscribe();
    let tag = establish(&manager, &transport).await;
    manager.handle_message(ack(&tag), peer()).await;

    // The peer echoes our tag; the response must carry the session's tag either way
    manager.handle_message(peer_bye(CALL_ID, "something-else"), peer()).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    let ok = &sent[2].message;
    assert_eq!(ok.status_code(), Some(200));
    assert_eq!(ok.cseq().unwrap(), CSeq::new(102, Method::Bye));
    assert_eq!(tag_of(ok.header("To").unwrap()), Some(tag.as_str()));
    assert_eq!(manager.call_state(CALL_ID).await.unwrap(), None);

    // The teardown timer finds nothing to do
    sleep(Duration::from_secs(30)).await;
    assert_eq!(transport.sent().len(), 3);

    let events = drain(&mut events);
    let terminated: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, CallEvent::CallTerminated { .. }))
        .collect();
    assert_eq!(terminated.len(), 1);
    assert!(matches!(
        terminated[0],
        CallEvent::CallTerminated { reason: TerminationReason::RemoteBye, .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_bye_before_ack_terminates() {
    let (manager, transport) = setup().await;
    let tag = establish(&manager, &transport).await;

    manager.handle_message(peer_bye(CALL_ID, &tag), peer()).await;
    assert_eq!(manager.call_state(CALL_ID).await.unwrap(), None);

    // A late ACK is an orphan now
    manager.handle_message(ack(&tag), peer()).await;
    sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_orphan_ack_and_bye() {
    let (manager, transport) = setup().await;

    manager.handle_message(ack("nope"), peer()).await;
    assert!(transport.sent().is_empty());

    manager.handle_message(peer_bye("unknown@host", "999"), peer()).await;
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.status_code(), Some(200));
    assert_eq!(sent[0].message.call_id(), Some("unknown@host"));
    assert_eq!(sent[0].message.header("To"), Some("<sip:AAAA@10.0.0.100>;tag=999"));
}

#[tokio::test(start_paused = true)]
async fn test_options_gets_capabilities_and_fresh_tags() {
    let (manager, transport) = setup().await;
    let source = "10.0.0.5:5070".parse().unwrap();

    manager.handle_message(options(), source).await;
    manager.handle_message(options(), source).await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    let first = &sent[0].message;
    assert_eq!(sent[0].destination, source);
    assert_eq!(first.status_code(), Some(200));
    assert_eq!(first.header("Allow"), Some("INVITE, ACK, BYE, OPTIONS"));
    assert_eq!(
        first.header("Accept"),
        Some("application/sdp, multipart/mixed, application/rs-metadata+xml")
    );
    assert_eq!(first.header("Accept-Language"), Some("en"));
    assert_eq!(first.header("Supported"), Some("siprec, timer"));
    assert_eq!(first.header("Server"), Some("siprec-test"));
    assert_eq!(
        first.header("Via"),
        Some("SIP/2.0/UDP 10.0.0.5:5060;rport=5070;received=10.0.0.5;branch=z9hG4bKopt")
    );

    let first_tag = tag_of(first.header("To").unwrap()).unwrap();
    let second_tag = tag_of(sent[1].message.header("To").unwrap()).unwrap();
    assert_ne!(first_tag, second_tag);
    assert_eq!(manager.active_calls().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_multipart_gets_trying_only() {
    let (manager, transport) = setup().await;
    let broken = CISCO_INVITE.replace(
        "Content-Type: multipart/mixed;boundary=uniqueBoundary",
        "Content-Type: multipart/mixed",
    );

    manager
        .handle_message(siprec_sip_core::parse_message(&broken), peer())
        .await;

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.status_code(), Some(100));
    assert_eq!(manager.active_calls().await.unwrap(), 0);

    // No watchdog was started for the aborted call
    let mut events = manager.subscribe();
    sleep(Duration::from_secs(60)).await;
    assert!(drain(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_single_stream_offer_is_rejected() {
    let (manager, transport) = setup().await;
    let one_stream = CISCO_INVITE.replace("m=audio 8088 RTP/AVP 0 101 19\r\n", "");
    let one_stream = one_stream.replace("a=label:2\r\n", "");

    manager
        .handle_message(siprec_sip_core::parse_message(&one_stream), peer())
        .await;

    assert_eq!(transport.sent().len(), 1);
    assert_eq!(manager.active_calls().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_single_port_config_answers_one_stream() {
    let (manager, transport) = setup_with(test_config().with_media_ports(vec![20000])).await;
    establish(&manager, &transport).await;

    let answer = parse_sdp(&transport.sent()[1].message.body).unwrap();
    assert_eq!(answer.media.len(), 1);
    assert_eq!(answer.media[0].port, 20000);
    assert_eq!(answer.labels(), vec![Some("1")]);
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_invite_is_ignored() {
    let (manager, transport) = setup().await;
    let tag = establish(&manager, &transport).await;

    manager.handle_message(invite(), peer()).await;

    assert_eq!(transport.sent().len(), 2);
    let call = manager.call(CALL_ID).await.unwrap().unwrap();
    assert_eq!(call.to_tag, tag);
    assert_eq!(call.state(), CallState::AwaitingAck);
}

#[tokio::test(start_paused = true)]
async fn test_responses_and_unknown_methods_are_ignored() {
    let (manager, transport) = setup().await;

    manager
        .handle_message(siprec_sip_core::parse_message("SIP/2.0 200 OK\r\nCall-ID: x\r\n\r\n"), peer())
        .await;
    manager
        .handle_message(
            siprec_sip_core::parse_message("REFER sip:a@b SIP/2.0\r\nCall-ID: x\r\n\r\n"),
            peer(),
        )
        .await;
    manager.handle_message(siprec_sip_core::parse_message(""), peer()).await;

    assert!(transport.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_dispatches_until_closed() {
    let (manager, transport) = setup().await;
    let (tx, rx) = mpsc::channel(8);

    let runner = tokio::spawn({
        let manager = manager.clone();
        async move { manager.run(rx).await }
    });

    tx.send(TransportEvent::MessageReceived {
        message: options(),
        source: peer(),
        destination: "10.0.0.100:5060".parse().unwrap(),
    })
    .await
    .unwrap();
    tx.send(TransportEvent::Error { error: "recv failed".into() })
        .await
        .unwrap();
    tx.send(TransportEvent::Closed).await.unwrap();

    runner.await.unwrap();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(transport.sent().len(), 1);
}
