//! Producer-side hand-off to the analyzing peer.

use std::sync::Arc;

use super::helpers::{Backends, backends};
use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;
use ticket_lens::{
    analysis::services::AnalysisEngine,
    config::{PipelineConfig, SyntheticAnalysis},
    pipeline::{
        adapters::{LoopbackPeerTransport, memory::InMemoryPeerTransport},
        services::{SYNTHETIC_NOTICE, TicketDispatcher},
    },
    webhook::{
        domain::{EventKind, WebhookEvent},
        ports::WebhookDispatch,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loopback_peer_posts_one_comment(backends: Backends) {
    let orchestrator = backends.orchestrator(AnalysisEngine::heuristic_only(), PipelineConfig::default());
    let dispatcher = TicketDispatcher::new(
        Arc::new(backends.store.clone()),
        Arc::new(LoopbackPeerTransport::new(Arc::new(orchestrator))),
        Arc::new(DefaultClock),
        PipelineConfig::default(),
    );

    let receipt = dispatcher
        .dispatch(WebhookEvent::new("PROJ-1", EventKind::Created, Utc::now()))
        .await
        .expect("dispatch succeeds");

    assert_eq!(receipt.message, "Successfully processed webhook for ticket PROJ-1");
    let comments = backends.store.comments().expect("comments readable");
    let [comment] = comments.as_slice() else {
        panic!("expected one comment, got {comments:?}");
    };
    assert!(!comment.body.contains(SYNTHETIC_NOTICE));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_peer_posts_synthetic_comment(backends: Backends) {
    let config = PipelineConfig {
        synthetic: SyntheticAnalysis::PostComment,
        ..PipelineConfig::default()
    };
    let dispatcher = TicketDispatcher::new(
        Arc::new(backends.store.clone()),
        Arc::new(InMemoryPeerTransport::unreachable()),
        Arc::new(DefaultClock),
        config,
    );

    let receipt = dispatcher
        .dispatch(WebhookEvent::new("OPS-9", EventKind::Created, Utc::now()))
        .await
        .expect("dispatch succeeds");

    assert_eq!(receipt.ticket_id, "OPS-9");
    let comments = backends.store.comments().expect("comments readable");
    let [comment] = comments.as_slice() else {
        panic!("expected one comment, got {comments:?}");
    };
    assert!(comment.body.contains(SYNTHETIC_NOTICE));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_peer_fails_dispatch_by_default(backends: Backends) {
    let dispatcher = TicketDispatcher::new(
        Arc::new(backends.store.clone()),
        Arc::new(InMemoryPeerTransport::unreachable()),
        Arc::new(DefaultClock),
        PipelineConfig::default(),
    );

    let err = dispatcher
        .dispatch(WebhookEvent::new("OPS-9", EventKind::Created, Utc::now()))
        .await
        .expect_err("dispatch must fail");

    assert!(err.to_string().contains("OPS-9"), "got {err}");
    assert!(backends.store.comments().expect("comments readable").is_empty());
}
