/*
 *  tests/graph_integration.rs
 *
 *  Integration tests for the poll -> graph worker -> strip path
 *
 *  FnGShim - fear and greed at a glance
 *  (c) 2020-26 Stuart Hunter
 */

use std::sync::{Arc, Mutex};
use std::time::Duration;

use fngshim::config::DelayPolicy;
use fngshim::fng::{parse_response, DataSource, FearGreedClient, FngError, FngReading};
use fngshim::graph::{graph_channel, run_graph_worker, GraphRenderer, GraphStyle, SwipeAnimator, ToggleController};
use fngshim::monitor::{poll_cycle, PollOutcome};
use fngshim::strip::drivers::mock::{MockStrip, MockStripState};

/// Replays a canned body, or a connection style failure
enum Scripted {
    Body(&'static str),
    Unreachable,
}

impl DataSource for Scripted {
    async fn get_new_data(&self) -> Result<FngReading, FngError> {
        match self {
            Scripted::Body(body) => parse_response(body),
            Scripted::Unreachable => {
                // a real refused connection, so the error is a genuine reqwest one
                let client = FearGreedClient::new(
                    "http://127.0.0.1:9/fng/",
                    Duration::from_millis(200),
                    Duration::from_millis(500),
                )?;
                client.get_new_data().await
            }
        }
    }
}

// 100 pixels so each lit count reads back as the rendered value
fn controller() -> (ToggleController<MockStrip>, Arc<Mutex<MockStripState>>) {
    let strip = MockStrip::new(100);
    let state = strip.state();
    let renderer = GraphRenderer::new(strip, GraphStyle::default());
    (ToggleController::new(SwipeAnimator::new(renderer)), state)
}

#[tokio::test]
async fn test_fresh_value_swipes_down_from_startup_sweep() {
    let (mut ctl, state) = controller();
    let (graph, rx) = graph_channel();

    let worker = tokio::task::spawn_blocking(move || {
        ctl.init_leds(true)?;
        run_graph_worker(ctl, rx)
    });

    let source = Scripted::Body(r#"{"data": [{"value": "35", "value_classification": "Fear", "time_until_update": "120"}]}"#);
    let outcome = poll_cycle(&source, &graph, &DelayPolicy::default()).await;
    assert_eq!(outcome, PollOutcome::Updated { value: 35.0, delay: Duration::from_secs(120) });

    graph.shutdown();
    let ctl = worker.await.unwrap().unwrap();

    assert_eq!(ctl.graph_value(), 35.0);
    assert_eq!(ctl.graph_target(), 35.0);

    let counts = state.lock().unwrap().lit_counts();
    // intro 1..=100 then 99 down to 35
    assert_eq!(counts.len(), 100 + 65);
    assert_eq!(counts[99], 100);
    assert_eq!(&counts[100..], &(35..=99).rev().collect::<Vec<usize>>()[..]);
}

#[tokio::test]
async fn test_connection_failure_leaves_strip_alone() {
    let (mut ctl, state) = controller();
    ctl.init_leds(true).unwrap();
    let shown = state.lock().unwrap().show_count;

    let (graph, rx) = graph_channel();
    let outcome = poll_cycle(&Scripted::Unreachable, &graph, &DelayPolicy::default()).await;
    assert_eq!(outcome, PollOutcome::Failed { delay: Duration::from_secs(60) });

    graph.shutdown();
    let ctl = tokio::task::spawn_blocking(move || run_graph_worker(ctl, rx))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ctl.graph_value(), 100.0);
    assert_eq!(state.lock().unwrap().show_count, shown);
}

#[tokio::test]
async fn test_button_toggle_between_polls() {
    let (mut ctl, state) = controller();
    ctl.init_leds(true).unwrap();
    let (graph, rx) = graph_channel();

    let source = Scripted::Body(r#"{"data": [{"value": 60, "time_until_update": 0}]}"#);
    let outcome = poll_cycle(&source, &graph, &DelayPolicy::default()).await;
    assert_eq!(outcome.delay(), Some(Duration::from_secs(30)));

    // press, new data while dark, press again
    assert!(graph.toggle());
    let source = Scripted::Body(r#"{"data": [{"value": 72, "time_until_update": 3600}]}"#);
    poll_cycle(&source, &graph, &DelayPolicy::default()).await;
    assert!(graph.toggle());
    graph.shutdown();

    let ctl = tokio::task::spawn_blocking(move || run_graph_worker(ctl, rx))
        .await
        .unwrap()
        .unwrap();

    assert!(ctl.is_on());
    assert_eq!(ctl.graph_value(), 72.0);
    let counts = state.lock().unwrap().lit_counts();
    assert!(counts.contains(&0));
    assert_eq!(counts.last(), Some(&72));
}

#[test]
fn test_default_delay_bounds() {
    let delays = DelayPolicy::default();
    assert_eq!(delays.clamp(0), Duration::from_secs(30));
    assert_eq!(delays.clamp(99_999), Duration::from_secs(3600));
    assert_eq!(delays.clamp(-5), Duration::from_secs(30));
}
