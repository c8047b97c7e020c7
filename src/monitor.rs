/*
 *  monitor.rs
 *
 *  FnGShim - fear and greed at a glance
 *	(c) 2020-26 Stuart Hunter
 *
 *  Poll loop - fetch, hand off to the graph worker, sleep
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use chrono::{Duration as ChronoDuration, Local};
use log::{error, info};
use std::time::Duration;

use crate::config::DelayPolicy;
use crate::fng::DataSource;
use crate::graph::GraphHandle;

/// What one poll did
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// New value sent to the graph
    Updated { value: f32, delay: Duration },
    /// Fetch failed, display untouched
    Failed { delay: Duration },
    /// Graph worker is gone, stop polling
    Stopped,
}

impl PollOutcome {
    pub fn delay(&self) -> Option<Duration> {
        match self {
            PollOutcome::Updated { delay, .. } | PollOutcome::Failed { delay } => Some(*delay),
            PollOutcome::Stopped => None,
        }
    }
}

/// Fetch once and forward the value; returns how long to wait before the next poll
pub async fn poll_cycle<D: DataSource>(
    source: &D,
    graph: &GraphHandle,
    delays: &DelayPolicy,
) -> PollOutcome {
    match source.get_new_data().await {
        Ok(reading) => {
            info!("Index = {}", reading);
            if !graph.update(reading.value) {
                return PollOutcome::Stopped;
            }
            let delay = delays.clamp(reading.time_until_update);
            PollOutcome::Updated { value: reading.value, delay }
        }
        Err(e) => {
            if e.is_connection() {
                error!("Connection Error: {}", e);
            } else {
                error!("Malformed index response: {}", e);
            }
            PollOutcome::Failed { delay: delays.retry() }
        }
    }
}

/// Poll forever (until the graph worker stops)
pub async fn run_monitor<D: DataSource>(source: &D, graph: &GraphHandle, delays: DelayPolicy) {
    loop {
        let outcome = poll_cycle(source, graph, &delays).await;
        let Some(delay) = outcome.delay() else {
            info!("Graph worker stopped, leaving poll loop");
            return;
        };

        let next = Local::now() + ChronoDuration::from_std(delay).unwrap_or_default();
        info!("Delaying for {} seconds (next poll {})", delay.as_secs(), next.format("%H:%M:%S"));
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fng::{parse_response, FngError, FngReading};
    use crate::graph::{graph_channel, GraphCommand};

    struct Scripted(&'static str);

    impl DataSource for Scripted {
        async fn get_new_data(&self) -> Result<FngReading, FngError> {
            parse_response(self.0)
        }
    }

    #[tokio::test]
    async fn test_update_sends_value_and_clamps_delay() {
        let (graph, mut rx) = graph_channel();
        let source = Scripted(r#"{"data": [{"value": "35", "time_until_update": "120"}]}"#);

        let outcome = poll_cycle(&source, &graph, &DelayPolicy::default()).await;

        assert_eq!(outcome, PollOutcome::Updated { value: 35.0, delay: Duration::from_secs(120) });
        assert_eq!(rx.try_recv().unwrap(), GraphCommand::Update(35.0));
    }

    #[tokio::test]
    async fn test_huge_delay_capped_at_an_hour() {
        let (graph, _rx) = graph_channel();
        let source = Scripted(r#"{"data": [{"value": "35", "time_until_update": "99999"}]}"#);

        let outcome = poll_cycle(&source, &graph, &DelayPolicy::default()).await;
        assert_eq!(outcome.delay(), Some(Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn test_bad_payload_retries_without_update() {
        let (graph, mut rx) = graph_channel();
        let source = Scripted("not json");

        let outcome = poll_cycle(&source, &graph, &DelayPolicy::default()).await;

        assert_eq!(outcome, PollOutcome::Failed { delay: Duration::from_secs(60) });
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stopped_worker_ends_loop() {
        let (graph, rx) = graph_channel();
        drop(rx);
        let source = Scripted(r#"{"data": [{"value": "35", "time_until_update": "120"}]}"#);

        assert_eq!(poll_cycle(&source, &graph, &DelayPolicy::default()).await, PollOutcome::Stopped);
        // returns straight away instead of sleeping
        run_monitor(&source, &graph, DelayPolicy::default()).await;
    }
}
