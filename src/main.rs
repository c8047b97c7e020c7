/*
 *  main.rs
 *
 *  FnGShim - fear and greed at a glance
 *	(c) 2020-26 Stuart Hunter
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

use anyhow::{anyhow, Context};
use env_logger::Env;
use log::{error, info, warn};

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind};

use fngshim::config;
use fngshim::fng::FearGreedClient;
use fngshim::graph::{graph_channel, run_graph_worker, GraphRenderer, GraphStyle, SwipeAnimator, ToggleController};
use fngshim::monitor::run_monitor;
use fngshim::strip::StripFactory;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[tokio::main] // Requires the `tokio` runtime with `macros` and `rt-multi-thread` features
async fn main() -> anyhow::Result<()> {

    let cfg = config::load()?;

    let level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("{} - fear and greed at a glance", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let strip_cfg = cfg.strip();
    let strip = StripFactory::create_from_config(&strip_cfg)
        .context("opening LED strip")?;

    let renderer = GraphRenderer::new(strip, GraphStyle::from(&strip_cfg));
    let animator = SwipeAnimator::new(renderer).with_frame_delay(strip_cfg.frame_delay());
    let mut controller = ToggleController::new(animator).with_intro_sweep(strip_cfg.intro_sweep());
    let clear_on_exit = strip_cfg.clear_on_exit();

    // single writer: only this worker ever touches the strip
    let (graph, rx) = graph_channel();
    let mut worker = tokio::task::spawn_blocking(move || {
        controller.init_leds(clear_on_exit)?;
        run_graph_worker(controller, rx).map(drop)
    });

    let button_cfg = cfg.button();
    #[cfg(feature = "gpio-button")]
    let _button = if button_cfg.enabled() {
        let handle = graph.clone();
        match fngshim::button::ToggleButton::watch(button_cfg.pin(), button_cfg.debounce(), move || {
            handle.toggle();
        }) {
            Ok(button) => Some(button),
            Err(e) => {
                warn!("Toggle button unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };
    #[cfg(not(feature = "gpio-button"))]
    if button_cfg.enabled() {
        warn!("Built without gpio-button, toggle button disabled");
    }

    let client = FearGreedClient::new(&cfg.url(), cfg.connect_timeout(), cfg.request_timeout())
        .context("building HTTP client")?;
    info!("Polling {}", client.url());

    let delays = cfg.delay_policy();

    tokio::select! {
        // Handle Unix signals for graceful shutdown
        _ = signal_handler() => {}

        _ = run_monitor(&client, &graph, delays) => {
            info!("Closed Application Loop.");
        }

        // strip failures are fatal
        result = &mut worker => {
            return match result {
                Ok(Ok(())) => Err(anyhow!("graph worker exited unexpectedly")),
                Ok(Err(e)) => {
                    error!("LED strip failure: {}", e);
                    Err(e.into())
                }
                Err(e) => Err(anyhow!("graph worker panicked: {}", e)),
            };
        }
    }

    info!("Main application exiting. Clearing strip and stopping graph worker.");

    graph.shutdown();
    match worker.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("LED strip failure during shutdown: {}", e);
            Err(e.into())
        }
        Err(e) => Err(anyhow!("graph worker panicked: {}", e)),
    }
}
