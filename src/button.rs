/*
 *  button.rs
 *
 *  FnGShim - fear and greed at a glance
 *	(c) 2020-26 Stuart Hunter
 *
 *  Toggle button on a GPIO pin, falling edge with software debounce
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
use std::time::{Duration, Instant};

/// Drops edges that arrive within `window` of the last accepted one
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True if an edge seen at `now` counts as a press
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(feature = "gpio-button")]
pub use gpio::ToggleButton;

#[cfg(feature = "gpio-button")]
mod gpio {
    use super::Debouncer;
    use crate::strip::StripError;
    use log::{debug, info};
    use rppal::gpio::{Gpio, InputPin, Level, Trigger};
    use std::time::{Duration, Instant};

    /// Keeps the interrupt registered for as long as it lives
    pub struct ToggleButton {
        pin: InputPin,
    }

    impl ToggleButton {
        /// Watch BCM `pin` (pulled up, active low) and call `on_press` per debounced press
        ///
        /// The callback runs on rppal's interrupt thread.
        pub fn watch<F>(pin: u8, debounce: Duration, mut on_press: F) -> Result<Self, StripError>
        where
            F: FnMut() + Send + 'static,
        {
            let mut input = Gpio::new()?.get(pin)?.into_input_pullup();
            let mut debouncer = Debouncer::new(debounce);

            input.set_async_interrupt(Trigger::FallingEdge, move |_level: Level| {
                if debouncer.accept(Instant::now()) {
                    info!("Button {} Pressed", pin);
                    on_press();
                } else {
                    debug!("Button {} bounce ignored", pin);
                }
            })?;

            info!("Watching button on BCM {} ({} ms debounce)", pin, debounce.as_millis());
            Ok(Self { pin: input })
        }

        pub fn pin(&self) -> u8 {
            self.pin.pin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_edge_accepted() {
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        assert!(debouncer.accept(Instant::now()));
    }

    #[test]
    fn test_bounce_inside_window_ignored() {
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        let t0 = Instant::now();
        assert!(debouncer.accept(t0));
        assert!(!debouncer.accept(t0 + Duration::from_millis(5)));
        assert!(!debouncer.accept(t0 + Duration::from_millis(199)));
        assert!(debouncer.accept(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_window_measured_from_last_accepted_edge() {
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        let t0 = Instant::now();
        debouncer.accept(t0);
        // rejected edges do not extend the window
        assert!(!debouncer.accept(t0 + Duration::from_millis(150)));
        assert!(debouncer.accept(t0 + Duration::from_millis(250)));
    }
}
