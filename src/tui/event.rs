//! Event handling for TUI.
//!
//! Uses a separate thread to poll for terminal events and timer ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Refresh interval elapsed.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resized; the next draw picks up the new size.
    Resize,
}

/// Event handler that polls for terminal events in a separate thread.
///
/// At most one tick is queued at a time: ticks that fall due while the
/// previous one is still unread are merged into it.
pub struct EventHandler {
    rx: Receiver<Event>,
    /// Set while a tick sits in the channel.
    tick_pending: Arc<AtomicBool>,
    /// Kept alive to prevent channel closure.
    _tx: Sender<Event>,
}

impl EventHandler {
    /// Creates a new event handler with the specified tick rate.
    ///
    /// Ticks keep a fixed cadence: key presses do not push the next tick
    /// back.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();
        let tick_pending = Arc::new(AtomicBool::new(false));
        let pending = tick_pending.clone();

        thread::spawn(move || {
            let send_tick = || {
                if pending.swap(true, Ordering::AcqRel) {
                    return true;
                }
                event_tx.send(Event::Tick).is_ok()
            };

            let mut next_tick = Instant::now() + tick_rate;
            loop {
                let timeout = next_tick.saturating_duration_since(Instant::now());
                match event::poll(timeout) {
                    Ok(true) => {
                        let event = match event::read() {
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            Ok(CrosstermEvent::Resize(_, _)) => Event::Resize,
                            _ => continue,
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                        continue;
                    }
                    Ok(false) => {}
                    // No usable terminal: wait out the interval instead of spinning.
                    Err(_) => thread::sleep(timeout),
                }

                next_tick = Instant::now() + tick_rate;
                if !send_tick() {
                    break;
                }
            }
        });

        Self {
            rx,
            tick_pending,
            _tx: tx,
        }
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        let event = self.rx.recv()?;
        if matches!(event, Event::Tick) {
            self.tick_pending.store(false, Ordering::Release);
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued_ticks(handler: &EventHandler) -> usize {
        handler
            .rx
            .try_iter()
            .filter(|e| matches!(e, Event::Tick))
            .count()
    }

    #[test]
    fn test_ticks_merge_while_consumer_is_busy() {
        let handler = EventHandler::new(Duration::from_millis(10));

        // A slow round: many intervals pass without reading events.
        thread::sleep(Duration::from_millis(300));

        assert!(queued_ticks(&handler) <= 1);
    }

    #[test]
    fn test_ticks_resume_after_read() {
        let handler = EventHandler::new(Duration::from_millis(10));
        thread::sleep(Duration::from_millis(50));

        let mut ticks = 0;
        while ticks < 3 {
            if let Ok(Event::Tick) = handler.next() {
                ticks += 1;
            }
        }
        assert_eq!(ticks, 3);
    }
}
