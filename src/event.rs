use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

use crate::fs::entry::DirEntry;
use crate::nav::request::PaneId;

/// Completion of a background directory read, tagged with the pane that
/// asked for it and the path it was asked to read.
#[derive(Debug)]
pub struct DirLoad {
    pub pane: PaneId,
    pub path: PathBuf,
    pub result: io::Result<Vec<DirEntry>>,
}

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event (only delivered when capture is enabled).
    Mouse(MouseEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    #[allow(dead_code)]
    Resize(u16, u16),
    /// A directory read finished (successfully or not).
    DirLoaded(DirLoad),
}

/// Async event handler that polls crossterm events and forwards them via a channel.
///
/// Directory reads post their completions into the same channel, so the main
/// loop sees every message in a single delivery order.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::task::spawn_blocking(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        event_tx.send(Event::Key(key))
                    }
                    Ok(CrosstermEvent::Mouse(mouse)) => event_tx.send(Event::Mouse(mouse)),
                    Ok(CrosstermEvent::Resize(w, h)) => event_tx.send(Event::Resize(w, h)),
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            } else if event_tx.send(Event::Tick).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Get a sender clone for background tasks to post completion events.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (waits until available).
    pub async fn next(&mut self) -> crate::error::Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
