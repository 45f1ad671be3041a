//! Tile arrival notifications.
//!
//! The imagery service may report from any thread. Notifications go through a
//! crossbeam channel and are drained by the control on its own thread, where
//! they become redraw requests. Nothing here touches the view.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageryEvent {
    /// Some image became available
    ImageReceived,
    /// All pending loads finished
    LoadingFinished,
}

/// Cloneable sending half handed to the imagery service
#[derive(Debug, Clone)]
pub struct ImageryNotifier {
    tx: Sender<ImageryEvent>,
}

impl ImageryNotifier {
    pub fn image_received(&self) {
        self.send(ImageryEvent::ImageReceived);
    }

    pub fn loading_finished(&self) {
        self.send(ImageryEvent::LoadingFinished);
    }

    fn send(&self, event: ImageryEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("map control dropped, ignoring {:?}", event);
        }
    }
}

/// What arrived since the last drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BridgeSummary {
    pub images: usize,
    pub finished: usize,
}

impl BridgeSummary {
    pub fn is_empty(&self) -> bool {
        self.images == 0 && self.finished == 0
    }
}

pub struct TileArrivalBridge {
    tx: Sender<ImageryEvent>,
    rx: Receiver<ImageryEvent>,
}

impl TileArrivalBridge {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn notifier(&self) -> ImageryNotifier {
        ImageryNotifier { tx: self.tx.clone() }
    }

    /// Collect everything queued so far without blocking
    pub fn drain(&self) -> BridgeSummary {
        let mut summary = BridgeSummary::default();
        loop {
            match self.rx.try_recv() {
                Ok(ImageryEvent::ImageReceived) => summary.images += 1,
                Ok(ImageryEvent::LoadingFinished) => summary.finished += 1,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        summary
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for TileArrivalBridge {
    fn default() -> Self {
        Self::new()
    }
}
