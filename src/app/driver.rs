//! Event loop around a [`Workbench`]: surface events arrive on a channel,
//! deadlines are served by sleeping until the earliest one.

use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::mpsc;

use super::Workbench;
use crate::kernel::{Action, Asset, ViewState};

/// What the surrounding UI reports to the engine.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    EditorChanged(String),
    CanvasChanged {
        shapes: Vec<Value>,
        view: ViewState,
        assets: BTreeMap<String, Asset>,
    },
    LibraryChanged(Vec<Value>),
    Dispatch(Action),
    Flush,
}

pub struct WorkbenchDriver {
    workbench: Workbench,
    rx: mpsc::UnboundedReceiver<SurfaceEvent>,
}

impl WorkbenchDriver {
    pub fn new(workbench: Workbench) -> (Self, mpsc::UnboundedSender<SurfaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { workbench, rx }, tx)
    }

    /// Runs until every sender is dropped, then commits whatever is still
    /// pending and hands the workbench back.
    pub async fn run(mut self) -> Workbench {
        loop {
            let deadline = self.workbench.next_deadline();
            tokio::select! {
                event = self.rx.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = sleep_until(deadline) => {
                    self.workbench.tick(now());
                }
            }
        }
        tracing::debug!("surface channel closed, flushing");
        self.workbench.flush(now());
        self.workbench
    }

    fn handle(&mut self, event: SurfaceEvent) {
        let now = now();
        match event {
            SurfaceEvent::EditorChanged(text) => {
                self.workbench.on_editor_change(text, now);
            }
            SurfaceEvent::CanvasChanged {
                shapes,
                view,
                assets,
            } => {
                self.workbench.on_canvas_change(shapes, view, assets, now);
            }
            SurfaceEvent::LibraryChanged(items) => {
                self.workbench.on_library_change(items, now);
            }
            SurfaceEvent::Dispatch(action) => {
                self.workbench.dispatch(action, now);
            }
            SurfaceEvent::Flush => {
                self.workbench.flush(now);
            }
        }
    }
}

/// Read through tokio so a paused test clock drives the engine too.
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/driver.rs"]
mod tests;
