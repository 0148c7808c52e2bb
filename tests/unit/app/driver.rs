use super::*;
use crate::kernel::services::adapters::MemoryBlobStore;
use crate::kernel::services::ports::blob::Result as BlobResult;
use crate::kernel::services::ports::{BlobStore, SurfaceError, SyncConfig, TextSurface};
use crate::kernel::{Language, Workspace};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Default)]
struct SharedBlobs(Rc<RefCell<MemoryBlobStore>>);

impl BlobStore for SharedBlobs {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> BlobResult<()> {
        self.0.borrow_mut().set(key, value)
    }
}

struct NullEditor;

impl TextSurface for NullEditor {
    fn push(&mut self, _text: &str, _language: Language) -> Result<(), SurfaceError> {
        Ok(())
    }
}

fn attached_workbench(blobs: SharedBlobs) -> Workbench {
    let mut workbench = Workbench::new(Workspace::new(), SyncConfig::default(), Box::new(blobs));
    workbench.attach_editor(Box::new(NullEditor), now());
    workbench
}

fn active_text(workbench: &Workbench) -> String {
    workbench
        .workspace()
        .code
        .files
        .active()
        .map(|d| d.content.text.clone())
        .unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn debounced_edit_commits_on_timer() {
    let blobs = SharedBlobs::default();
    let (driver, tx) = WorkbenchDriver::new(attached_workbench(blobs.clone()));

    let feeder = async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(SurfaceEvent::EditorChanged("a".to_string())).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(SurfaceEvent::EditorChanged("ab".to_string())).unwrap();
        assert_eq!(blobs.0.borrow().writes(), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(blobs.0.borrow().writes(), 1);
    };

    let (workbench, ()) = tokio::join!(driver.run(), feeder);

    assert_eq!(active_text(&workbench), "ab");
}

#[tokio::test(start_paused = true)]
async fn echo_before_settle_is_dropped() {
    let (driver, tx) = WorkbenchDriver::new(attached_workbench(SharedBlobs::default()));

    tx.send(SurfaceEvent::EditorChanged("echo".to_string())).unwrap();
    drop(tx);
    let workbench = driver.run().await;

    assert_eq!(active_text(&workbench), crate::kernel::document::WELCOME_CODE);
}

#[tokio::test(start_paused = true)]
async fn closing_the_channel_flushes_pending_saves() {
    let (driver, tx) = WorkbenchDriver::new(attached_workbench(SharedBlobs::default()));

    let feeder = async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(SurfaceEvent::EditorChanged("x".to_string())).unwrap();
    };

    let (workbench, ()) = tokio::join!(driver.run(), feeder);

    assert_eq!(active_text(&workbench), "x");
    assert!(workbench.code_saves().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dispatched_actions_reach_the_store() {
    let (driver, tx) = WorkbenchDriver::new(attached_workbench(SharedBlobs::default()));

    tx.send(SurfaceEvent::Dispatch(Action::AddCanvas { name: None }))
        .unwrap();
    tx.send(SurfaceEvent::Flush).unwrap();
    drop(tx);
    let workbench = driver.run().await;

    assert_eq!(workbench.workspace().canvas.files.len(), 2);
}
