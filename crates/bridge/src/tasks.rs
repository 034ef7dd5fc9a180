//! Render-thread task marshaling.
//!
//! Scene-graph state is owned by the render thread. Callers on other threads
//! enqueue their work here and the collaborator's render loop drains the
//! queue once per frame, which is also what orders shutdown after any
//! in-flight dispatch pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

use crossbeam_channel::{Receiver, Sender};

use crate::error::BridgeError;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Task queue bound to the render thread's run loop.
///
/// Handles are cheap clones of the same queue. FIFO order of requests from a
/// single caller is preserved.
#[derive(Clone)]
pub struct RenderTaskQueue {
    inner: Arc<Inner>,
}

struct Inner {
    tx: Sender<Task>,
    rx: Receiver<Task>,
    render_thread: OnceLock<ThreadId>,
    closed: AtomicBool,
}

impl RenderTaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            inner: Arc::new(Inner {
                tx,
                rx,
                render_thread: OnceLock::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Whether the current thread is the one draining this queue.
    pub fn on_render_thread(&self) -> bool {
        self.inner
            .render_thread
            .get()
            .is_some_and(|id| *id == thread::current().id())
    }

    /// Drain all queued tasks, returning how many ran.
    ///
    /// Invoked by the render loop once per frame; the first call pins the
    /// render thread's identity.
    pub fn pump(&self) -> usize {
        let _ = self.inner.render_thread.set(thread::current().id());
        let mut drained = 0;
        while let Ok(task) = self.inner.rx.try_recv() {
            task();
            drained += 1;
        }
        drained
    }

    /// Mark the queue closed and reclaim anything still enqueued.
    ///
    /// Called by the render loop when it exits. Dropping a stranded task
    /// drops its reply sender, so a caller blocked in [`RenderTaskQueue::call`]
    /// wakes with `RenderThreadGone` instead of hanging forever.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        while let Ok(task) = self.inner.rx.try_recv() {
            drop(task);
        }
    }

    /// Fire-and-forget marshal onto the render thread.
    ///
    /// Runs inline when already on the render thread.
    pub fn run(&self, f: impl FnOnce() + Send + 'static) -> Result<(), BridgeError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(BridgeError::RenderThreadGone);
        }
        if self.on_render_thread() {
            f();
            return Ok(());
        }
        self.inner
            .tx
            .send(Box::new(f))
            .map_err(|_| BridgeError::RenderThreadGone)
    }

    /// Marshal `f` onto the render thread and block for its result.
    ///
    /// Runs inline when already on the render thread, so work requested from
    /// within a dispatch pass cannot deadlock against its own frame. A
    /// collaborator panic on the render thread, or a queue closed by the
    /// exiting render loop, surfaces here as
    /// [`BridgeError::RenderThreadGone`].
    pub fn call<R, F>(&self, f: F) -> Result<R, BridgeError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(BridgeError::RenderThreadGone);
        }
        if self.on_render_thread() {
            return Ok(f());
        }
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        self.inner
            .tx
            .send(Box::new(move || {
                let _ = reply_tx.send(f());
            }))
            .map_err(|_| BridgeError::RenderThreadGone)?;
        // Raced with close(): its drain may have finished before our send
        // landed, so reclaim the stranded task ourselves.
        if self.inner.closed.load(Ordering::SeqCst) {
            while let Ok(task) = self.inner.rx.try_recv() {
                drop(task);
            }
        }
        reply_rx.recv().map_err(|_| BridgeError::RenderThreadGone)
    }
}

impl Default for RenderTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}
