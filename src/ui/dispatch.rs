//! UI-thread confinement.
//!
//! The controller and the native control are only touched on the thread that
//! created them. Other threads get a [`RemoteHandle`]: each call queues a job,
//! nudges the UI loop through the optional waker, and blocks until the UI
//! thread has run the job from `pump_pending`.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, ThreadId};

use crate::error::{ListViewError, Result};

/// Mutations that may be requested from outside the UI thread.
#[derive(Debug)]
pub enum RemoteJob<M> {
    SetObjects(Vec<M>),
    ClearObjects,
}

type Reply = Sender<Result<()>>;
type Waker = Arc<dyn Fn() + Send + Sync>;

/// A queued job together with the channel its caller is blocked on.
pub struct PendingJob<M> {
    job: RemoteJob<M>,
    reply: Reply,
}

impl<M> PendingJob<M> {
    pub fn job(&self) -> &RemoteJob<M> {
        &self.job
    }

    /// Runs the job and unblocks the caller with its result.
    pub fn run(self, f: impl FnOnce(RemoteJob<M>) -> Result<()>) {
        let result = f(self.job);
        // Caller may have given up waiting; nothing to report then.
        let _ = self.reply.send(result);
    }
}

/// UI-side end of the job queue. Owned by the controller.
pub struct UiDispatcher<M> {
    tx: Sender<PendingJob<M>>,
    rx: Receiver<PendingJob<M>>,
    owner: ThreadId,
    waker: Option<Waker>,
}

impl<M> Default for UiDispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> UiDispatcher<M> {
    /// Binds the dispatcher to the calling thread.
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx, owner: thread::current().id(), waker: None }
    }

    /// Called after every queued job, e.g. to post a message to the UI window.
    ///
    /// Only affects handles created after this call.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    pub fn handle(&self) -> RemoteHandle<M> {
        RemoteHandle {
            tx: self.tx.clone(),
            owner: self.owner,
            waker: self.waker.clone(),
        }
    }

    pub fn try_next(&self) -> Option<PendingJob<M>> {
        self.rx.try_recv().ok()
    }
}

/// Cross-thread entry points of a list view. `Send` whenever `M` is.
pub struct RemoteHandle<M> {
    tx: Sender<PendingJob<M>>,
    owner: ThreadId,
    waker: Option<Waker>,
}

impl<M> Clone for RemoteHandle<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            owner: self.owner,
            waker: self.waker.clone(),
        }
    }
}

impl<M> RemoteHandle<M> {
    /// Replaces the list's objects, blocking until the UI thread has done it.
    pub fn set_objects(&self, models: Vec<M>) -> Result<()> {
        self.call(RemoteJob::SetObjects(models))
    }

    /// Empties the list, blocking until the UI thread has done it.
    pub fn clear_objects(&self) -> Result<()> {
        self.call(RemoteJob::ClearObjects)
    }

    fn call(&self, job: RemoteJob<M>) -> Result<()> {
        if thread::current().id() == self.owner {
            return Err(ListViewError::ReentrantDispatch);
        }

        let (reply, done) = channel();
        self.tx
            .send(PendingJob { job, reply })
            .map_err(|_| ListViewError::Disconnected)?;
        if let Some(wake) = &self.waker {
            wake();
        }

        // Dropping the queue drops our reply sender too.
        done.recv().map_err(|_| ListViewError::Disconnected)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_call_from_ui_thread_is_rejected() {
        let dispatcher: UiDispatcher<i32> = UiDispatcher::new();
        assert!(dispatcher.is_ui_thread());
        let handle = dispatcher.handle();
        assert!(matches!(handle.clear_objects(), Err(ListViewError::ReentrantDispatch)));
        assert!(dispatcher.try_next().is_none());
    }

    #[test]
    fn test_job_runs_on_ui_thread_and_unblocks_caller() {
        let mut dispatcher: UiDispatcher<i32> = UiDispatcher::new();
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = Arc::clone(&wakes);
        dispatcher.set_waker(move || {
            w.fetch_add(1, Ordering::SeqCst);
        });
        let handle = dispatcher.handle();
        let ui_thread = thread::current().id();

        let worker = thread::spawn(move || handle.set_objects(vec![1, 2, 3]));

        let mut seen = None;
        while seen.is_none() {
            match dispatcher.try_next() {
                Some(pending) => pending.run(|job| {
                    assert_eq!(thread::current().id(), ui_thread);
                    if let RemoteJob::SetObjects(v) = job {
                        seen = Some(v);
                    }
                    Ok(())
                }),
                None => thread::sleep(Duration::from_millis(1)),
            }
        }

        assert!(worker.join().unwrap().is_ok());
        assert_eq!(seen, Some(vec![1, 2, 3]));
        assert_eq!(wakes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_job_error_reaches_caller() {
        let dispatcher: UiDispatcher<i32> = UiDispatcher::new();
        let handle = dispatcher.handle();
        let worker = thread::spawn(move || handle.clear_objects());

        loop {
            if let Some(pending) = dispatcher.try_next() {
                assert!(matches!(pending.job(), RemoteJob::ClearObjects));
                pending.run(|_| Err(ListViewError::Native(crate::error::NativeError::NullReference)));
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }

        assert!(matches!(
            worker.join().unwrap(),
            Err(ListViewError::Native(crate::error::NativeError::NullReference))
        ));
    }

    #[test]
    fn test_dropped_dispatcher_disconnects() {
        let dispatcher: UiDispatcher<i32> = UiDispatcher::new();
        let handle = dispatcher.handle();
        drop(dispatcher);

        let result = thread::spawn(move || handle.set_objects(vec![1])).join().unwrap();
        assert!(matches!(result, Err(ListViewError::Disconnected)));
    }
}
