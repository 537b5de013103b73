//! Active object: a background thread that runs submitted jobs in order.
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::queue::SharedQueue;

/// A deferred unit of work, run on the worker thread against its state.
pub type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// What travels through the queue: work, or the stop sentinel.
enum Message<S> {
    Run(Job<S>),
    Quit,
}

/// A single background thread fed by a [`SharedQueue`].
///
/// The worker owns a piece of state `S` for its whole lifetime; jobs receive
/// `&mut S` and nothing else can reach it, so state such as an open file is
/// mutated without any locking. With `S = ()` jobs are plain closures.
///
/// Teardown ([`shutdown`](Self::shutdown) or `Drop`) enqueues a stop sentinel
/// behind everything already submitted and joins the thread, so every job
/// sent before teardown runs to completion first.
pub struct Active<S: Send + 'static> {
    queue: Arc<SharedQueue<Message<S>>>,
    thread: Option<JoinHandle<S>>,
}

impl<S: Send + 'static> Active<S> {
    /// Spawn the worker thread named `name`, moving `state` onto it.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn create(name: &str, state: S) -> io::Result<Self> {
        let queue = Arc::new(SharedQueue::new());
        let thread = std::thread::Builder::new().name(name.to_string()).spawn({
            let queue = Arc::clone(&queue);
            move || run(&queue, state)
        })?;
        Ok(Self {
            queue,
            thread: Some(thread),
        })
    }

    /// Enqueue `job` for asynchronous execution on the worker thread.
    pub fn send(&self, job: impl FnOnce(&mut S) + Send + 'static) {
        self.queue.push(Message::Run(Box::new(job)));
    }

    /// Number of jobs waiting to run (advisory).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain all submitted jobs, stop the thread and hand its state back.
    ///
    /// Returns `None` if a job panicked and took the worker down.
    pub fn shutdown(mut self) -> Option<S> {
        self.stop()
    }

    fn stop(&mut self) -> Option<S> {
        let thread = self.thread.take()?;
        self.queue.push(Message::Quit);
        match thread.join() {
            Ok(state) => Some(state),
            Err(_) => {
                tracing::error!("active worker thread terminated by a panicking job");
                None
            }
        }
    }
}

impl<S: Send + 'static> Drop for Active<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<S: Send + 'static> fmt::Debug for Active<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Active")
            .field("pending", &self.pending())
            .field("running", &self.thread.is_some())
            .finish()
    }
}

/// Worker loop: pop and run until the stop sentinel arrives.
fn run<S>(queue: &SharedQueue<Message<S>>, mut state: S) -> S {
    loop {
        match queue.wait_and_pop() {
            Message::Run(job) => job(&mut state),
            Message::Quit => return state,
        }
    }
}
