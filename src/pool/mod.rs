use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, error};

use crate::error::{PoolError, Result};

mod batch;
mod queue;

use self::batch::BatchState;
use self::queue::BoundedQueue;

/// Largest worker count a pool will accept.
pub const MAX_THREADS: u32 = 32;

/// Capacity of the pending-job ring buffer.
///
/// Sized independently of batch size; batches larger than this simply make
/// the submission loop wait for workers to drain slots.
pub const QUEUE_CAPACITY: usize = 1024;

/// One unit of work travelling through the queue: the payload, the index of
/// the result slot it owns, and the batch's executor.
struct Job<V> {
    value: V,
    index: usize,
    executor: Arc<dyn Fn(V) -> u64 + Send + Sync>,
}

/// State guarded by the single pool mutex.
///
/// Keeping the queue, the collector and the shutdown flag under one lock
/// means there is exactly one protocol to get right; workers never hold
/// this lock while running an executor.
struct PoolState<V> {
    queue: BoundedQueue<Job<V>>,
    batch: BatchState,
    shutdown: bool,
}

struct Shared<V> {
    state: Mutex<PoolState<V>>,
    /// Workers sleep here while the queue is empty.
    not_empty: Condvar,
    /// The submission loop sleeps here while the queue is full.
    not_full: Condvar,
    /// `execute` sleeps here until the last job of the batch commits.
    done: Condvar,
}

/// A fixed-size pool of worker threads executing batches of work items.
///
/// Work is distributed through a bounded circular queue; results come back
/// in submission order no matter which worker finishes first. One pool runs
/// one batch at a time (`execute` takes `&mut self`, so overlapping batches
/// do not compile); run sequential batches on one pool, or give each
/// concurrent caller its own pool.
///
/// # Example
///
/// ```
/// use batchpool::BatchPool;
///
/// let mut pool = BatchPool::new(4).unwrap();
/// let results = pool
///     .execute(vec![1i64, 2, 3, 4, 5], |x| (x * x) as u64)
///     .unwrap();
/// assert_eq!(results, vec![1, 4, 9, 16, 25]);
/// pool.close();
/// ```
pub struct BatchPool<V: Send + 'static> {
    shared: Arc<Shared<V>>,
    workers: Vec<JoinHandle<()>>,
}

impl<V: Send + 'static> BatchPool<V> {
    /// Opens a pool with the given number of worker threads.
    ///
    /// Workers start immediately and block waiting for work. If a worker
    /// cannot be spawned, every already-started worker is shut down and
    /// joined before the error is returned; a partially-live pool is never
    /// handed out.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidThreadCount`] if `threads` is outside
    /// `1..=MAX_THREADS`, or [`PoolError::Spawn`] if the OS refuses a
    /// thread.
    pub fn new(threads: u32) -> Result<Self> {
        if !(1..=MAX_THREADS).contains(&threads) {
            return Err(PoolError::InvalidThreadCount(threads));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                queue: BoundedQueue::with_capacity(QUEUE_CAPACITY),
                batch: BatchState::new(),
                shutdown: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            done: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(threads as usize);
        for id in 0..threads {
            match spawn_worker(id, Arc::clone(&shared)) {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    error!("Failed to spawn worker {id}: {e}");
                    shutdown_and_join(&shared, &mut workers);
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        Ok(BatchPool { shared, workers })
    }

    /// Runs `executor` over every item of `work` and returns the results in
    /// submission order.
    ///
    /// `results[i]` is always `executor(work[i])`, regardless of which
    /// worker ran the job or in what order jobs finished. Blocks until the
    /// whole batch has completed; there is no timeout, so an executor that
    /// never returns stalls the call (a known limitation of the design, not
    /// papered over with cancellation). A job that panics is logged and
    /// recorded as `0`; executors that can fail should encode failure
    /// in-band in their return value.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::EmptyBatch`] if `work` is empty. The pool stays
    /// usable after a rejected call.
    pub fn execute<F>(&mut self, work: Vec<V>, executor: F) -> Result<Vec<u64>>
    where
        F: Fn(V) -> u64 + Send + Sync + 'static,
    {
        if work.is_empty() {
            return Err(PoolError::EmptyBatch);
        }

        let executor: Arc<dyn Fn(V) -> u64 + Send + Sync> = Arc::new(executor);
        debug!("Submitting batch of {} jobs", work.len());

        let mut guard = self.shared.state.lock().expect("pool mutex poisoned");
        guard.batch.begin(work.len());

        for (index, value) in work.into_iter().enumerate() {
            // Ring full: make sure every worker is awake to drain it, then
            // wait for a slot.
            while guard.queue.is_full() {
                self.shared.not_empty.notify_all();
                guard = self
                    .shared
                    .not_full
                    .wait(guard)
                    .expect("pool mutex poisoned");
            }
            let job = Job {
                value,
                index,
                executor: Arc::clone(&executor),
            };
            if guard.queue.push(job).is_err() {
                unreachable!("ring has a free slot after the not_full wait");
            }
            self.shared.not_empty.notify_one();
        }

        while !guard.batch.is_done() {
            guard = self.shared.done.wait(guard).expect("pool mutex poisoned");
        }
        Ok(guard.batch.take())
    }

    /// Shuts the pool down, blocking until every worker has been joined.
    ///
    /// In-flight jobs run to completion; only future dequeuing stops.
    /// Dropping the pool does the same teardown, but `close` makes the
    /// blocking join explicit at the call site.
    pub fn close(mut self) {
        shutdown_and_join(&self.shared, &mut self.workers);
    }
}

impl<V: Send + 'static> Drop for BatchPool<V> {
    fn drop(&mut self) {
        shutdown_and_join(&self.shared, &mut self.workers);
    }
}

/// Flips the shutdown flag, wakes every sleeping worker, and joins them.
/// Idempotent: safe to run from both `close` and `Drop`.
fn shutdown_and_join<V>(shared: &Shared<V>, workers: &mut Vec<JoinHandle<()>>) {
    {
        let mut guard = shared.state.lock().expect("pool mutex poisoned");
        guard.shutdown = true;
    }
    shared.not_empty.notify_all();
    for handle in workers.drain(..) {
        if handle.join().is_err() {
            error!("Worker thread panicked during shutdown");
        }
    }
}

/// Spawns a single worker thread running the pop/execute/commit loop.
fn spawn_worker<V>(id: u32, shared: Arc<Shared<V>>) -> io::Result<JoinHandle<()>>
where
    V: Send + 'static,
{
    thread::Builder::new()
        .name(format!("pool-worker-{id}"))
        .spawn(move || loop {
            let job = {
                let mut guard = shared.state.lock().expect("pool mutex poisoned");
                // Loop, not a single check: tolerates spurious wakeups and
                // other workers winning the race for the same signal.
                while guard.queue.is_empty() && !guard.shutdown {
                    guard = shared
                        .not_empty
                        .wait(guard)
                        .expect("pool mutex poisoned");
                }
                if guard.shutdown && guard.queue.is_empty() {
                    debug!("Worker {id}: shutting down");
                    return;
                }
                let job = guard.queue.pop();
                shared.not_full.notify_one();
                job
            };
            let Some(job) = job else { continue };

            debug!("Worker {id} executing job {}", job.index);
            let Job {
                value,
                index,
                executor,
            } = job;
            // The executor runs without the lock; holding it here would
            // serialize all workers.
            let result = match catch_unwind(AssertUnwindSafe(|| (*executor)(value))) {
                Ok(v) => v,
                Err(_) => {
                    error!("Worker {id}: job {index} panicked, recording 0");
                    0
                }
            };

            let mut guard = shared.state.lock().expect("pool mutex poisoned");
            if guard.batch.commit(index, result) {
                // Only the one execute caller waits on this, so a targeted
                // signal is enough.
                shared.done.notify_one();
            }
        })
}
