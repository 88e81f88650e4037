//! Fork/join over a per-call pool of worker threads.
//!
//! [`TaskGroup::scope_each`] takes one payload per worker, hands all but the last to a
//! freshly built rayon pool, runs the last on the calling thread, and returns once every
//! payload has been processed. The pool lives only for the duration of the call.

use std::num::NonZeroUsize;

use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

#[derive(Debug, Clone, Copy)]
pub struct TaskGroup {
    workers: NonZeroUsize,
}

impl TaskGroup {
    pub fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    #[inline(always)]
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Runs `f` once per job and blocks until all jobs are done.
    ///
    /// The last job runs on the calling thread, the others on a pool of `jobs.len() - 1`
    /// threads. If the pool cannot be built every job runs on the calling thread instead.
    /// A panic in any job is re-raised here after the remaining jobs have finished.
    ///
    /// # Panics
    ///
    /// Panics if more jobs than workers are submitted.
    pub fn scope_each<T, F>(&self, jobs: Vec<T>, f: F)
    where
        T: Send,
        F: Fn(T) + Sync,
    {
        self.scope_each_with(
            |threads| {
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("parmul-worker-{index}"))
                    .build()
            },
            jobs,
            f,
        );
    }

    /// [`Self::scope_each`] with the pool built by `build_pool(threads)`.
    pub(crate) fn scope_each_with<B, T, F>(&self, build_pool: B, mut jobs: Vec<T>, f: F)
    where
        B: FnOnce(usize) -> Result<ThreadPool, ThreadPoolBuildError>,
        T: Send,
        F: Fn(T) + Sync,
    {
        assert!(
            jobs.len() <= self.workers.get(),
            "{} jobs submitted to a group of {} workers",
            jobs.len(),
            self.workers
        );

        let Some(inline) = jobs.pop() else {
            return;
        };

        if jobs.is_empty() {
            f(inline);
            return;
        }

        let spawned = jobs.len();
        match build_pool(spawned) {
            Ok(pool) => {
                debug!("forking {} jobs onto {} pool threads", spawned + 1, spawned);
                pool.in_place_scope(|scope| {
                    let f = &f;
                    for job in jobs {
                        scope.spawn(move |_| f(job));
                    }
                    f(inline);
                });
            }
            Err(e) => {
                warn!(
                    "could not start {} worker threads ({}); running {} jobs on the calling thread",
                    spawned,
                    e,
                    spawned + 1
                );
                jobs.into_iter().for_each(&f);
                f(inline);
            }
        }
    }
}
