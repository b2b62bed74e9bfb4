//! Propagation worklist.
//!
//! A write to a signal fans out to its dependant computed signals, and each of
//! those fans out again. Running that chain on the call stack would make the
//! maximum supported chain depth a function of stack size, so propagation runs
//! on an explicit job stack instead: the root write drains the list, and every
//! job may push follow-up jobs while it runs.
//!
//! Ordering contract: jobs for one signal's dependants are pushed in reverse
//! registration order, so popping yields registration order, and a child's
//! jobs land above its parent's remaining siblings. The visible effect is the
//! same depth-first order a recursive implementation would produce.

/// One unit of propagation work. May schedule more work while running.
struct Job(Box<dyn FnOnce(&mut Worklist)>);

/// LIFO list of pending propagation jobs for a single root write.
#[derive(Default)]
pub(crate) struct Worklist {
    jobs: Vec<Job>,
}

impl Worklist {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Schedule a job on top of the stack.
    pub(crate) fn push(&mut self, job: impl FnOnce(&mut Worklist) + 'static) {
        self.jobs.push(Job(Box::new(job)));
    }

    /// Run jobs until none remain. Jobs pushed mid-drain run before anything
    /// that was already below them on the stack.
    pub(crate) fn drain(&mut self) {
        while let Some(Job(job)) = self.jobs.pop() {
            job(self);
        }
    }
}
