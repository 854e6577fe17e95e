// maulog - GPL-3.0-or-later
// This file is part of maulog.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// maulog is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// maulog is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with maulog.  If not, see <https://www.gnu.org/licenses/>.

//! Keyed background worker.
//!
//! One thread runs submitted tasks one at a time. Pending tasks are keyed:
//! submitting under a key that is still pending replaces the older task, and
//! among pending tasks the smallest key runs first. Callers can block until
//! everything submitted so far has run with [`TaskWorkerHandle::wait_idle`].

use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

type Task = Box<dyn FnOnce() + Send>;

enum Request<K> {
    Run(K, Task),
    /// Answered once no task is pending
    Flush(Sender<()>),
}

/// Handle to submit tasks to the worker.
///
/// Clone this to submit from multiple places (including other threads).
/// When all handles are dropped, the worker thread exits after draining.
pub struct TaskWorkerHandle<K> {
    request_tx: Sender<Request<K>>,
}

impl<K> Clone for TaskWorkerHandle<K> {
    fn clone(&self) -> Self {
        Self {
            request_tx: self.request_tx.clone(),
        }
    }
}

impl<K: Send + 'static> TaskWorkerHandle<K> {
    /// Submit a task. A pending task with the same `key` is dropped in its
    /// favor.
    ///
    /// Returns `false` if the worker thread is gone.
    pub fn submit<F>(&self, key: K, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.request_tx.send(Request::Run(key, Box::new(work))).is_ok()
    }

    /// Block until every task submitted before this call has run or been
    /// replaced by one that has.
    ///
    /// Must not be called from inside a task: the worker would wait on itself.
    pub fn wait_idle(&self) {
        let (done_tx, done_rx) = channel();
        if self.request_tx.send(Request::Flush(done_tx)).is_ok() {
            // A dropped sender means the worker exited, which is idle too
            let _ = done_rx.recv();
        }
    }
}

/// Single-threaded keyed task worker.
///
/// Tasks never run concurrently with each other, which makes the worker the
/// only writer of whatever state its tasks touch.
pub struct TaskWorker<K> {
    handle: TaskWorkerHandle<K>,
    _thread: thread::JoinHandle<()>,
}

impl<K> TaskWorker<K>
where
    K: Ord + Send + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel();

        let thread = thread::spawn(move || {
            Self::worker_loop(&request_rx);
        });

        Self {
            handle: TaskWorkerHandle { request_tx },
            _thread: thread,
        }
    }

    pub fn handle(&self) -> TaskWorkerHandle<K> {
        self.handle.clone()
    }

    fn worker_loop(request_rx: &Receiver<Request<K>>) {
        tracing::debug!("Task worker thread started");
        let mut pending: BTreeMap<K, Task> = BTreeMap::new();
        let mut waiters: Vec<Sender<()>> = Vec::new();

        // Exits when all senders are dropped
        while let Ok(request) = request_rx.recv() {
            Self::accept(request, &mut pending, &mut waiters);
            Self::drain(request_rx, &mut pending, &mut waiters);

            while let Some((_key, task)) = pending.pop_first() {
                task();
                Self::drain(request_rx, &mut pending, &mut waiters);
            }

            for waiter in waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
        tracing::debug!("Task worker thread shutting down (channel closed)");
    }

    fn accept(request: Request<K>, pending: &mut BTreeMap<K, Task>, waiters: &mut Vec<Sender<()>>) {
        match request {
            Request::Run(key, work) => {
                if pending.insert(key, work).is_some() {
                    tracing::trace!("Replaced pending task");
                }
            }
            Request::Flush(waiter) => waiters.push(waiter),
        }
    }

    /// Take everything already queued without blocking
    fn drain(
        request_rx: &Receiver<Request<K>>,
        pending: &mut BTreeMap<K, Task>,
        waiters: &mut Vec<Sender<()>>,
    ) {
        while let Ok(request) = request_rx.try_recv() {
            Self::accept(request, pending, waiters);
        }
    }
}

impl<K: Ord + Send + 'static> Default for TaskWorker<K> {
    fn default() -> Self {
        Self::new()
    }
}
