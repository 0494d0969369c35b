//! Background task dispatch.
//!
//! Acquisition runs happen off the request path: handlers submit a boxed
//! future and return immediately. The runner half lives in its own spawned
//! task and executes submissions concurrently; tests use [`TaskRunner::drain`]
//! instead to execute everything already submitted, deterministically, on
//! the current task.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;
use tracing::{debug, info};

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Create a connected dispatcher/runner pair.
pub fn task_channel() -> (Dispatcher, TaskRunner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher { tx }, TaskRunner { rx })
}

/// Submission half. Cheap to clone.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Task>,
}

impl Dispatcher {
    /// Queue a background task. Silently dropped if the runner is gone,
    /// which only happens during shutdown.
    pub fn submit<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.tx.send(Box::pin(task)).is_err() {
            debug!("Task runner stopped, dropping background task");
        }
    }
}

/// Execution half.
pub struct TaskRunner {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl TaskRunner {
    /// Run until every dispatcher handle is dropped. Each submission gets
    /// its own tokio task so long acquisitions do not serialize.
    pub async fn run(mut self) {
        info!("Task runner started");
        while let Some(task) = self.rx.recv().await {
            tokio::spawn(task);
        }
        info!("Task runner stopped");
    }

    /// Execute everything submitted so far, inline and in order.
    pub async fn drain(&mut self) {
        while let Ok(task) = self.rx.try_recv() {
            task.await;
        }
    }
}
