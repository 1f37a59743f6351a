//! In-process publish queue with at-least-once delivery to a channel.
//!
//! `PublishQueue` validates and records tasks, then hands their ids to a
//! bounded `mpsc` channel. `PublishWorker` drains the channel, resolves each
//! draft, and calls the channel publisher under a [`RetryPolicy`]. A task is
//! marked `published` only after the channel confirms, so a transient
//! failure is retried rather than dropped; a task whose retry budget runs
//! out is dead-lettered.
//!
//! Idempotency key: `(channel, draft_id)`. While a task for the key is
//! queued, running, retrying, or published, `enqueue` returns that task's
//! ticket instead of creating another.
//!
//! On shutdown the worker stops taking new tasks, waits for in-flight
//! publishes to settle, and fails whatever is still queued so no task is
//! left `queued` or `running`.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use autonomax_types::error::PublishError;
use autonomax_types::event::ProductEvent;
use autonomax_types::publish::{
    PublishChannel, PublishStatus, PublishTask, PublishTicket, TaskId,
};

use super::channel::{BoxChannelPublisher, Listing};
use super::retry::RetryPolicy;
use crate::event::bus::EventBus;
use crate::repository::draft::DraftRepository;

/// Tasks processed concurrently by one worker.
const DEFAULT_WORKER_CONCURRENCY: usize = 4;

/// Published or failed tasks kept for status lookup.
const DEFAULT_RETAIN_FINISHED: usize = 1024;

/// Producer side of the publish queue. Cheap to clone.
#[derive(Clone)]
pub struct PublishQueue {
    sender: mpsc::Sender<TaskId>,
    tasks: Arc<DashMap<TaskId, PublishTask>>,
    live: Arc<DashMap<(PublishChannel, String), TaskId>>,
    events: EventBus,
    retain_finished: usize,
}

impl PublishQueue {
    /// Create a queue holding at most `capacity` pending tasks. The returned
    /// receiver is handed to [`PublishWorker::new`].
    pub fn new(capacity: usize, events: EventBus) -> (Self, mpsc::Receiver<TaskId>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let queue = Self {
            sender,
            tasks: Arc::new(DashMap::new()),
            live: Arc::new(DashMap::new()),
            events,
            retain_finished: DEFAULT_RETAIN_FINISHED,
        };
        (queue, receiver)
    }

    /// Keep at most `retain` published or failed tasks.
    pub fn with_retention(mut self, retain: usize) -> Self {
        self.retain_finished = retain;
        self
    }

    /// Accept a publish request and return immediately.
    ///
    /// The channel name is checked before anything is recorded; an unknown
    /// channel is rejected with [`PublishError::UnsupportedChannel`].
    pub fn enqueue(&self, channel: &str, draft_id: &str) -> Result<PublishTicket, PublishError> {
        let channel: PublishChannel = channel.parse()?;

        let task = match self.live.entry((channel, draft_id.to_string())) {
            Entry::Occupied(mut entry) => {
                let existing = self
                    .tasks
                    .get(entry.get())
                    .map(|t| (t.task_id, t.status.clone()));
                match existing {
                    Some((task_id, status)) if status.blocks_duplicate() => {
                        tracing::debug!(%task_id, %draft_id, "publish already in progress, reusing task");
                        return Ok(PublishTicket { status, task_id });
                    }
                    _ => {
                        let task = self.submit(channel, draft_id)?;
                        entry.insert(task.task_id);
                        task
                    }
                }
            }
            Entry::Vacant(entry) => {
                let task = self.submit(channel, draft_id)?;
                entry.insert(task.task_id);
                task
            }
        };

        self.events.emit(ProductEvent::PublishQueued {
            task_id: task.task_id,
            draft_id: task.draft_id.clone(),
            channel,
        });

        Ok(PublishTicket {
            status: task.status,
            task_id: task.task_id,
        })
    }

    /// Record a new task and push its id onto the channel.
    fn submit(&self, channel: PublishChannel, draft_id: &str) -> Result<PublishTask, PublishError> {
        let task = PublishTask::new(channel, draft_id);
        self.tasks.insert(task.task_id, task.clone());

        if let Err(err) = self.sender.try_send(task.task_id) {
            self.tasks.remove(&task.task_id);
            return Err(match err {
                mpsc::error::TrySendError::Full(_) => PublishError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => PublishError::QueueClosed,
            });
        }

        Ok(task)
    }

    /// Snapshot of a task.
    pub fn get(&self, task_id: &TaskId) -> Option<PublishTask> {
        self.tasks.get(task_id).map(|t| t.clone())
    }

    /// Dead-lettered tasks, oldest first.
    pub fn dead_letters(&self) -> Vec<PublishTask> {
        let mut dead: Vec<PublishTask> = self
            .tasks
            .iter()
            .filter(|t| t.status == PublishStatus::DeadLettered)
            .map(|t| t.clone())
            .collect();
        dead.sort_by_key(|t| t.updated_at);
        dead
    }

    /// Evict the oldest published or failed tasks beyond the retention
    /// limit. An evicted task no longer blocks a duplicate request.
    fn prune_finished(&self) {
        let mut finished: Vec<(chrono::DateTime<Utc>, TaskId, PublishChannel, String)> = self
            .tasks
            .iter()
            .filter(|t| matches!(t.status, PublishStatus::Published | PublishStatus::Failed))
            .map(|t| (t.updated_at, t.task_id, t.channel, t.draft_id.clone()))
            .collect();
        if finished.len() <= self.retain_finished {
            return;
        }

        finished.sort_by_key(|(updated_at, ..)| *updated_at);
        let excess = finished.len() - self.retain_finished;
        for (_, task_id, channel, draft_id) in finished.into_iter().take(excess) {
            self.tasks.remove(&task_id);
            self.live.remove_if(&(channel, draft_id), |_, live_id| *live_id == task_id);
        }
        tracing::debug!(evicted = excess, "pruned finished publish tasks");
    }

    fn update(&self, task_id: &TaskId, apply: impl FnOnce(&mut PublishTask)) {
        if let Some(mut task) = self.tasks.get_mut(task_id) {
            apply(&mut task);
            task.updated_at = Utc::now();
        }
    }
}

impl std::fmt::Debug for PublishQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishQueue")
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// Consumer side of the publish queue.
pub struct PublishWorker<R: DraftRepository> {
    queue: PublishQueue,
    receiver: mpsc::Receiver<TaskId>,
    publisher: BoxChannelPublisher,
    drafts: Arc<R>,
    policy: RetryPolicy,
    concurrency: usize,
}

impl<R: DraftRepository + 'static> PublishWorker<R> {
    pub fn new(
        queue: PublishQueue,
        receiver: mpsc::Receiver<TaskId>,
        publisher: BoxChannelPublisher,
        drafts: Arc<R>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            queue,
            receiver,
            publisher,
            drafts,
            policy,
            concurrency: DEFAULT_WORKER_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Drain the queue until `cancel` fires or every producer is dropped.
    ///
    /// Returns only after every started job has finished. Tasks still
    /// waiting in the channel at that point are marked failed.
    pub async fn run(mut self, cancel: CancellationToken) {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let job = Arc::new(PublishJob {
            queue: self.queue.clone(),
            publisher: self.publisher.clone(),
            drafts: self.drafts.clone(),
            policy: self.policy.clone(),
            cancel: cancel.clone(),
        });

        let mut jobs = JoinSet::new();

        tracing::info!(channel = %self.publisher.channel(), concurrency = self.concurrency, "publish worker started");

        loop {
            let task_id = tokio::select! {
                _ = cancel.cancelled() => break,
                Some(joined) = jobs.join_next(), if !jobs.is_empty() => {
                    log_job_exit(joined);
                    continue;
                }
                next = self.receiver.recv() => match next {
                    Some(task_id) => task_id,
                    None => break,
                },
            };

            let permit = tokio::select! {
                _ = cancel.cancelled() => {
                    job.fail(&task_id, "worker shut down before publishing".to_string(), false);
                    break;
                }
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let job = job.clone();
            jobs.spawn(async move {
                let _permit = permit;
                job.process(task_id).await;
                job.queue.prune_finished();
            });
        }

        if !jobs.is_empty() {
            tracing::info!(in_flight = jobs.len(), "waiting for in-flight publishes");
        }
        while let Some(joined) = jobs.join_next().await {
            log_job_exit(joined);
        }

        self.receiver.close();
        while let Ok(task_id) = self.receiver.try_recv() {
            job.fail(&task_id, "worker shut down before publishing".to_string(), false);
        }

        tracing::info!("publish worker stopped");
    }
}

fn log_job_exit(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "publish job panicked");
    }
}

/// Shared per-task processing state.
struct PublishJob<R: DraftRepository> {
    queue: PublishQueue,
    publisher: BoxChannelPublisher,
    drafts: Arc<R>,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl<R: DraftRepository> PublishJob<R> {
    #[tracing::instrument(name = "publish_task", skip(self), fields(%task_id))]
    async fn process(&self, task_id: TaskId) {
        let Some(task) = self.queue.get(&task_id) else {
            tracing::warn!("publish task vanished before processing");
            return;
        };

        if task.channel != self.publisher.channel() {
            self.fail(
                &task_id,
                format!("no publisher wired for channel '{}'", task.channel),
                false,
            );
            return;
        }

        let listing = match self.drafts.get(&task.draft_id).await {
            Ok(Some(draft)) => Listing::from_draft(&draft),
            Ok(None) => {
                tracing::debug!(draft_id = %task.draft_id, "draft not in store, publishing placeholder listing");
                Listing::placeholder(&task.draft_id)
            }
            Err(e) => {
                tracing::warn!(draft_id = %task.draft_id, error = %e, "draft lookup failed, publishing placeholder listing");
                Listing::placeholder(&task.draft_id)
            }
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            self.queue.update(&task_id, |t| {
                t.status = PublishStatus::Running;
                t.attempts = attempt;
            });

            let err = match self.publisher.publish(&listing).await {
                Ok(receipt) => {
                    self.queue.update(&task_id, |t| {
                        t.status = PublishStatus::Published;
                        t.product_id = Some(receipt.product_id.clone());
                        t.error = None;
                    });
                    self.queue.events.emit(ProductEvent::PublishSucceeded {
                        task_id,
                        product_id: receipt.product_id,
                    });
                    return;
                }
                Err(err) => err,
            };

            if self.policy.should_retry(attempt, &err) {
                let message = err.to_string();
                self.queue.update(&task_id, |t| {
                    t.status = PublishStatus::Retrying;
                    t.error = Some(message.clone());
                });
                self.queue.events.emit(ProductEvent::PublishRetrying {
                    task_id,
                    attempt,
                    error: message,
                });

                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        self.fail(&task_id, "worker shut down before retry".to_string(), false);
                        return;
                    }
                    _ = tokio::time::sleep(self.policy.delay_for_attempt(attempt)) => {}
                }
                continue;
            }

            self.fail(&task_id, err.to_string(), err.is_retryable());
            return;
        }
    }

    fn fail(&self, task_id: &TaskId, error: String, dead_letter: bool) {
        let status = if dead_letter {
            PublishStatus::DeadLettered
        } else {
            PublishStatus::Failed
        };
        self.queue.update(task_id, |t| {
            t.status = status;
            t.error = Some(error.clone());
        });
        self.queue.events.emit(ProductEvent::PublishFailed {
            task_id: *task_id,
            error,
            dead_lettered: dead_letter,
        });
    }
}
