//! The scheduler thread.
//!
//! A single thread owns the [`DayNightScheduler`] and waits on an mpsc channel
//! with `recv_timeout`. A timeout means the poll interval elapsed; messages
//! from the signal handler, the config watcher or the sleep monitor wake it
//! early. Because every poll runs on this one thread, polls never overlap.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{DayNightScheduler, PollOutcome};
use crate::config::Config;
use crate::theme;

/// Messages understood by the scheduler thread.
#[derive(Debug, Clone)]
pub enum SchedulerMessage {
    /// Poll now without forgetting the current period (e.g. after resume)
    Poll,
    /// Forget the current period and poll now
    Refresh,
    /// Replace the configuration, then refresh
    Reload(Box<Config>),
    /// Exit the scheduler thread
    Shutdown,
}

/// Opaque handle to a running scheduler.
pub struct SchedulerHandle {
    sender: Sender<SchedulerMessage>,
    active: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Sender for helper threads that need to wake the scheduler.
    pub fn sender(&self) -> Sender<SchedulerMessage> {
        self.sender.clone()
    }

    /// Ask the scheduler to forget its period and poll immediately.
    pub fn force_refresh(&self) -> Result<()> {
        self.sender
            .send(SchedulerMessage::Refresh)
            .context("scheduler thread is not running")
    }

    /// Ask the scheduler to poll immediately.
    pub fn poll_now(&self) -> Result<()> {
        self.sender
            .send(SchedulerMessage::Poll)
            .context("scheduler thread is not running")
    }

    /// True until stop was requested and the thread has not finished.
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel future polls.
    ///
    /// Returns without waiting. A poll that is already running finishes its
    /// network request, but none of its side effects take place.
    pub fn stop(mut self) {
        self.active.store(false, Ordering::SeqCst);
        let _ = self.sender.send(SchedulerMessage::Shutdown);
        // Detach; the thread exits on its own
        self.thread.take();
    }

    /// Block until the scheduler thread exits.
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| anyhow::anyhow!("scheduler thread panicked"))?;
        }
        Ok(())
    }
}

/// Stop a running scheduler. See [`SchedulerHandle::stop`].
pub fn stop(handle: SchedulerHandle) {
    handle.stop();
}

impl DayNightScheduler {
    /// Move the scheduler onto its own thread and start polling.
    ///
    /// The first poll runs immediately; later polls run every
    /// `poll_interval`, or the interval configured after a reload.
    pub fn start(self, poll_interval: Duration) -> Result<SchedulerHandle> {
        let (sender, receiver) = mpsc::channel();
        let active = self.active_flag();

        let thread = thread::Builder::new()
            .name("scheduler".to_string())
            .spawn(move || self.run(receiver, poll_interval))
            .context("Failed to spawn scheduler thread")?;

        Ok(SchedulerHandle {
            sender,
            active,
            thread: Some(thread),
        })
    }

    fn run(mut self, receiver: Receiver<SchedulerMessage>, mut poll_interval: Duration) {
        let mut outcome = self.poll();
        self.log_outcome(&outcome);
        let mut next_poll = Instant::now() + poll_interval;

        while self.is_active() {
            let timeout = next_poll.saturating_duration_since(Instant::now());
            match receiver.recv_timeout(timeout) {
                Ok(SchedulerMessage::Poll) => {
                    outcome = self.poll();
                }
                Ok(SchedulerMessage::Refresh) => {
                    outcome = self.force_refresh();
                }
                Ok(SchedulerMessage::Reload(config)) => {
                    let applier_changed = config.applier_settings() != self.config.applier_settings();
                    self.set_config(*config);
                    if applier_changed {
                        match theme::create_applier(&self.config) {
                            Ok(applier) => self.set_applier(applier),
                            Err(e) => {
                                log_warning!("Keeping previous theme applier: {e:#}");
                            }
                        }
                    }
                    poll_interval = self.config.poll_interval();
                    outcome = self.force_refresh();
                }
                Ok(SchedulerMessage::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    outcome = self.poll();
                }
            }
            self.log_outcome(&outcome);
            next_poll = Instant::now() + poll_interval;
        }

        self.active.store(false, Ordering::SeqCst);
        if self.debug_enabled {
            log_pipe!();
            log_debug!("Scheduler thread exiting");
        }
    }

    fn log_outcome(&self, outcome: &PollOutcome) {
        if !self.debug_enabled {
            return;
        }
        match outcome {
            PollOutcome::Unchanged(period) => {
                log_pipe!();
                log_debug!("Still {period}, nothing to apply");
            }
            PollOutcome::MissingApiKey { .. } => {
                log_pipe!();
                log_debug!("Skipped poll: no API key");
            }
            PollOutcome::Cancelled => {
                log_pipe!();
                log_debug!("Poll cancelled by stop request");
            }
            // Already logged where they happen
            PollOutcome::Switched { .. }
            | PollOutcome::ApplyFailed { .. }
            | PollOutcome::Failed(_) => {}
        }
    }
}
