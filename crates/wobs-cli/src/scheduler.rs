//! Recurring reports at fixed local hours
//!
//! Every pass re-resolves each target and reads its local clock. A target
//! fires once its wall-clock time reaches its due time, so UTC offset
//! changes never shift the hour a report goes out at. Between passes the
//! scheduler sleeps until the earliest due time, capped so newly reachable
//! targets are picked up.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};
use wobs_core::{ReportHours, TargetLocation, TargetSelector};

use crate::observer::Observer;

const MIN_SLEEP: Duration = Duration::from_secs(1);

pub struct Scheduler {
    observer: Observer,
    hours: ReportHours,
    max_sleep: Duration,
    retry: Duration,
    due: HashMap<String, NaiveDateTime>,
}

impl Scheduler {
    pub fn new(observer: Observer, hours: ReportHours, max_sleep: Duration, retry: Duration) -> Self {
        Self {
            observer,
            hours,
            max_sleep: max_sleep.max(MIN_SLEEP),
            retry: retry.max(MIN_SLEEP),
            due: HashMap::new(),
        }
    }

    /// Next report time of a target on its own wall clock, once scheduled
    pub fn due(&self, name: &str) -> Option<NaiveDateTime> {
        self.due.get(name).copied()
    }

    /// Run until the process is terminated
    pub async fn run(&mut self, selector: &dyn TargetSelector) -> Result<()> {
        let targets = loop {
            match selector.load_targets().await {
                Ok(targets) => break targets,
                Err(e) => {
                    error!(error = %e, retry_secs = self.retry.as_secs(), "cannot load targets");
                    tokio::time::sleep(self.retry).await;
                }
            }
        };
        info!(
            targets = targets.len(),
            sink = self.observer.sink_name(),
            "Scheduler started"
        );

        loop {
            let wait = self.tick(&targets).await;
            debug!(secs = wait.as_secs(), "sleeping");
            tokio::time::sleep(wait).await;
        }
    }

    /// One pass over the targets; returns how long to sleep.
    pub async fn tick(&mut self, targets: &[String]) -> Duration {
        let mut earliest: Option<Duration> = None;
        for name in targets {
            if let Some(wait) = self.step(name).await {
                earliest = Some(earliest.map_or(wait, |e| e.min(wait)));
            }
        }

        match earliest {
            Some(wait) => wait.clamp(MIN_SLEEP, self.max_sleep),
            None => self.retry,
        }
    }

    /// Resolve the target afresh and fire it if its wall clock has reached
    /// the due time. Returns the time left until its next report, or `None`
    /// when it could not be resolved or timed.
    async fn step(&mut self, name: &str) -> Option<Duration> {
        let location = self.observer.resolve(name).await?;
        let local_now = self.observer.local_now(&location).await?;
        let wall = local_now.naive_local();

        let due = match self.due.get(name) {
            Some(due) => *due,
            None => {
                let due = self.hours.next_fire(wall);
                info!(target_name = name, due = %due, "report scheduled");
                self.due.insert(name.to_string(), due);
                due
            }
        };

        let due = if wall >= due {
            self.fire(name, &location, local_now).await
        } else {
            due
        };
        Some((due - wall).to_std().unwrap_or(Duration::ZERO))
    }

    async fn fire(
        &mut self,
        name: &str,
        location: &TargetLocation,
        local_now: DateTime<FixedOffset>,
    ) -> NaiveDateTime {
        info!(target_name = name, "It is time to report");
        let report = self.observer.collect(location, Some(local_now)).await;
        self.observer.emit(&report).await;

        let next = self.hours.next_fire_after(local_now.naive_local());
        debug!(target_name = name, next = %next, "next report");
        self.due.insert(name.to_string(), next);
        next
    }
}
