//! Parallel region generation on a pool of worker threads.
//!
//! Regions are independent: workers pull them from a bounded queue in no
//! particular order, run the generation job, and deliver results through a
//! bounded channel. Pending regions can be cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;

use crate::error::PipelineError;
use crate::facets::RegionFacets;
use crate::pipeline::FieldPipeline;
use crate::region::Region3;

/// A finished region.
#[derive(Debug)]
pub struct GeneratedRegion<T> {
    pub region: Region3,
    pub output: T,
    /// Wall time spent in the job, in microseconds.
    pub generation_time_us: u64,
}

struct QueuedRegion {
    region: Region3,
    cancelled: Arc<AtomicBool>,
}

/// Worker count derived from the CPU count, leaving one core for the host.
pub fn default_thread_count() -> usize {
    let cpus = num_cpus::get().max(2);
    (cpus - 1).max(1)
}

type Job<T> = dyn Fn(Region3) -> T + Send + Sync;

/// Runs a per-region job across a fixed set of worker threads.
pub struct RegionGenerator<T> {
    task_sender: Sender<QueuedRegion>,
    result_receiver: Receiver<GeneratedRegion<T>>,
    active_tasks: Arc<DashMap<Region3, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl<T: Send + 'static> RegionGenerator<T> {
    /// Spawns `thread_count` workers running `job`.
    ///
    /// `max_concurrent` bounds the task queue; `result_capacity` bounds the
    /// result channel.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new<F>(
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
        job: F,
    ) -> std::io::Result<Self>
    where
        F: Fn(Region3) -> T + Send + Sync + 'static,
    {
        let (task_sender, task_receiver) = bounded::<QueuedRegion>(max_concurrent.max(1) * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedRegion<T>>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));
        let job: Arc<Job<T>> = Arc::new(job);

        for index in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let job = Arc::clone(&job);

            std::thread::Builder::new()
                .name(format!("region-gen-{index}"))
                .spawn(move || {
                    while let Ok(queued) = receiver.recv() {
                        if queued.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let output = job(queued.region);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !queued.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedRegion {
                                region: queued.region,
                                output,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        tracing::debug!(threads = thread_count.max(1), "region generator started");

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Queues a region. Returns `Err(region)` if the queue is full.
    pub fn submit(&self, region: Region3) -> Result<(), Region3> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(region, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedRegion { region, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                let region = e.into_inner().region;
                self.active_tasks.remove(&region);
                region
            })
    }

    /// Cancels a pending or running region. No-op if it already finished.
    pub fn cancel(&self, region: &Region3) {
        if let Some((_, cancelled)) = self.active_tasks.remove(region) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Takes every finished region without blocking.
    pub fn drain_results(&self) -> Vec<GeneratedRegion<T>> {
        let mut results = Vec::new();
        while let Ok(done) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&done.region);
            results.push(done);
        }
        results
    }

    /// Blocks until `count` results arrived or `timeout` elapsed.
    pub fn collect(&self, count: usize, timeout: std::time::Duration) -> Vec<GeneratedRegion<T>> {
        let deadline = std::time::Instant::now() + timeout;
        let mut results = Vec::with_capacity(count);
        while results.len() < count {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.result_receiver.recv_timeout(remaining) {
                Ok(done) => {
                    self.active_tasks.remove(&done.region);
                    results.push(done);
                }
                Err(_) => break,
            }
        }
        results
    }

    /// Regions queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn is_pending(&self, region: &Region3) -> bool {
        self.active_tasks.contains_key(region)
    }
}

impl RegionGenerator<Result<Arc<RegionFacets>, PipelineError>> {
    /// Workers that run `pipeline` for each submitted region.
    pub fn for_pipeline(pipeline: Arc<FieldPipeline>, thread_count: usize) -> std::io::Result<Self> {
        Self::new(thread_count, 64, 128, move |region| pipeline.generate(region))
    }
}
