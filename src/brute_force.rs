//! Multithreaded brute-force fallback search
//!
//! Independent comparison baseline for the lattice attack: partitions the
//! unknown-part range [0, X) into disjoint arithmetic-progression strides,
//! one per worker. A shared atomic "found" flag plus a lock-guarded result
//! slot give first-writer-wins semantics; workers poll the flag each
//! iteration and exit early once any worker succeeds. Cancellation is
//! cooperative only; a coordinator waits up to a caller-supplied timeout,
//! after which outstanding workers are asked to stop, best-effort.

use crate::core::error::{AttackError, Result};
use crate::core::types::AttackResult;
use crate::exposure::ExposureType;
use rug::ops::RemRounding;
use rug::Integer;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// Iterations between deadline/flag re-checks inside a worker
const POLL_STRIDE: u64 = 1024;

/// Parameters for the brute-force search
#[derive(Debug, Clone)]
pub struct BruteForceParams {
    /// Number of worker threads (>= 1)
    pub workers: usize,
    /// Overall deadline for the search
    pub timeout: Duration,
}

impl Default for BruteForceParams {
    fn default() -> Self {
        BruteForceParams {
            workers: 4,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Brute-force search over the unknown part of the private exponent
pub struct BruteForceSearch {
    e: Integer,
    d0: Integer,
    bound: Integer,
    modulus: Integer,
    exposure_type: ExposureType,
    known_bits: u32,
    params: BruteForceParams,
}

impl BruteForceSearch {
    pub fn new(
        e: Integer,
        d0: Integer,
        bound: Integer,
        modulus: Integer,
        exposure_type: ExposureType,
        known_bits: u32,
        params: BruteForceParams,
    ) -> Self {
        BruteForceSearch {
            e,
            d0,
            bound,
            modulus,
            exposure_type,
            known_bits,
            params,
        }
    }

    /// Run the search. Returns a normal negative result on exhaustion or
    /// timeout; the configuration is validated before any thread starts.
    pub fn run(&self) -> AttackResult {
        let start = Instant::now();
        match self.execute(start) {
            Ok(Some(x)) => AttackResult::success(x, start.elapsed()),
            Ok(None) => AttackResult::failure(
                "Brute-force search exhausted the range or timed out",
                start.elapsed(),
            ),
            Err(e) => AttackResult::failure(e.to_string(), start.elapsed()),
        }
    }

    fn execute(&self, start: Instant) -> Result<Option<Integer>> {
        if self.params.workers < 1 {
            return Err(AttackError::invalid_parameters(
                "Brute force requires at least one worker",
            ));
        }
        if self.bound < 1 {
            return Err(AttackError::invalid_parameters("Search bound must be positive"));
        }

        let found = Arc::new(AtomicBool::new(false));
        let stop = Arc::new(AtomicBool::new(false));
        let result: Arc<Mutex<Option<Integer>>> = Arc::new(Mutex::new(None));
        let attempts = Arc::new(AtomicU64::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let workers = self.params.workers;
        let deadline = start + self.params.timeout;

        log::info!(
            "Brute-force search: {} exposure, {} workers, bound 2^{}",
            self.exposure_type,
            workers,
            self.bound.significant_bits().saturating_sub(1)
        );

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let ctx = WorkerContext {
                e: self.e.clone(),
                d0: self.d0.clone(),
                bound: self.bound.clone(),
                modulus: self.modulus.clone(),
                exposure_type: self.exposure_type,
                known_bits: self.known_bits,
                stride: workers as u64,
                start_offset: worker_id as u64,
                deadline,
                found: Arc::clone(&found),
                stop: Arc::clone(&stop),
                result: Arc::clone(&result),
                attempts: Arc::clone(&attempts),
                finished: Arc::clone(&finished),
            };
            handles.push(thread::spawn(move || ctx.run()));
        }

        // Coordinator: wait for success, exhaustion, or the deadline
        loop {
            if found.load(Ordering::SeqCst) || finished.load(Ordering::SeqCst) == workers {
                break;
            }
            if Instant::now() >= deadline {
                log::warn!("Brute-force deadline reached, requesting worker stop");
                stop.store(true, Ordering::SeqCst);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        stop.store(true, Ordering::SeqCst);

        for handle in handles {
            // Workers poll the stop flag every iteration, so joins are prompt
            let _ = handle.join();
        }

        log::info!(
            "Brute-force finished after {} attempts in {:.3}s",
            attempts.load(Ordering::SeqCst),
            start.elapsed().as_secs_f64()
        );

        let slot = result
            .lock()
            .map_err(|_| AttackError::custom("Brute-force result lock poisoned"))?;
        Ok(slot.clone())
    }
}

struct WorkerContext {
    e: Integer,
    d0: Integer,
    bound: Integer,
    modulus: Integer,
    exposure_type: ExposureType,
    known_bits: u32,
    stride: u64,
    start_offset: u64,
    deadline: Instant,
    found: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
    result: Arc<Mutex<Option<Integer>>>,
    attempts: Arc<AtomicU64>,
    finished: Arc<AtomicUsize>,
}

impl WorkerContext {
    fn run(self) {
        // MSB: e*x ≡ 1 - e*d0 (mod M); LSB tests the full reconstructed
        // exponent since the shift moves x above the known bits.
        let target = match self.exposure_type {
            ExposureType::Msb => {
                let t = Integer::from(1) - Integer::from(&self.e * &self.d0);
                Some(t.rem_euc(&self.modulus))
            }
            ExposureType::Lsb => None,
        };

        let mut x = Integer::from(self.start_offset);
        let stride = Integer::from(self.stride);
        let mut local_attempts = 0u64;

        while x < self.bound {
            if self.found.load(Ordering::Relaxed) || self.stop.load(Ordering::Relaxed) {
                break;
            }

            let hit = match &target {
                Some(t) => {
                    let lhs = Integer::from(&self.e * &x).rem_euc(&self.modulus);
                    lhs == *t
                }
                None => {
                    let d_candidate = (x.clone() << self.known_bits) + &self.d0;
                    let value = Integer::from(&self.e * &d_candidate) - 1u32;
                    value.is_divisible(&self.modulus)
                }
            };

            if hit {
                let mut slot = match self.result.lock() {
                    Ok(s) => s,
                    Err(_) => break,
                };
                // First writer wins
                if !self.found.swap(true, Ordering::SeqCst) {
                    log::debug!("Worker {} found x = {}", self.start_offset, x);
                    *slot = Some(x);
                }
                break;
            }

            local_attempts += 1;
            if local_attempts % POLL_STRIDE == 0 && Instant::now() >= self.deadline {
                break;
            }
            x += &stride;
        }

        self.attempts.fetch_add(local_attempts, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
