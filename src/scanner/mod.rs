//! # Scan Loop
//!
//! Repeatedly captures the configured region, searches it for each target
//! and clicks what it finds.
//!
//! Both modes run the same loop body; a [`ScanPolicy`] decides how often the
//! region is captured and what happens after a hit:
//! - **Single hit**: one capture per cycle, the first target in list order
//!   that matches is clicked and the rest of the list is skipped.
//! - **Per target**: every target gets its own fresh capture and every match
//!   is clicked. A short pause follows each target whether it matched or not.
//!
//! After each cycle the loop sleeps for the configured interval. It only
//! stops when a capture fails.

pub mod dispatch;

use std::thread;
use std::time::{Duration, Instant};

use crate::automation::Pointer;
use crate::capture::{Region, ScreenSource};
use crate::config::ScanConfig;
use crate::error::CaptureError;
use crate::matching::{Match, find_subimage};
use crate::targets::Target;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanMode {
    SingleHit,
    PerTarget,
}

impl ScanMode {
    pub fn policy(self, config: &ScanConfig) -> ScanPolicy {
        match self {
            ScanMode::SingleHit => ScanPolicy {
                capture_once_per_cycle: true,
                stop_at_first_hit: true,
                inter_target_delay: Duration::ZERO,
            },
            ScanMode::PerTarget => ScanPolicy {
                capture_once_per_cycle: false,
                stop_at_first_hit: false,
                inter_target_delay: config.per_target_delay(),
            },
        }
    }
}

/// How one cycle treats captures and hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Share one snapshot between all targets of a cycle instead of
    /// capturing before each target.
    pub capture_once_per_cycle: bool,
    /// End the cycle at the first target that matches.
    pub stop_at_first_hit: bool,
    /// Pause after each target before the next one is tried.
    pub inter_target_delay: Duration,
}

/// A target that was found and clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    pub target: String,
    /// Offset inside the captured region.
    pub offset: Match,
    /// Absolute screen point that was clicked.
    pub clicked: (i32, i32),
}

pub struct Scanner<'a, S, P> {
    config: &'a ScanConfig,
    targets: &'a [Target],
    policy: ScanPolicy,
    screen: S,
    pointer: P,
    sleep: Box<dyn FnMut(Duration) + 'a>,
}

impl<'a, S: ScreenSource, P: Pointer> Scanner<'a, S, P> {
    pub fn new(
        config: &'a ScanConfig,
        targets: &'a [Target],
        mode: ScanMode,
        screen: S,
        pointer: P,
    ) -> Self {
        Self {
            config,
            targets,
            policy: mode.policy(config),
            screen,
            pointer,
            sleep: Box::new(thread::sleep),
        }
    }

    /// Replaces the blocking sleep used between targets and cycles.
    pub fn with_sleep(mut self, sleep: impl FnMut(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Runs cycles until a capture fails.
    pub fn run(&mut self) -> Result<(), CaptureError> {
        let interval = self.config.interval();
        loop {
            let hits = self.run_cycle()?;
            log::debug!("Cycle done with {} hit(s), next in {:?}", hits.len(), interval);
            (self.sleep)(interval);
        }
    }

    /// Runs a single cycle over all targets and returns what was clicked.
    pub fn run_cycle(&mut self) -> Result<Vec<Hit>, CaptureError> {
        let rect = self.config.region;
        let params = self.config.search_params();
        let targets = self.targets;
        let mut hits = Vec::new();

        let shared = if self.policy.capture_once_per_cycle {
            Some(self.screen.capture_region(rect)?)
        } else {
            None
        };

        for target in targets {
            let started = Instant::now();
            let fresh: Region;
            let region = match &shared {
                Some(region) => region,
                None => {
                    fresh = self.screen.capture_region(rect)?;
                    &fresh
                }
            };

            if let Some(offset) = find_subimage(&region.pixels, &target.image, params) {
                match dispatch::click_target(
                    &mut self.pointer,
                    region.rect,
                    target,
                    offset,
                    self.config.button,
                    self.config.click_hold(),
                ) {
                    Ok(clicked) => {
                        log::info!(
                            "[HIT] {} @ ROI({},{}) ABS({},{}) ({:.1}ms)",
                            target.name,
                            offset.x,
                            offset.y,
                            clicked.0,
                            clicked.1,
                            started.elapsed().as_secs_f64() * 1000.0
                        );
                        hits.push(Hit {
                            target: target.name.clone(),
                            offset,
                            clicked,
                        });
                    }
                    Err(e) => log::warn!("Found {} but could not click it: {}", target.name, e),
                }

                if self.policy.stop_at_first_hit {
                    break;
                }
            }

            // The pause applies to every target, matched or not.
            if !self.policy.inter_target_delay.is_zero() {
                (self.sleep)(self.policy.inter_target_delay);
            }
        }
        Ok(hits)
    }
}
