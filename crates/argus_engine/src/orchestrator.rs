//! The per-unit analyze, fix, and re-analyze loop.
//!
//! Each unit moves through an explicit state machine:
//!
//! ```text
//! Loaded -> Cached -> Done                      (exact cache hit)
//! Loaded -> Analyzed -> Done                    (nothing to fix)
//! Loaded -> Analyzed -> Fixed -> Analyzed ...   (bounded fix loop)
//! ```
//!
//! Units are independent and run in parallel; within one unit the loop is
//! strictly sequential because each pass analyzes the text the previous
//! pass produced. The cache is written only at a complete `Analyzed` step,
//! so interrupting the loop between iterations can never persist a
//! partially-fixed result.

use std::sync::atomic::{AtomicBool, Ordering};

use argus_cache::ResultCache;
use argus_common::{ConfigFingerprint, ContentHash, UnitId};
use argus_config::RuleSettings;
use argus_deps::DependencyResolver;
use argus_diagnostics::{Finding, Fix};
use argus_rules::{RuleContext, RuleRunner};
use argus_source::{LineIndex, UnitDb};
use rayon::prelude::*;
use tracing::debug;

use crate::fix_applier;
use crate::transform::TransformRegistry;

/// One unit's position in the analysis loop.
///
/// States are plain values so the loop logic is testable by matching on
/// transitions rather than observing side effects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnitState {
    /// Text read and preprocessed, fingerprints computed.
    Loaded,
    /// Exact cache hit; stored findings will be reported verbatim.
    Cached,
    /// Rules ran against the current text.
    Analyzed,
    /// Fixes were applied; the rewritten text needs re-analysis.
    Fixed,
    /// Terminal.
    Done,
}

/// Options controlling one session run.
#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    /// Whether findings' fixes are applied and re-analyzed.
    pub apply_fixes: bool,
    /// Ceiling on fix rounds per unit.
    pub max_passes: u32,
    /// Whether cache lookups are consulted. Writes happen regardless, so a
    /// fix run still warms the cache for the next plain check.
    pub read_cache: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            apply_fixes: false,
            max_passes: 10,
            read_cache: true,
        }
    }
}

/// The externally visible result for one unit.
#[derive(Debug)]
pub struct UnitOutcome {
    /// The unit this outcome describes.
    pub unit: UnitId,
    /// Findings in raw-text coordinates.
    pub findings: Vec<Finding>,
    /// Total fixes applied across all rounds.
    pub fixes_applied: usize,
    /// Analysis passes executed (zero for a cache hit).
    pub passes: u32,
    /// Whether the findings came from the cache.
    pub from_cache: bool,
    /// The raw text with all fixes folded in, when any fix was applied.
    pub fixed_text: Option<String>,
    /// Whether the fix round ceiling was hit with fixes still applicable.
    pub fix_budget_exhausted: bool,
}

/// One analysis run over a set of units.
///
/// The session borrows the loaded units, the dependency resolver computed
/// for them, the rule runner, and optionally a result cache; `run` drives
/// every unit through the state machine in parallel. Saving the cache
/// afterwards is the caller's job, once, after all units finish.
pub struct Session<'a> {
    db: &'a UnitDb,
    resolver: &'a DependencyResolver,
    runner: &'a RuleRunner,
    transforms: &'a TransformRegistry,
    settings: &'a RuleSettings,
    config_fp: ConfigFingerprint,
    options: SessionOptions,
    cache: Option<&'a ResultCache>,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Session<'a> {
    /// Creates a session without a cache or cancel flag.
    pub fn new(
        db: &'a UnitDb,
        resolver: &'a DependencyResolver,
        runner: &'a RuleRunner,
        transforms: &'a TransformRegistry,
        settings: &'a RuleSettings,
        config_fp: ConfigFingerprint,
        options: SessionOptions,
    ) -> Self {
        Self {
            db,
            resolver,
            runner,
            transforms,
            settings,
            config_fp,
            options,
            cache: None,
            cancel: None,
        }
    }

    /// Attaches a result cache.
    pub fn with_cache(mut self, cache: &'a ResultCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attaches a cancel flag, checked between fix iterations.
    pub fn with_cancel_flag(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Runs every unit through the loop, in parallel, in path order.
    pub fn run(&self) -> Vec<UnitOutcome> {
        self.db
            .unit_ids()
            .into_par_iter()
            .map(|unit| self.run_unit(unit))
            .collect()
    }

    /// Drives one unit through the state machine.
    pub fn run_unit(&self, unit: UnitId) -> UnitOutcome {
        let source = self.db.get(unit);
        let mut transform = self.transforms.create_for(source.suffix().as_deref());
        let mut text = transform.preprocess(&source.content);
        let mut dep_fp = self.resolver.fingerprint(unit);

        let mut findings: Vec<Finding> = Vec::new();
        let mut fixes_applied = 0usize;
        let mut passes = 0u32;
        let mut fix_rounds = 0u32;
        let mut from_cache = false;
        let mut fix_budget_exhausted = false;

        let mut state = UnitState::Loaded;
        loop {
            state = match state {
                UnitState::Loaded => {
                    let hit = if self.options.read_cache {
                        self.cache
                            .and_then(|cache| cache.get(unit, dep_fp, self.config_fp))
                    } else {
                        None
                    };
                    match hit {
                        Some(stored) => {
                            findings = stored;
                            from_cache = true;
                            UnitState::Cached
                        }
                        None => UnitState::Analyzed,
                    }
                }
                UnitState::Cached => UnitState::Done,
                UnitState::Analyzed => {
                    passes += 1;
                    let index = LineIndex::new(&text);
                    let ctx = RuleContext::new(
                        unit,
                        &source.path,
                        &text,
                        &index,
                        source.generated,
                        self.settings,
                    );
                    findings = self.runner.run(&ctx);
                    if let Some(cache) = self.cache {
                        cache.set(unit, dep_fp, self.config_fp, findings.clone());
                    }

                    let has_fixes = findings.iter().any(|f| f.fix.is_some());
                    if !self.options.apply_fixes || !has_fixes {
                        UnitState::Done
                    } else if fix_rounds >= self.options.max_passes {
                        debug!(
                            unit = ?unit,
                            rounds = fix_rounds,
                            "fix round ceiling reached with fixes still applicable"
                        );
                        fix_budget_exhausted = true;
                        UnitState::Done
                    } else if self.cancelled() {
                        UnitState::Done
                    } else {
                        UnitState::Fixed
                    }
                }
                UnitState::Fixed => {
                    let fixes: Vec<Fix> =
                        findings.iter().filter_map(|f| f.fix.clone()).collect();
                    let outcome = fix_applier::apply(&text, &fixes);
                    if outcome.applied == 0 {
                        // Every fix conflicted away; looping again would
                        // reproduce the same stalemate.
                        UnitState::Done
                    } else {
                        fix_rounds += 1;
                        fixes_applied += outcome.applied;
                        text = outcome.text;
                        if let Some(change) = outcome.change {
                            transform.on_text_changed(&text, &change);
                        }
                        let raw_now = transform.raw_text().unwrap_or_else(|| text.clone());
                        dep_fp = self
                            .resolver
                            .fingerprint_with(unit, ContentHash::from_bytes(raw_now.as_bytes()));
                        UnitState::Analyzed
                    }
                }
                UnitState::Done => break,
            };
        }

        let findings = transform.map_findings_back(findings);
        let fixed_text = if fixes_applied > 0 {
            Some(transform.raw_text().unwrap_or_else(|| text.clone()))
        } else {
            None
        };

        UnitOutcome {
            unit,
            findings,
            fixes_applied,
            passes,
            from_cache,
            fixed_text,
            fix_budget_exhausted,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}
