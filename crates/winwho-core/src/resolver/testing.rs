//! Shared test doubles for resolver tests: scripted strategies with call
//! counting, and an in-memory process table.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::environment::WindowingEnvironment;
use crate::process::{Pid, ProcessNameLookup};
use crate::strategies::{FocusStrategy, StrategyError};

/// What a scripted strategy does on every call.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StepResult {
    /// Report this pid as the focused window's owner.
    Found(u32),
    /// Report no determinable answer.
    Nothing,
    /// Fail with a protocol error.
    Fail,
}

/// Shared call counter handed out by [`ScriptedStrategy::calls`].
#[derive(Clone)]
pub(crate) struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A strategy that always answers per its script and counts invocations.
pub(crate) struct ScriptedStrategy {
    name: &'static str,
    result: StepResult,
    restrict: Option<WindowingEnvironment>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStrategy {
    pub(crate) fn new(name: &'static str, result: StepResult) -> Self {
        Self {
            name,
            result,
            restrict: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Only support the given environment instead of all of them.
    pub(crate) fn restrict_to(&mut self, env: WindowingEnvironment) {
        self.restrict = Some(env);
    }

    pub(crate) fn calls(&self) -> CallCounter {
        CallCounter(Arc::clone(&self.calls))
    }
}

impl FocusStrategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, env: WindowingEnvironment) -> bool {
        match self.restrict {
            Some(only) => env == only,
            None => true,
        }
    }

    fn try_resolve_pid(&mut self) -> Result<Option<Pid>, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.result {
            StepResult::Found(pid) => Ok(Some(Pid::new(pid).expect("scripted pid must be nonzero"))),
            StepResult::Nothing => Ok(None),
            StepResult::Fail => Err(StrategyError::Protocol {
                backend: self.name,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// In-memory pid → names table.
#[derive(Default)]
pub(crate) struct FakeTable {
    entries: HashMap<u32, Vec<String>>,
}

impl FakeTable {
    pub(crate) fn with(mut self, pid: u32, name: &str) -> Self {
        self.entries.insert(pid, vec![name.to_string()]);
        self
    }
}

impl ProcessNameLookup for FakeTable {
    fn names_for(&self, pid: Pid) -> Option<Vec<String>> {
        self.entries.get(&pid.as_u32()).cloned()
    }
}
