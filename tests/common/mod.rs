use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use deckbake::errors::Result;
use deckbake::exec::{ScriptCall, ScriptRunner};

/// Behaviour hook for [`FakeRunner`]: inspect the call, optionally touch the
/// filesystem, and decide the outcome.
pub type RunBehaviour = dyn Fn(&ScriptCall) -> Result<()> + Send + Sync;

/// A fake runner that records every collaborator invocation instead of
/// spawning processes. An optional behaviour closure can simulate
/// collaborator side effects (writing output files, failing).
#[derive(Clone)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<ScriptCall>>>,
    behaviour: Option<Arc<RunBehaviour>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            behaviour: None,
        }
    }

    pub fn with_behaviour(
        behaviour: impl Fn(&ScriptCall) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            behaviour: Some(Arc::new(behaviour)),
        }
    }

    /// Fail any call whose label matches; everything else succeeds.
    pub fn failing_on(label: &'static str) -> Self {
        Self::with_behaviour(move |call| {
            if call.label == label {
                Err(anyhow!("{label} blew up").into())
            } else {
                Ok(())
            }
        })
    }

    pub fn calls(&self) -> Vec<ScriptCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.label).collect()
    }
}

impl ScriptRunner for FakeRunner {
    async fn run(&self, call: ScriptCall) -> Result<()> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.behaviour {
            Some(behaviour) => behaviour(&call),
            None => Ok(()),
        }
    }
}
