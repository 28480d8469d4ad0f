// src/pipeline/step.rs

//! The single branching primitive of the pipeline.
//!
//! Every stage is an application of [`run_when`]: a gate, an async action,
//! and optional run/skip notes. A skipped stage is a success, not a failure.

use tracing::info;

use crate::errors::Result;

/// A stage gate: either one flag, or several that must all hold.
#[derive(Debug, Clone)]
pub enum Condition {
    One(bool),
    All(Vec<bool>),
}

impl Condition {
    /// AND-reduce; an empty list holds.
    pub fn holds(&self) -> bool {
        match self {
            Condition::One(b) => *b,
            Condition::All(bs) => bs.iter().all(|b| *b),
        }
    }
}

impl From<bool> for Condition {
    fn from(b: bool) -> Self {
        Condition::One(b)
    }
}

impl From<Vec<bool>> for Condition {
    fn from(bs: Vec<bool>) -> Self {
        Condition::All(bs)
    }
}

impl From<&[bool]> for Condition {
    fn from(bs: &[bool]) -> Self {
        Condition::All(bs.to_vec())
    }
}

/// Run `action` when `condition` holds, otherwise short-circuit successfully.
///
/// `run_msg` is logged before the action runs; `skip_msg` when it does not.
/// No retry, no timeout: the action's own outcome is the stage outcome.
pub async fn run_when<F, Fut>(
    condition: impl Into<Condition>,
    action: F,
    run_msg: Option<&str>,
    skip_msg: Option<&str>,
) -> Result<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    if condition.into().holds() {
        if let Some(msg) = run_msg {
            info!("{msg}");
        }
        action().await
    } else {
        if let Some(msg) = skip_msg {
            info!("{msg}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_holds() {
        assert!(Condition::from(Vec::<bool>::new()).holds());
    }

    #[test]
    fn list_is_and_reduced() {
        assert!(Condition::from(vec![true, true]).holds());
        assert!(!Condition::from(vec![true, false]).holds());
        assert!(!Condition::from(vec![false]).holds());
    }
}
