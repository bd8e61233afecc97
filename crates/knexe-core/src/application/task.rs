//! Work a generator hands back to run after its tree was committed.

use std::fmt;

use tracing::{debug, info};

use crate::error::KnexeResult;

type TaskFn = Box<dyn FnOnce() -> KnexeResult<()> + Send>;

/// A labelled, run-once callback.
///
/// Generators never touch the real workspace themselves. Anything that needs
/// the committed files on disk (installing packages, for instance) is
/// returned as a `DeferredTask` and run by the caller after the commit.
pub struct DeferredTask {
    label: String,
    step: Option<TaskFn>,
}

impl DeferredTask {
    /// A task that does nothing.
    pub fn noop() -> Self {
        Self {
            label: "noop".into(),
            step: None,
        }
    }

    pub fn new<F>(label: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> KnexeResult<()> + Send + 'static,
    {
        Self {
            label: label.into(),
            step: Some(Box::new(f)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_noop(&self) -> bool {
        self.step.is_none()
    }

    pub fn run(self) -> KnexeResult<()> {
        let Some(step) = self.step else {
            return Ok(());
        };
        info!(task = %self.label, "Running post-generation task");
        step()?;
        debug!(task = %self.label, "Task finished");
        Ok(())
    }
}

impl Default for DeferredTask {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for DeferredTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredTask")
            .field("label", &self.label)
            .field("noop", &self.is_noop())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use std::sync::{Arc, Mutex};

    #[test]
    fn runs_its_step_once() {
        let ran = Arc::new(Mutex::new(0));
        let count = ran.clone();
        let task = DeferredTask::new("install packages", move || {
            *count.lock().unwrap() += 1;
            Ok(())
        });

        assert_eq!(task.label(), "install packages");
        assert!(!task.is_noop());
        task.run().unwrap();
        assert_eq!(*ran.lock().unwrap(), 1);
    }

    #[test]
    fn failure_is_returned() {
        let task = DeferredTask::new("install", || {
            Err(ApplicationError::TaskFailed {
                task: "install".into(),
                reason: "exit 1".into(),
            }
            .into())
        });
        assert!(task.run().is_err());
    }

    #[test]
    fn noop_does_nothing() {
        let task = DeferredTask::default();
        assert!(task.is_noop());
        assert_eq!(task.label(), "noop");
        assert!(task.run().is_ok());
    }
}
