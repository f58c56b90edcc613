//! Error taxonomy for building and running pipelines

use thiserror::Error;

/// Errors surfaced while assembling components or threading data through them
#[derive(Debug, Error)]
pub enum PipelineError {
    /// `build` was asked for a name nobody registered in that family
    #[error("no constructor named '{name}' in the {family} registry")]
    UnregisteredComponent {
        family: &'static str,
        name: String,
    },

    /// A constructor found a required key absent from its config
    #[error("{component}: missing required config key '{key}'")]
    MissingRequiredConfig {
        component: String,
        key: &'static str,
    },

    /// A step's forward or one of its hooks failed; aborts the whole chain
    #[error("step '{step}' failed: {source}")]
    StepExecution {
        step: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// Wrap a failure in step context, keeping the innermost attribution.
    ///
    /// A nested pipeline list already names the step that actually failed;
    /// re-wrapping at every enclosing list would bury that name.
    pub fn step_failure(step: &str, source: anyhow::Error) -> anyhow::Error {
        match source.downcast::<PipelineError>() {
            Ok(err @ PipelineError::StepExecution { .. }) => err.into(),
            Ok(other) => PipelineError::StepExecution {
                step: step.to_string(),
                source: other.into(),
            }
            .into(),
            Err(source) => PipelineError::StepExecution {
                step: step.to_string(),
                source,
            }
            .into(),
        }
    }
}
