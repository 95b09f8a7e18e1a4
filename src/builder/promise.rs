//! Builder for promise configs.

use crate::builder::error::BuildError;
use crate::core::{FinallyConfig, OneOrMany, PromiseConfig, TransitionConfig};

/// Builder for a promise-typed transition set.
#[derive(Debug, Default)]
pub struct PromiseBuilder {
    src: Option<String>,
    then: Vec<TransitionConfig>,
    catch: Vec<TransitionConfig>,
    finally: Vec<FinallyConfig>,
    description: Option<String>,
}

impl PromiseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the promise handler to invoke (required).
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Transition taken when the promise resolves (at least one required).
    pub fn then(mut self, transition: impl Into<TransitionConfig>) -> Self {
        self.then.push(transition.into());
        self
    }

    /// Transition taken when the promise rejects (at least one required).
    pub fn catch(mut self, transition: impl Into<TransitionConfig>) -> Self {
        self.catch.push(transition.into());
        self
    }

    pub fn finally(mut self, clause: impl Into<FinallyConfig>) -> Self {
        self.finally.push(clause.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Result<PromiseConfig, BuildError> {
        let src = self.src.ok_or(BuildError::MissingSource)?;
        if self.then.is_empty() {
            return Err(BuildError::MissingThen);
        }
        if self.catch.is_empty() {
            return Err(BuildError::MissingCatch);
        }

        Ok(PromiseConfig {
            src,
            then: OneOrMany::Many(self.then),
            catch: OneOrMany::Many(self.catch),
            finally: OneOrMany::Many(self.finally),
            description: self.description,
        })
    }
}
