//! Project lookup by identifier

use super::SubjectProject;
use crate::error::{PavError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a source identifier to a running backend
pub trait ProjectRegistry: Send + Sync {
    fn get_project(&self, project_id: &str) -> Result<Arc<dyn SubjectProject>>;
}

/// Registry over a fixed set of projects registered up front
#[derive(Default)]
pub struct StaticProjectRegistry {
    projects: HashMap<String, Arc<dyn SubjectProject>>,
}

impl StaticProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project under its own identifier, replacing any previous one
    pub fn register(&mut self, project: Arc<dyn SubjectProject>) {
        self.projects.insert(project.project_id().to_string(), project);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_project(mut self, project: Arc<dyn SubjectProject>) -> Self {
        self.register(project);
        self
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl ProjectRegistry for StaticProjectRegistry {
    fn get_project(&self, project_id: &str) -> Result<Arc<dyn SubjectProject>> {
        self.projects
            .get(project_id)
            .cloned()
            .ok_or_else(|| PavError::ProjectNotFound(project_id.to_string()))
    }
}
