use std::sync::Arc;

use depot_infra::EntityRepository;

/// Per-process service state shared by all handlers.
///
/// Stateless across requests; the repository is injected at construction so
/// tests can substitute the in-memory backend.
pub struct AppServices {
    repository: Arc<dyn EntityRepository>,
}

impl AppServices {
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &dyn EntityRepository {
        self.repository.as_ref()
    }
}
