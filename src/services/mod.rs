//! Business logic services

pub mod book_instances;
pub mod lookup;
pub mod views;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn CatalogStore>,
    pub book_instances: book_instances::BookInstanceService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            book_instances: book_instances::BookInstanceService::new(store.clone()),
            store,
        }
    }
}
