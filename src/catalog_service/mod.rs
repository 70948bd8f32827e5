//! The admin write service and the public read helpers over a [`CatalogStore`].

mod error;
mod reads;
mod writes;

pub use error::{CatalogError, CatalogResult};

use crate::catalog_store::CatalogStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        CatalogService { store }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }
}
