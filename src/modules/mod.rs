pub mod analytics;
pub mod books;

use std::sync::Arc;

use shelfline_kernel::ModuleRegistry;
use shelfline_store::BookStore;

use books::service::ReadingListService;

/// Register all shelfline modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn BookStore>) {
    let service = Arc::new(ReadingListService::new(store));
    registry.register(books::create_module(service.clone()));
    registry.register(analytics::create_module(service));
}
