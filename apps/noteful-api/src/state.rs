use std::sync::Arc;

use noteful_service::NotefulService;
use noteful_storage::Store;

use crate::routes::ApiError;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NotefulService>,
	/// Include error names and internal messages in error bodies. Development only.
	pub expose_errors: bool,
}
impl AppState {
	pub fn new(store: Arc<dyn Store>, expose_errors: bool) -> Self {
		Self { service: Arc::new(NotefulService::new(store)), expose_errors }
	}

	pub(crate) fn fail(&self, err: impl Into<ApiError>) -> ApiError {
		err.into().exposed(self.expose_errors)
	}
}
