/*
 * Responsibility
 * - Process-level services shared by every router (AppState)
 *   - auth: the single Casdoor middleware instance
 *   - casdoor: management API client (absent when no endpoint is configured)
 * - Cheap to clone (Arc inside)
 */
use std::sync::Arc;

use crate::middleware::auth::CasdoorMiddleware;
use crate::services::casdoor::CasdoorClient;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<CasdoorMiddleware>,
    pub casdoor: Option<Arc<CasdoorClient>>,
}

impl AppState {
    pub fn new(auth: Arc<CasdoorMiddleware>) -> Self {
        Self {
            auth,
            casdoor: None,
        }
    }

    pub fn with_casdoor_client(mut self, client: CasdoorClient) -> Self {
        self.casdoor = Some(Arc::new(client));
        self
    }
}
