/*
 * Responsibility
 * - Per-controller configuration: mount path, auth policy, enabled routes
 * - Builder-style setters so registration reads as one expression
 */
use std::sync::Arc;

use bson::Document;

use crate::services::auth::Identity;

/// Extra constraints applied to list filters (e.g. tenant scoping).
pub type ListFilter = Arc<dyn Fn(&mut Document, Option<&Identity>) + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct BaseControllerOptions {
    pub router_path: String,
    /// Skip the Casdoor middleware for this router.
    pub authenticated_disabled: bool,
    /// Reject anonymous callers with 401 (strict gate).
    pub require_authenticated: bool,
}

impl BaseControllerOptions {
    pub fn new(router_path: impl Into<String>) -> Self {
        Self {
            router_path: router_path.into(),
            ..Self::default()
        }
    }

    pub fn with_authenticated_disabled(mut self, v: bool) -> Self {
        self.authenticated_disabled = v;
        self
    }

    pub fn with_require_authenticated(mut self, v: bool) -> Self {
        self.require_authenticated = v;
        self
    }
}

#[derive(Clone)]
pub struct EntityControllerOptions {
    pub base: BaseControllerOptions,

    /// `GET /all`; off unless enabled explicitly.
    pub all_disabled: bool,
    pub list_disabled: bool,
    pub search_disabled: bool,
    pub get_by_id_disabled: bool,
    pub create_disabled: bool,
    pub update_disabled: bool,
    pub delete_disabled: bool,
    pub delete_list_disabled: bool,

    /// Apply the ownership filter to `POST /search` as well.
    pub filter_current_user: bool,
    pub list_filter: Option<ListFilter>,
}

impl EntityControllerOptions {
    pub fn new(router_path: impl Into<String>) -> Self {
        Self {
            base: BaseControllerOptions::new(router_path),
            all_disabled: true,
            list_disabled: false,
            search_disabled: false,
            get_by_id_disabled: false,
            create_disabled: false,
            update_disabled: false,
            delete_disabled: false,
            delete_list_disabled: false,
            filter_current_user: false,
            list_filter: None,
        }
    }

    /// Flips every route flag at once.
    pub fn with_all_endpoints_disabled(mut self, v: bool) -> Self {
        self.all_disabled = v;
        self.list_disabled = v;
        self.search_disabled = v;
        self.get_by_id_disabled = v;
        self.create_disabled = v;
        self.update_disabled = v;
        self.delete_disabled = v;
        self.delete_list_disabled = v;
        self
    }

    pub fn with_all_disabled(mut self, v: bool) -> Self {
        self.all_disabled = v;
        self
    }

    pub fn with_list_disabled(mut self, v: bool) -> Self {
        self.list_disabled = v;
        self
    }

    pub fn with_search_disabled(mut self, v: bool) -> Self {
        self.search_disabled = v;
        self
    }

    pub fn with_get_by_id_disabled(mut self, v: bool) -> Self {
        self.get_by_id_disabled = v;
        self
    }

    pub fn with_create_disabled(mut self, v: bool) -> Self {
        self.create_disabled = v;
        self
    }

    pub fn with_update_disabled(mut self, v: bool) -> Self {
        self.update_disabled = v;
        self
    }

    pub fn with_delete_disabled(mut self, v: bool) -> Self {
        self.delete_disabled = v;
        self
    }

    pub fn with_delete_list_disabled(mut self, v: bool) -> Self {
        self.delete_list_disabled = v;
        self
    }

    pub fn with_filter_current_user(mut self, v: bool) -> Self {
        self.filter_current_user = v;
        self
    }

    pub fn with_list_filter(
        mut self,
        f: impl Fn(&mut Document, Option<&Identity>) + Send + Sync + 'static,
    ) -> Self {
        self.list_filter = Some(Arc::new(f));
        self
    }

    pub fn with_authenticated_disabled(mut self, v: bool) -> Self {
        self.base.authenticated_disabled = v;
        self
    }

    pub fn with_require_authenticated(mut self, v: bool) -> Self {
        self.base.require_authenticated = v;
        self
    }
}

impl std::fmt::Debug for EntityControllerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityControllerOptions")
            .field("base", &self.base)
            .field("all_disabled", &self.all_disabled)
            .field("list_disabled", &self.list_disabled)
            .field("search_disabled", &self.search_disabled)
            .field("get_by_id_disabled", &self.get_by_id_disabled)
            .field("create_disabled", &self.create_disabled)
            .field("update_disabled", &self.update_disabled)
            .field("delete_disabled", &self.delete_disabled)
            .field("delete_list_disabled", &self.delete_list_disabled)
            .field("filter_current_user", &self.filter_current_user)
            .field("list_filter", &self.list_filter.is_some())
            .finish()
    }
}
