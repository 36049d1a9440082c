//! Generic CRUD controller over one [`Entity`] type.
//!
//! Routes, relative to the controller's path:
//!
//! | method | path      | operation                          |
//! |--------|-----------|------------------------------------|
//! | GET    | `/all`    | every visible record (off by default) |
//! | GET    | `/`       | paged list from query parameters   |
//! | POST   | `/search` | paged list from a JSON body        |
//! | GET    | `/{id}`   | one record                         |
//! | POST   | `/`       | create                             |
//! | PUT    | `/{id}`   | partial update                     |
//! | DELETE | `/{id}`   | delete one                         |
//! | DELETE | `/`       | delete by id list                  |
//!
//! Ownership-aware types are filtered to the caller's records; a record the
//! caller does not own is reported exactly like a missing one.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{MethodRouter, get, post},
};
use bson::{Document, doc};
use serde_json::{Map, Value};
use validator::Validate;

use crate::api::controller::base::BaseController;
use crate::api::controller::options::EntityControllerOptions;
use crate::api::controller::ownership::{
    add_owner_constraint_if_needed, assert_current_user_owns, stamp_creator, stamp_modification,
    strip_protected_fields,
};
use crate::api::dto::{BatchRequest, ListQuery, ListQueryParams, SearchInput};
use crate::api::extractors::{CurrentUser, EntityId};
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::repos::{Entity, EntityService, ListOptions};
use crate::services::auth::Identity;
use crate::state::AppState;

pub struct EntityController<T: Entity> {
    service: Arc<dyn EntityService<T>>,
    options: EntityControllerOptions,
}

type Ctl<T> = State<Arc<EntityController<T>>>;

impl<T: Entity> EntityController<T> {
    pub fn new(service: Arc<dyn EntityService<T>>, options: EntityControllerOptions) -> Self {
        Self { service, options }
    }

    pub fn options(&self) -> &EntityControllerOptions {
        &self.options
    }

    /// The enabled routes, without auth layers or mount path.
    pub fn routes<S>(self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let o = &self.options;
        let mut router: Router<Arc<Self>> = Router::new();

        if !o.all_disabled {
            router = router.route("/all", get(list_all::<T>));
        }
        if !o.search_disabled {
            router = router.route("/search", post(search::<T>));
        }

        let mut root: MethodRouter<Arc<Self>> = MethodRouter::new();
        if !o.list_disabled {
            root = root.get(list::<T>);
        }
        if !o.create_disabled {
            root = root.post(create::<T>);
        }
        if !o.delete_list_disabled {
            root = root.delete(delete_list::<T>);
        }
        if !(o.list_disabled && o.create_disabled && o.delete_list_disabled) {
            router = router.route("/", root);
        }

        let mut by_id: MethodRouter<Arc<Self>> = MethodRouter::new();
        if !o.get_by_id_disabled {
            by_id = by_id.get(get_by_id::<T>);
        }
        if !o.update_disabled {
            by_id = by_id.put(update::<T>);
        }
        if !o.delete_disabled {
            by_id = by_id.delete(delete::<T>);
        }
        if !(o.get_by_id_disabled && o.update_disabled && o.delete_disabled) {
            router = router.route("/{id}", by_id);
        }

        router.with_state(Arc::new(self))
    }

    /// Mounts the routes on `app` at the configured path behind the auth layers.
    pub fn register<S>(self, app: Router<S>, state: &AppState) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let base = BaseController::new(self.options.base.clone());
        tracing::debug!(
            collection = T::COLLECTION,
            path = %base.options.router_path,
            "registering entity controller"
        );
        base.register(app, self.routes(), state)
    }

    fn apply_list_filter(&self, filter: &mut Document, identity: Option<&Identity>) {
        add_owner_constraint_if_needed::<T>(Some(&mut *filter), identity);
        if let Some(hook) = &self.options.list_filter {
            hook(filter, identity);
        }
    }

    /// Loads a record the caller may see; anything else is `invalid id`.
    async fn find_visible(&self, id: &EntityId, identity: Option<&Identity>) -> Result<T, AppError> {
        let item = self
            .service
            .find_by_id(id.id)
            .await?
            .ok_or_else(|| AppError::invalid_id(&id.raw))?;

        if !assert_current_user_owns(&item, identity) {
            return Err(AppError::invalid_id(&id.raw));
        }
        Ok(item)
    }
}

async fn list_all<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    all_visible(&c, user.identity()).await
}

async fn all_visible<T: Entity>(
    c: &EntityController<T>,
    identity: Option<&Identity>,
) -> Result<Response, AppError> {
    let mut filter = Document::new();
    c.apply_list_filter(&mut filter, identity);

    let list = if filter.is_empty() {
        c.service.find_all().await?
    } else {
        c.service.find_list(filter, ListOptions::default()).await?
    };
    let total = list.len() as u64;
    Ok(ApiResponse::list(list, total).into_response())
}

async fn list<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    Query(params): Query<ListQueryParams>,
) -> Result<Response, AppError> {
    let query = ListQuery::try_from(params)?;
    if query.all {
        return all_visible(&c, user.identity()).await;
    }

    let mut filter = query.filter;
    c.apply_list_filter(&mut filter, user.identity());

    let options = ListOptions::default()
        .with_sort(query.sort)
        .with_page(query.page, query.size);
    let list = c.service.find_list(filter.clone(), options).await?;
    let total = c.service.count(filter).await?;

    Ok(ApiResponse::list(list, total).into_response())
}

async fn search<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    body: Result<Json<SearchInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = body?;
    input.validate()?;

    let mut filter = input.filter_document()?;
    if c.options.filter_current_user {
        add_owner_constraint_if_needed::<T>(Some(&mut filter), user.identity());
    }

    let page = &input.pagination;
    let options = ListOptions::default()
        .with_sort(input.sort.to_sort_fields())
        .with_page(page.current, page.page_size);
    let list = c.service.find_list(filter.clone(), options).await?;
    let total = c.service.count(filter).await?;

    Ok(ApiResponse::table(list, total, page.current, page.page_size).into_response())
}

async fn get_by_id<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    id: EntityId,
) -> Result<Response, AppError> {
    let item = c.find_visible(&id, user.identity()).await?;
    Ok(ApiResponse::data(item).into_response())
}

async fn create<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    body: Result<Json<T>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(mut input) = body?;
    input.validate()?;

    stamp_creator(&mut input, user.identity());
    let created = c.service.create(input).await?;

    tracing::debug!(collection = T::COLLECTION, id = ?created.id(), "record created");
    Ok(ApiResponse::data(created).into_response())
}

async fn update<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    id: EntityId,
    body: Bytes,
) -> Result<Response, AppError> {
    c.find_visible(&id, user.identity()).await?;

    // body is decoded only once the record is known to be visible
    let input: Map<String, Value> = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request("INVALID_BODY", e.to_string()))?;
    let mut fields = bson::to_document(&input)
        .map_err(|e| AppError::bad_request("INVALID_BODY", e.to_string()))?;
    strip_protected_fields::<T>(&mut fields);

    stamp_modification::<T>(&mut fields, user.identity());
    c.service.update_fields(id.id, fields).await?;
    Ok(ApiResponse::ok().into_response())
}

async fn delete<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    id: EntityId,
) -> Result<Response, AppError> {
    c.find_visible(&id, user.identity()).await?;
    c.service.delete(id.id).await?;
    Ok(ApiResponse::ok().into_response())
}

async fn delete_list<T: Entity>(
    State(c): Ctl<T>,
    user: CurrentUser,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(input) = body?;
    if input.ids.is_empty() {
        return Ok(ApiResponse::ok().into_response());
    }

    let ids = input.object_ids()?;
    let mut filter = doc! { "_id": { "$in": ids } };
    add_owner_constraint_if_needed::<T>(Some(&mut filter), user.identity());

    let deleted = c.service.delete_many(filter).await?;
    tracing::debug!(collection = T::COLLECTION, deleted, "batch delete");
    Ok(ApiResponse::ok().into_response())
}
