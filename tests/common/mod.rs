#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bson::{Bson, Document, oid::ObjectId};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use validator::Validate;

use resource_server::middleware::auth::{CasdoorMiddleware, CasdoorOptions};
use resource_server::repos::{Entity, EntityService, ListOptions, RepoResult};
use resource_server::services::auth::{Claims, ClaimVerifier, VerifyError};
use resource_server::state::AppState;

/// Maps `token-<user>` to a verified identity with id `<user>`.
pub struct StaticVerifier;

impl ClaimVerifier for StaticVerifier {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let user = token
            .strip_prefix("token-")
            .ok_or(VerifyError::MissingUserId)?;
        Ok(serde_json::from_value(serde_json::json!({
            "id": user,
            "name": user,
            "exp": 0,
        }))
        .unwrap())
    }
}

pub fn state_with(options: CasdoorOptions) -> AppState {
    AppState::new(Arc::new(CasdoorMiddleware::new(
        options,
        Arc::new(StaticVerifier),
    )))
}

pub fn state() -> AppState {
    state_with(CasdoorOptions::default())
}

/// Untracked, unowned entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Note {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub text: String,
}

impl Entity for Note {
    const COLLECTION: &'static str = "notes";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

/// In-memory backend recording every call it receives.
pub struct MemoryService<T> {
    items: Mutex<Vec<T>>,
    calls: Mutex<Vec<&'static str>>,
    filters: Mutex<Vec<Document>>,
    last_update: Mutex<Option<(ObjectId, Document)>>,
}

impl<T: Entity> MemoryService<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            filters: Mutex::new(Vec::new()),
            last_update: Mutex::new(None),
        })
    }

    pub fn seed(&self, mut item: T) -> ObjectId {
        let id = item.id().unwrap_or_else(ObjectId::new);
        item.set_id(id);
        self.items.lock().unwrap().push(item);
        id
    }

    pub fn items(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn filters(&self) -> Vec<Document> {
        self.filters.lock().unwrap().clone()
    }

    pub fn last_update(&self) -> Option<(ObjectId, Document)> {
        self.last_update.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn matching(&self, filter: &Document) -> Vec<T> {
        self.filters.lock().unwrap().push(filter.clone());
        self.items
            .lock()
            .unwrap()
            .iter()
            .filter(|&item| matches(item, filter))
            .cloned()
            .collect()
    }
}

fn matches<T: Entity>(item: &T, filter: &Document) -> bool {
    let doc = bson::to_document(item).unwrap();
    filter.iter().all(|(key, expected)| {
        let actual = doc.get(key);
        match expected {
            Bson::Document(op) if op.contains_key("$in") => match op.get_array("$in") {
                Ok(values) => actual.is_some_and(|a| values.contains(a)),
                Err(_) => false,
            },
            other => actual == Some(other),
        }
    })
}

#[async_trait]
impl<T: Entity> EntityService<T> for MemoryService<T> {
    async fn find_all(&self) -> RepoResult<Vec<T>> {
        self.record("find_all");
        Ok(self.items())
    }

    async fn find_list(&self, filter: Document, options: ListOptions) -> RepoResult<Vec<T>> {
        self.record("find_list");
        let found = self.matching(&filter);
        Ok(match options.page {
            Some(page) => found
                .into_iter()
                .skip(page.skip() as usize)
                .take(page.size as usize)
                .collect(),
            None => found,
        })
    }

    async fn count(&self, filter: Document) -> RepoResult<u64> {
        self.record("count");
        Ok(self.matching(&filter).len() as u64)
    }

    async fn find_by_id(&self, id: ObjectId) -> RepoResult<Option<T>> {
        self.record("find_by_id");
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned())
    }

    async fn create(&self, mut entity: T) -> RepoResult<T> {
        self.record("create");
        if entity.id().is_none() {
            entity.set_id(ObjectId::new());
        }
        self.items.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepoResult<()> {
        self.record("update_fields");
        *self.last_update.lock().unwrap() = Some((id, fields.clone()));

        let mut items = self.items.lock().unwrap();
        if let Some(item) = items.iter_mut().find(|item| item.id() == Some(id)) {
            let mut doc = bson::to_document(&*item)?;
            for (key, value) in fields {
                doc.insert(key, value);
            }
            *item = bson::from_document(doc)?;
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<()> {
        self.record("delete");
        self.items.lock().unwrap().retain(|item| item.id() != Some(id));
        Ok(())
    }

    async fn delete_many(&self, filter: Document) -> RepoResult<u64> {
        self.record("delete_many");
        let doomed = self.matching(&filter);
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| !doomed.iter().any(|d| d.id() == item.id()));
        Ok((before - items.len()) as u64)
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap()
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        content_type,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// `token` is sent as `Authorization: Bearer <token>` when present.
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
