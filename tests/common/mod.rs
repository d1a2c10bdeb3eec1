#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use todo_api::auth::AuthUser;
use todo_api::config::AppConfig;
use todo_api::database::models::{
    NewTodoItem, NewTodoList, NewUser, TodoItem, TodoItemPatch, TodoList, TodoListPatch, User,
};
use todo_api::database::{
    DatabaseError, HealthCheck, Repositories, TodoItemRepository, TodoListRepository, UserRepository,
};
use todo_api::services::Services;
use todo_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "password123";

/// In-memory stand-in for Postgres that keeps the same ownership rules:
/// lists belong to a user, items belong to a list.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    unhealthy: AtomicBool,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<User>,
    lists: BTreeMap<i64, TodoList>,
    list_owner: BTreeMap<i64, i64>,
    items: BTreeMap<i64, TodoItem>,
    item_list: BTreeMap<i64, i64>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owns_list(&self, user: AuthUser, list_id: i64) -> bool {
        self.list_owner.get(&list_id) == Some(&user.user_id)
    }

    fn owns_item(&self, user: AuthUser, list_id: i64, item_id: i64) -> bool {
        self.item_list.get(&item_id) == Some(&list_id) && self.owns_list(user, list_id)
    }
}

impl MemoryStore {
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::SeqCst);
    }

    pub fn item_count(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<i64, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(DatabaseError::UniqueViolation("users_username_key".to_string()));
        }
        let id = state.next_id();
        state.users.push(User {
            id,
            name: user.name,
            username: user.username,
            password_hash: user.password_hash,
        });
        Ok(id)
    }

    async fn get_user(&self, username: &str) -> Result<User, DatabaseError> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(DatabaseError::NotFound)
    }
}

#[async_trait]
impl TodoListRepository for MemoryStore {
    async fn create(&self, user: AuthUser, list: NewTodoList) -> Result<i64, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.lists.insert(
            id,
            TodoList {
                id,
                title: list.title,
                description: list.description,
            },
        );
        state.list_owner.insert(id, user.user_id);
        Ok(id)
    }

    async fn get_all(&self, user: AuthUser) -> Result<Vec<TodoList>, DatabaseError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .lists
            .values()
            .filter(|l| state.owns_list(user, l.id))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, user: AuthUser, list_id: i64) -> Result<TodoList, DatabaseError> {
        let state = self.state.lock().unwrap();
        if !state.owns_list(user, list_id) {
            return Err(DatabaseError::NotFound);
        }
        state.lists.get(&list_id).cloned().ok_or(DatabaseError::NotFound)
    }

    async fn update(&self, user: AuthUser, list_id: i64, patch: TodoListPatch) -> Result<(), DatabaseError> {
        if patch.title.is_none() && patch.description.is_none() {
            return Err(DatabaseError::EmptyUpdate);
        }
        let mut state = self.state.lock().unwrap();
        if !state.owns_list(user, list_id) {
            return Err(DatabaseError::NotFound);
        }
        let list = state.lists.get_mut(&list_id).ok_or(DatabaseError::NotFound)?;
        if let Some(title) = patch.title {
            list.title = title;
        }
        if let Some(description) = patch.description {
            list.description = description;
        }
        Ok(())
    }

    async fn delete(&self, user: AuthUser, list_id: i64) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_list(user, list_id) {
            return Err(DatabaseError::NotFound);
        }
        let item_ids: Vec<i64> = state
            .item_list
            .iter()
            .filter(|(_, l)| **l == list_id)
            .map(|(i, _)| *i)
            .collect();
        for item_id in item_ids {
            state.items.remove(&item_id);
            state.item_list.remove(&item_id);
        }
        state.lists.remove(&list_id);
        state.list_owner.remove(&list_id);
        Ok(())
    }
}

#[async_trait]
impl TodoItemRepository for MemoryStore {
    async fn create(&self, user: AuthUser, list_id: i64, item: NewTodoItem) -> Result<i64, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_list(user, list_id) {
            return Err(DatabaseError::NotFound);
        }
        let id = state.next_id();
        state.items.insert(
            id,
            TodoItem {
                id,
                title: item.title,
                description: item.description,
                done: false,
            },
        );
        state.item_list.insert(id, list_id);
        Ok(id)
    }

    async fn get_all(&self, user: AuthUser, list_id: i64) -> Result<Vec<TodoItem>, DatabaseError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .values()
            .filter(|i| state.owns_item(user, list_id, i.id))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, DatabaseError> {
        let state = self.state.lock().unwrap();
        if !state.owns_item(user, list_id, item_id) {
            return Err(DatabaseError::NotFound);
        }
        state.items.get(&item_id).cloned().ok_or(DatabaseError::NotFound)
    }

    async fn update(
        &self,
        user: AuthUser,
        list_id: i64,
        item_id: i64,
        patch: TodoItemPatch,
    ) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_item(user, list_id, item_id) {
            return Err(DatabaseError::NotFound);
        }
        let item = state.items.get_mut(&item_id).ok_or(DatabaseError::NotFound)?;
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(done) = patch.done {
            item.done = done;
        }
        Ok(())
    }

    async fn toggle_done(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<TodoItem, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_item(user, list_id, item_id) {
            return Err(DatabaseError::NotFound);
        }
        let item = state.items.get_mut(&item_id).ok_or(DatabaseError::NotFound)?;
        item.done = !item.done;
        Ok(item.clone())
    }

    async fn delete(&self, user: AuthUser, list_id: i64, item_id: i64) -> Result<(), DatabaseError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_item(user, list_id, item_id) {
            return Err(DatabaseError::NotFound);
        }
        state.items.remove(&item_id);
        state.item_list.remove(&item_id);
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig::default().with_overrides(|key| match key {
        "JWT_SECRET" => Some(JWT_SECRET.to_string()),
        _ => None,
    })
}

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
}

/// Serve the real router over a fresh in-memory store on an ephemeral port
pub async fn spawn_server() -> Result<TestServer> {
    let store = Arc::new(MemoryStore::default());
    let repos = Repositories {
        users: store.clone(),
        lists: store.clone(),
        items: store.clone(),
        health: store.clone(),
    };
    let services = Services::new(repos, &test_config());
    let router = app(AppState::new(services));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let res = request.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(self.client.get(self.url(path)), token).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.post(self.url(path)).json(&body), token).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.put(self.url(path)).json(&body), token).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(self.client.patch(self.url(path)), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(self.client.delete(self.url(path)), token).await
    }

    /// Register `username` and return a bearer token for it
    pub async fn sign_up_and_in(&self, username: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/auth/sign-up",
                None,
                json!({ "name": username, "username": username, "password": PASSWORD }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "sign-up failed: {} {}", status, body);

        let (status, body) = self
            .post("/auth/sign-in", None, json!({ "username": username, "password": PASSWORD }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "sign-in failed: {} {}", status, body);

        body["token"]
            .as_str()
            .map(str::to_string)
            .context("sign-in response has no token")
    }

    /// Create a list and return its id
    pub async fn create_list(&self, token: &str, title: &str, description: &str) -> Result<i64> {
        let (status, body) = self
            .post(
                "/api/lists",
                Some(token),
                json!({ "title": title, "description": description }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create list failed: {} {}", status, body);
        body["id"].as_i64().context("create list response has no id")
    }

    pub async fn create_item(&self, token: &str, list_id: i64, title: &str) -> Result<i64> {
        let (status, body) = self
            .post(
                &format!("/api/lists/{}/items", list_id),
                Some(token),
                json!({ "title": title, "description": "" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create item failed: {} {}", status, body);
        body["id"].as_i64().context("create item response has no id")
    }
}
