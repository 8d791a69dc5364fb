//! In-process fake of the posts REST API
//!
//! Speaks the same envelopes as the real backend and keeps its posts in
//! memory. Write routes require a bearer token, like the real one.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct StoredPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub subject: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredPost {
    fn to_json(&self) -> Value {
        let mut value = json!({
            "_id": self.id,
            "titulo": self.title,
            "conteudo": self.content,
            "autor": self.author,
            "dataCriacao": self.created_at,
            "dataAtualizacao": self.updated_at,
        });
        if let Some(subject) = &self.subject {
            value["disciplina"] = json!(subject);
        }
        if let Some(tags) = &self.tags {
            value["tags"] = json!(tags);
        }
        value
    }
}

#[derive(Debug, Default)]
struct Store {
    posts: Vec<StoredPost>,
    next_id: u64,
}

/// Handle on a running fake backend
#[derive(Clone, Default)]
pub struct FakeBackend {
    store: Arc<Mutex<Store>>,
}

impl FakeBackend {
    /// Start the fake on an ephemeral port and return it with its base URL
    pub async fn start() -> (Self, String) {
        let backend = Self::default();
        let url = serve(backend.router()).await;
        (backend, url)
    }

    /// Insert a post directly, bypassing validation
    pub fn seed(&self, title: &str, author: &str, subject: Option<&str>) -> String {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = format!("post-{}", store.next_id);
        let now = Utc::now();
        store.posts.push(StoredPost {
            id: id.clone(),
            title: title.to_string(),
            content: format!("Conteúdo sobre {}", title),
            author: author.to_string(),
            subject: subject.map(str::to_string),
            tags: None,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().posts.len()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/posts", get(list_posts).post(create_post))
            .route("/posts/search", get(search_posts))
            .route(
                "/posts/:id",
                get(get_post).put(update_post).delete(delete_post),
            )
            .with_state(self.clone())
    }
}

/// Serve `router` on 127.0.0.1 with an ephemeral port
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Search endpoint that answers the term `slow` only after `delay`
///
/// Every answer is an empty page echoing the term.
pub async fn slow_search(delay: Duration) -> String {
    let router = Router::new().route(
        "/posts/search",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            let term = params.get("q").cloned().unwrap_or_default();
            if term == "slow" {
                tokio::time::sleep(delay).await;
            }
            let mut body = page_body(Vec::new(), 1, 10);
            body["termoBusca"] = json!(term);
            Json(body)
        }),
    );
    serve(router).await
}

/// Base URL where nothing is listening
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn fail(status: StatusCode, message: &str, errors: &[String]) -> Response {
    let mut body = json!({ "sucesso": false, "mensagem": message });
    if !errors.is_empty() {
        body["erros"] = json!(errors);
    }
    (status, Json(body)).into_response()
}

fn require_token(headers: &HeaderMap) -> Result<(), Response> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Bearer ") && value.len() > 7);
    if authorized {
        Ok(())
    } else {
        Err(fail(StatusCode::UNAUTHORIZED, "Token não fornecido", &[]))
    }
}

fn page_params(params: &HashMap<String, String>) -> (usize, usize) {
    let page = params
        .get("page")
        .and_then(|v| v.parse().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .filter(|l| *l > 0)
        .unwrap_or(10);
    (page, limit)
}

fn page_body(posts: Vec<&StoredPost>, page: usize, limit: usize) -> Value {
    let total = posts.len();
    let items: Vec<Value> = posts
        .into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .map(StoredPost::to_json)
        .collect();
    json!({
        "sucesso": true,
        "dados": items,
        "paginacao": {
            "paginaAtual": page,
            "totalPaginas": total.div_ceil(limit),
            "totalPosts": total,
            "postsPorPagina": limit,
        }
    })
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

async fn list_posts(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (page, limit) = page_params(&params);
    let store = backend.store.lock().unwrap();
    let posts: Vec<&StoredPost> = store
        .posts
        .iter()
        .rev()
        .filter(|p| params.get("autor").is_none_or(|a| &p.author == a))
        .filter(|p| {
            params
                .get("disciplina")
                .is_none_or(|s| p.subject.as_ref() == Some(s))
        })
        .collect();
    Json(page_body(posts, page, limit)).into_response()
}

async fn search_posts(
    State(backend): State<FakeBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let term = params.get("q").map(|q| q.trim().to_lowercase()).unwrap_or_default();
    if term.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Termo de busca é obrigatório", &[]);
    }

    let (page, limit) = page_params(&params);
    let store = backend.store.lock().unwrap();
    let posts: Vec<&StoredPost> = store
        .posts
        .iter()
        .rev()
        .filter(|p| {
            p.title.to_lowercase().contains(&term) || p.content.to_lowercase().contains(&term)
        })
        .collect();
    let mut body = page_body(posts, page, limit);
    body["termoBusca"] = json!(params.get("q"));
    Json(body).into_response()
}

async fn get_post(State(backend): State<FakeBackend>, Path(id): Path<String>) -> Response {
    let store = backend.store.lock().unwrap();
    match store.posts.iter().find(|p| p.id == id) {
        Some(post) => Json(json!({ "sucesso": true, "dados": post.to_json() })).into_response(),
        None => fail(StatusCode::NOT_FOUND, "Post não encontrado", &[]),
    }
}

fn text(body: &Value, field: &str) -> Option<String> {
    body.get(field).and_then(Value::as_str).map(str::to_string)
}

fn tags(body: &Value) -> Option<Vec<String>> {
    body.get("tags").and_then(Value::as_array).map(|tags| {
        tags.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn server_errors(store: &Store, title: Option<&str>, except: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(title) = title {
        let taken = store
            .posts
            .iter()
            .any(|p| p.title == title && Some(p.id.as_str()) != except);
        if taken {
            errors.push("Já existe um post com este título".to_string());
        }
    }
    errors
}

async fn create_post(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_token(&headers) {
        return response;
    }

    let mut store = backend.store.lock().unwrap();
    let (Some(title), Some(content), Some(author)) =
        (text(&body, "titulo"), text(&body, "conteudo"), text(&body, "autor"))
    else {
        let errors = vec!["Título, conteúdo e autor são obrigatórios".to_string()];
        return fail(StatusCode::BAD_REQUEST, "Dados inválidos", &errors);
    };
    let errors = server_errors(&store, Some(&title), None);
    if !errors.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Dados inválidos", &errors);
    }

    store.next_id += 1;
    let now = Utc::now();
    let post = StoredPost {
        id: format!("post-{}", store.next_id),
        title,
        content,
        author,
        subject: text(&body, "disciplina"),
        tags: tags(&body),
        created_at: now,
        updated_at: now,
    };
    let data = post.to_json();
    store.posts.push(post);

    (
        StatusCode::CREATED,
        Json(json!({ "sucesso": true, "mensagem": "Post criado com sucesso", "dados": data })),
    )
        .into_response()
}

async fn update_post(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = require_token(&headers) {
        return response;
    }

    let mut store = backend.store.lock().unwrap();
    let title = text(&body, "titulo");
    let errors = server_errors(&store, title.as_deref(), Some(&id));
    if !errors.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Dados inválidos", &errors);
    }

    let Some(post) = store.posts.iter_mut().find(|p| p.id == id) else {
        return fail(StatusCode::NOT_FOUND, "Post não encontrado", &[]);
    };
    if let Some(title) = title {
        post.title = title;
    }
    if let Some(content) = text(&body, "conteudo") {
        post.content = content;
    }
    if let Some(author) = text(&body, "autor") {
        post.author = author;
    }
    if let Some(subject) = text(&body, "disciplina") {
        post.subject = Some(subject);
    }
    if let Some(tags) = tags(&body) {
        post.tags = Some(tags);
    }
    post.updated_at = Utc::now();

    Json(json!({
        "sucesso": true,
        "mensagem": "Post atualizado com sucesso",
        "dados": post.to_json(),
    }))
    .into_response()
}

async fn delete_post(
    State(backend): State<FakeBackend>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_token(&headers) {
        return response;
    }

    let mut store = backend.store.lock().unwrap();
    let before = store.posts.len();
    store.posts.retain(|p| p.id != id);
    if store.posts.len() == before {
        return fail(StatusCode::NOT_FOUND, "Post não encontrado", &[]);
    }
    Json(json!({ "sucesso": true, "mensagem": "Post excluído com sucesso" })).into_response()
}
