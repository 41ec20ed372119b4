//! HTTP server: the JSON API over live content, plus the build output

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::contact::{ContactError, ContactMessage};
use crate::content::{
    ContentError, HttpFetcher, MarkdownRenderer, ProjectCatalog, Section, SectionResolver,
    UnknownSection,
};
use crate::contributions::{ContributionGraph, GraphData};
use crate::generator::{PostPage, PostSummary, ProjectPage, ProjectSummary, SiteMeta};
use crate::search::{SearchIndex, ROUTES};
use crate::Folio;

/// Read-only state shared by every handler
pub struct ServerState {
    folio: Folio,
    renderer: Arc<MarkdownRenderer>,
    resolver: SectionResolver<HttpFetcher>,
    catalog: ProjectCatalog,
    /// Live export; `None` means decorative data drawn per request
    graph: Option<GraphData>,
}

impl ServerState {
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = Arc::new(folio.renderer());
        let fetcher = HttpFetcher::new(folio.config.docs_base_url.clone())?;

        Ok(Self {
            folio: folio.clone(),
            resolver: SectionResolver::new(fetcher, renderer.clone()),
            renderer,
            catalog: folio.projects()?,
            graph: folio.configured_contributions().as_ref().map(GraphData::from),
        })
    }
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Section(#[from] UnknownSection),

    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("contact form is not configured")]
    ContactUnavailable,

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Content(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Section(_) => StatusCode::NOT_FOUND,
            ApiError::Contact(_) => StatusCode::BAD_REQUEST,
            ApiError::ContactUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Content(_) | ApiError::Join(_) => {
                tracing::error!(e = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = core::result::Result<T, ApiError>;

/// API routes, falling back to files under the public directory
pub fn router(state: Arc<ServerState>) -> Router {
    let public = ServeDir::new(&state.folio.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/site", get(site))
        .route("/api/posts", get(posts_list))
        .route("/api/posts/:slug", get(post_detail))
        .route("/api/projects", get(projects_list))
        .route("/api/projects/:slug", get(project_detail))
        .route("/api/projects/:slug/sections/:section", get(project_section))
        .route("/api/search", get(search))
        .route("/api/contributions", get(contributions))
        .route("/api/contact", post(contact))
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server and block until it stops
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::new(folio)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn posts_list(State(state): State<Arc<ServerState>>) -> ApiResult<Json<Vec<PostSummary>>> {
    let loader = state.folio.loader();
    let posts = tokio::task::spawn_blocking(move || loader.list_posts()).await??;

    let config = &state.folio.config;
    Ok(Json(
        posts.iter().map(|p| PostSummary::new(config, p)).collect(),
    ))
}

async fn post_detail(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostPage>> {
    let loader = state.folio.loader();
    let (post, listing) = tokio::task::spawn_blocking(move || {
        let post = loader.get_post(&slug)?;
        let listing = loader.list_posts()?;
        Ok::<_, ContentError>((post, listing))
    })
    .await??;

    Ok(Json(PostPage::new(
        &state.folio.config,
        &state.renderer,
        &post,
        &listing,
    )))
}

async fn projects_list(State(state): State<Arc<ServerState>>) -> Json<Vec<ProjectSummary>> {
    let config = &state.folio.config;
    Json(
        state
            .catalog
            .iter()
            .map(|p| ProjectSummary::new(config, p))
            .collect(),
    )
}

async fn project_detail(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ProjectPage>> {
    let project = state.catalog.get(&slug)?;
    Ok(Json(ProjectPage::new(
        &state.folio.config,
        &state.renderer,
        project,
    )))
}

/// Fetch failures come back as a 200 with a `failed` state
async fn project_section(
    State(state): State<Arc<ServerState>>,
    Path((slug, section)): Path<(String, String)>,
) -> ApiResult<Response> {
    let section: Section = section.parse()?;
    let project = state.catalog.get(&slug)?;
    let resolved = state.resolver.resolve(project, section).await;
    Ok(Json(resolved).into_response())
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Response> {
    let loader = state.folio.loader();
    let posts = tokio::task::spawn_blocking(move || loader.list_posts()).await??;

    let index = SearchIndex::build(ROUTES, state.catalog.iter(), &posts);
    Ok(Json(index.query(&params.q)).into_response())
}

async fn contributions(State(state): State<Arc<ServerState>>) -> Response {
    match &state.graph {
        Some(graph) => Json(graph).into_response(),
        None => {
            let today = chrono::Local::now().date_naive();
            let graph = ContributionGraph::random(today, &mut rand::thread_rng());
            Json(GraphData::from(&graph)).into_response()
        }
    }
}

async fn site(State(state): State<Arc<ServerState>>) -> Json<SiteMeta> {
    Json(SiteMeta::new(&state.folio.config))
}

async fn contact(
    State(state): State<Arc<ServerState>>,
    Json(message): Json<ContactMessage>,
) -> ApiResult<Json<serde_json::Value>> {
    let recipient = state.folio.config.contact_email.trim();
    if recipient.is_empty() {
        return Err(ApiError::ContactUnavailable);
    }
    let mailto = message.mailto(recipient)?;
    Ok(Json(serde_json::json!({ "mailto": mailto })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn serve() -> (TempDir, String) {
        serve_with(None).await
    }

    /// Serve a small site on an ephemeral port; remote docs are served by
    /// the same server out of the public directory
    async fn serve_with(contributions: Option<&str>) -> (TempDir, String) {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("content/posts")).unwrap();
        fs::create_dir_all(base.join("public/docs")).unwrap();
        fs::write(
            base.join("content/posts/first.md"),
            "---\ntitle: First\ndate: 2024-01-01\n---\nOld **news**",
        )
        .unwrap();
        fs::write(
            base.join("content/posts/second.md"),
            "---\ntitle: Second\ndate: 2024-05-15\n---\nFresh",
        )
        .unwrap();
        fs::write(base.join("public/docs/readme.md"), "# Hello docs").unwrap();
        fs::write(
            base.join("projects.yml"),
            "projects:\n  - slug: folio\n    name: Folio\n    content:\n      readme:\n        remote: /docs/readme.md\n      demo:\n        remote: /docs/missing.md\n",
        )
        .unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let mut folio = Folio::new(base).unwrap();
        folio.config.docs_base_url = base_url.clone();
        folio.config.contact_email = "me@example.com".to_string();
        folio.config.highlight.enable = false;
        if let Some(export) = contributions {
            fs::write(base.join("contributions.json"), export).unwrap();
            folio.config.contributions_file = Some("contributions.json".to_string());
        }

        let app = router(Arc::new(ServerState::new(&folio).unwrap()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (dir, base_url)
    }

    async fn get_json(url: &str) -> (u16, serde_json::Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        let body = response.text().await.unwrap();
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_posts() {
        let (_dir, base) = serve().await;

        let (status, listing) = get_json(&format!("{}/api/posts", base)).await;
        assert_eq!(status, 200);
        assert_eq!(listing[0]["slug"], "second");
        assert_eq!(listing[1]["slug"], "first");

        let (status, post) = get_json(&format!("{}/api/posts/first", base)).await;
        assert_eq!(status, 200);
        assert!(post["html"].as_str().unwrap().contains("<strong>news</strong>"));
        assert_eq!(post["newer"]["url"], "/blog/second");

        let (status, _) = get_json(&format!("{}/api/posts/nope", base)).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_project_sections() {
        let (_dir, base) = serve().await;

        let (status, _) = get_json(&format!("{}/api/projects/nope", base)).await;
        assert_eq!(status, 404);

        let url = format!("{}/api/projects/folio/sections", base);
        let (status, readme) = get_json(&format!("{}/readme", url)).await;
        assert_eq!(status, 200);
        assert_eq!(readme["state"], "ready");
        assert_eq!(readme["html"], "<h1>Hello docs</h1>\n");

        let (status, demo) = get_json(&format!("{}/demo", url)).await;
        assert_eq!(status, 200);
        assert_eq!(demo["state"], "failed");
        assert_eq!(demo["message"], "Failed to load demo.");

        let (_, challenges) = get_json(&format!("{}/challenges", url)).await;
        assert_eq!(challenges["state"], "empty");

        let (status, _) = get_json(&format!("{}/gallery", url)).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_search_and_contact() {
        let (_dir, base) = serve().await;

        let (_, results) = get_json(&format!("{}/api/search?q=sec", base)).await;
        assert_eq!(results["groups"][0]["heading"], "Posts");
        assert_eq!(results["groups"][0]["entries"][0]["href"], "/blog/second");

        let (_, none) = get_json(&format!("{}/api/search?q=zzzz", base)).await;
        assert_eq!(none["groups"].as_array().unwrap().len(), 0);

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/api/contact", base))
            .header("content-type", "application/json")
            .body(r#"{"name":"Ada","email":"ada@example.com","message":"Hi there"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value =
            serde_json::from_str(&response.text().await.unwrap()).unwrap();
        assert!(body["mailto"]
            .as_str()
            .unwrap()
            .starts_with("mailto:me@example.com?subject=Message%20from%20Ada"));

        let response = client
            .post(format!("{}/api/contact", base))
            .header("content-type", "application/json")
            .body(r#"{"name":"Ada","email":"not-an-email","message":"Hi"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_random_contributions_redrawn_per_request() {
        let (_dir, base) = serve().await;
        let url = format!("{}/api/contributions", base);

        let (status, first) = get_json(&url).await;
        assert_eq!(status, 200);
        assert_eq!(first["weeks"].as_array().unwrap().len(), 53);
        assert_eq!(first["end"], chrono::Local::now().date_naive().to_string());

        // 371 independent five-way draws; identical grids are not a real outcome
        let (_, second) = get_json(&url).await;
        assert_ne!(first["weeks"], second["weeks"]);
    }

    #[tokio::test]
    async fn test_exported_contributions_are_stable() {
        let (_dir, base) = serve_with(Some(
            r#"[{"date":"2024-05-15","count":3},{"date":"2024-05-14","count":1}]"#,
        ))
        .await;
        let url = format!("{}/api/contributions", base);

        let (_, first) = get_json(&url).await;
        let (_, second) = get_json(&url).await;
        assert_eq!(first["end"], "2024-05-15");
        assert_eq!(first["total"], 4);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_site_meta() {
        let (_dir, base) = serve().await;
        let (status, site) = get_json(&format!("{}/api/site", base)).await;
        assert_eq!(status, 200);
        assert_eq!(site["title"], "Portfolio");
        assert!(site["github"].is_null());
    }
}
