//! Site server with live reload
//!
//! Pages are rendered per request straight from the content tree, so a
//! file change only needs a browser reload.

pub mod auth;
pub mod contact;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path as UrlPath, Query, State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::post::{load_post, load_posts, search};
use crate::content::{ContentKind, ContentPipeline, SiteSettings};
use crate::templates::{self, PageContext, Section};
use crate::Site;

/// Script appended to every page while watching; reloads on a `reload` message
const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(() => {
  const socket = new WebSocket(`ws://${location.host}/__livereload`);
  socket.addEventListener('message', (event) => {
    if (event.data === 'reload') location.reload();
  });
  socket.addEventListener('close', () => setTimeout(() => location.reload(), 1000));
})();
</script>
"#;

/// Shared by all handlers
pub struct AppState {
    pub site: Site,
    pub pipeline: ContentPipeline,
    /// Client for the OAuth token exchange
    pub http: reqwest::Client,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl AppState {
    pub fn new(site: Site, live_reload: bool) -> Result<Self> {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        let http = reqwest::Client::builder()
            .user_agent(concat!("lawsite/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            pipeline: site.pipeline(),
            site,
            http,
            reload_tx,
            live_reload,
        })
    }

    fn context<'a>(&'a self, settings: &'a SiteSettings, section: Section) -> PageContext<'a> {
        PageContext {
            settings,
            site_url: &self.site.config.url,
            language: &self.site.config.language,
            section,
        }
    }

    /// Rendered body of a page document; empty when the document is missing
    fn page_body(&self, slug: &str) -> String {
        match self.site.store().fetch(ContentKind::Pages, slug).found() {
            Some(doc) => self.pipeline.render(Some(&doc.body)),
            None => String::new(),
        }
    }

    fn html(&self, page: String) -> Response {
        if self.live_reload {
            Html(inject_live_reload(&page)).into_response()
        } else {
            Html(page).into_response()
        }
    }

    fn not_found(&self) -> Response {
        let settings = self.site.settings(None);
        let page = templates::not_found(&self.context(&settings, Section::Other));
        (StatusCode::NOT_FOUND, self.html(page)).into_response()
    }
}

/// Run `build` on the blocking pool; content reads go through `std::fs`
pub(crate) async fn blocking<F>(state: &Arc<AppState>, build: F) -> Response
where
    F: FnOnce(&AppState) -> Response + Send + 'static,
{
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || build(&state)).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Render task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Build the router for a site
pub fn router(state: Arc<AppState>) -> Router {
    let content = ServeDir::new(&state.site.content_dir);

    Router::new()
        .route("/", get(home_handler))
        .route("/sobre", get(about_handler))
        .route("/blog", get(blog_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/contato", get(contact_handler).post(contact::submit))
        .route("/__livereload", get(livereload_handler))
        .merge(auth::routes())
        .nest_service("/content", content)
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(site.clone(), watch)?);
    let reload_tx = state.reload_tx.clone();
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let paths = vec![site.content_dir.clone(), site.public_dir.clone()];
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(paths, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch for file changes and notify connected browsers
fn watch_and_reload(paths: Vec<PathBuf>, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in &paths {
        if path.exists() {
            debouncer.watcher().watch(path, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| {
                        let path_str = e.path.to_string_lossy();
                        !path_str.contains(".git")
                            && !path_str.contains(".DS_Store")
                            && !path_str.ends_with('~')
                    })
                    .collect();

                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }
                // No receivers just means no browser is connected
                let _ = reload_tx.send(());
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    blocking(&state, |state| {
        let settings = state.site.settings(Some("home"));
        let posts = load_posts(&state.site.store());
        let page = templates::home(&state.context(&settings, Section::Home), &posts);
        state.html(page)
    })
    .await
}

async fn about_handler(State(state): State<Arc<AppState>>) -> Response {
    blocking(&state, |state| {
        let settings = state.site.settings(Some("sobre"));
        let body = state.page_body("sobre");
        let page = templates::about(&state.context(&settings, Section::About), &body);
        state.html(page)
    })
    .await
}

async fn contact_handler(State(state): State<Arc<AppState>>) -> Response {
    blocking(&state, |state| {
        let settings = state.site.settings(Some("contato"));
        let body = state.page_body("contato");
        let page = templates::contact(&state.context(&settings, Section::Contact), &body);
        state.html(page)
    })
    .await
}

#[derive(Debug, Default, Deserialize)]
struct BlogQuery {
    #[serde(default)]
    q: String,
}

async fn blog_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogQuery>,
) -> Response {
    blocking(&state, move |state| {
        let settings = state.site.settings(None);
        let posts = load_posts(&state.site.store());
        let found = search(&posts, &query.q);
        let page = templates::blog(&state.context(&settings, Section::Blog), &found, &query.q);
        state.html(page)
    })
    .await
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(slug): UrlPath<String>,
) -> Response {
    blocking(&state, move |state| {
        let Some(post) = load_post(&state.site.store(), &state.pipeline, &slug) else {
            return state.not_found();
        };

        let settings = state.site.settings(None);
        let video = post
            .featured_video
            .as_ref()
            .map(|v| state.pipeline.sanitize(&templates::featured_video(v)))
            .unwrap_or_default();
        let page = templates::post(&state.context(&settings, Section::Blog), &post, &video);
        state.html(page)
    })
    .await
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Static files from the public directory; anything missing gets the not-found page
async fn fallback_handler(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();
    let clean_path = path.trim_start_matches('/');

    if clean_path.split('/').any(|segment| segment == "..") {
        return blocking(&state, |state| state.not_found()).await;
    }

    let candidate = state.site.public_dir.join(clean_path);
    let file_path = if candidate.is_dir() {
        candidate.join("index.html")
    } else {
        candidate
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        return match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => blocking(&state, |state| state.not_found()).await,
        };
    }

    let mut service = ServeDir::new(&state.site.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            blocking(&state, |state| state.not_found()).await
        }
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Insert the live reload script before `</body>`, or append it
fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], LIVE_RELOAD_SCRIPT, &html[pos..]),
        None => format!("{}{}", html, LIVE_RELOAD_SCRIPT),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn site_with_posts() -> TempDir {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("posts")).unwrap();
        fs::create_dir_all(content.join("pages")).unwrap();
        fs::create_dir_all(content.join("settings")).unwrap();
        fs::create_dir_all(dir.path().join("public/admin")).unwrap();

        fs::write(
            content.join("posts/direito-do-consumidor.md"),
            "---\ntitle: Direito do Consumidor\ndescription: Seus direitos nas compras\ndate: 2024-03-05\n---\nVeja o vídeo:\n\n[aula](https://youtu.be/dQw4w9WgXcQ)\n\n<script>alert(1)</script>\n",
        )
        .unwrap();
        fs::write(
            content.join("posts/pensao.md"),
            "---\ntitle: Pensão alimentícia\ndate: 2023-01-10\n---\nTexto.\n",
        )
        .unwrap();
        fs::write(
            content.join("pages/sobre.md"),
            "---\nlawyerName: Dr. Teste\n---\nBiografia **completa**.\n",
        )
        .unwrap();
        fs::write(content.join("settings/general.md"), "---\nsiteName: Escritório Teste\n---\n").unwrap();
        fs::write(dir.path().join("public/admin/index.html"), "<html><body>admin</body></html>").unwrap();
        dir
    }

    fn app(dir: &TempDir) -> Router {
        let site = Site::new(dir.path()).unwrap();
        router(Arc::new(AppState::new(site, false).unwrap()))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_pages_render_off_the_runtime_thread() {
        let dir = site_with_posts();
        let state = Arc::new(AppState::new(Site::new(dir.path()).unwrap(), false).unwrap());
        let runtime_thread = std::thread::current().id();

        let response = blocking(&state, move |state| {
            assert_ne!(std::thread::current().id(), runtime_thread);
            let posts = load_posts(&state.site.store());
            state.html(format!("{} artigos", posts.len()))
        })
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"2 artigos");
    }

    #[tokio::test]
    async fn test_post_page() {
        let dir = site_with_posts();
        let (status, body) = get(app(&dir), "/blog/direito-do-consumidor").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Direito do Consumidor</h1>"));
        assert!(body.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(!body.contains("alert(1)"));
        assert!(body.contains("Escritório Teste"));
    }

    #[tokio::test]
    async fn test_missing_post_is_404() {
        let dir = site_with_posts();
        let (status, body) = get(app(&dir), "/blog/nao-existe").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Página não encontrada"));
    }

    #[tokio::test]
    async fn test_invalid_slug_is_404() {
        let dir = site_with_posts();
        let (status, _) = get(app(&dir), "/blog/..%2F..%2Fsite").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blog_listing_and_search() {
        let dir = site_with_posts();
        let (status, body) = get(app(&dir), "/blog").await;
        assert_eq!(status, StatusCode::OK);
        let first = body.find("Direito do Consumidor").unwrap();
        let second = body.find("Pensão alimentícia").unwrap();
        assert!(first < second);

        let (_, body) = get(app(&dir), "/blog?q=COMPRAS").await;
        assert!(body.contains("Direito do Consumidor"));
        assert!(!body.contains("Pensão alimentícia"));

        let (_, body) = get(app(&dir), "/blog?q=inexistente").await;
        assert!(body.contains("Nenhum artigo encontrado."));
    }

    #[tokio::test]
    async fn test_about_merges_page_settings() {
        let dir = site_with_posts();
        let (status, body) = get(app(&dir), "/sobre").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Dr. Teste"));
        assert!(body.contains("<strong>completa</strong>"));
    }

    #[tokio::test]
    async fn test_home_and_contact_render() {
        let dir = site_with_posts();
        let (status, body) = get(app(&dir), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Artigos recentes"));

        let (status, body) = get(app(&dir), "/contato").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Entre em Contato"));
    }

    #[tokio::test]
    async fn test_static_files_and_unknown_routes() {
        let dir = site_with_posts();
        let (status, body) = get(app(&dir), "/admin/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("admin"));

        let (status, body) = get(app(&dir), "/content/posts/pensao.md").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("---\ntitle: Pensão"));

        let (status, body) = get(app(&dir), "/nada/aqui").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Página não encontrada"));
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body>x</body></html>");
        assert!(html.contains("/__livereload"));
        assert!(html.ends_with("</script>\n</body></html>"));
        assert!(inject_live_reload("x").contains("<script>"));
    }
}
