//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::Folio;

const RELOAD_ENDPOINT: &str = "/_folio/reload";

/// Script appended before </body> when live reload is active
const RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var sock = new WebSocket('ws://' + location.host + '/_folio/reload');
    sock.onmessage = function(msg) {
        if (msg.data === 'reload') location.reload();
    };
    sock.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

struct DevServer {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server, optionally watching for changes
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let server = Arc::new(DevServer {
        public_dir: folio.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route(RELOAD_ENDPOINT, get(reload_socket))
        .fallback(serve_site)
        .with_state(server);

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
        let folio = folio.clone();
        // The notify channel is blocking, so the watch loop runs off the
        // async runtime
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_rebuild(&folio, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild the site on source changes and broadcast a reload to clients
fn watch_and_rebuild(folio: &Folio, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.source_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.source_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", folio.source_dir);
    }

    let config_path = folio.base_dir.join("config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    while let Ok(batch) = rx.recv() {
        let events = match batch {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events
            .iter()
            .filter(|e| is_relevant_change(&e.path))
            .collect();
        if changed.is_empty() {
            continue;
        }

        for event in &changed {
            println!("File changed: {}", event.path.display());
        }

        println!("Regenerating...");
        match folio.generate() {
            Ok(_) => {
                println!("Regenerated successfully!");
                let _ = reload_tx.send(());
            }
            Err(e) => println!("Generation failed: {}", e),
        }
    }

    Ok(())
}

/// Editor droppings and VCS noise never trigger a rebuild
fn is_relevant_change(path: &Path) -> bool {
    let s = path.to_string_lossy();
    !s.contains(".git") && !s.contains(".DS_Store") && !s.ends_with('~')
}

async fn reload_socket(
    ws: WebSocketUpgrade,
    State(server): State<Arc<DevServer>>,
) -> impl IntoResponse {
    let reload_rx = server.reload_tx.subscribe();
    ws.on_upgrade(move |socket| push_reloads(socket, reload_rx))
}

/// Forward reload broadcasts to one connected client
async fn push_reloads(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
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

/// Serve a file from the generated site.
///
/// HTML responses get the reload script injected when watching; everything
/// else is delegated to [`ServeDir`].
async fn serve_site(State(server): State<Arc<DevServer>>, request: Request<Body>) -> Response {
    let resolved = resolve_request_path(&server.public_dir, request.uri().path());

    if server.live_reload && is_html_path(&resolved) {
        return match tokio::fs::read_to_string(&resolved).await {
            Ok(content) => Html(inject_reload_script(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        };
    }

    let mut service = ServeDir::new(&server.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Map a request path onto the generated tree.
///
/// Probe order: the file itself, then `<dir>/index.html` for directories,
/// then `<path>.html` for extensionless pretty URLs.
fn resolve_request_path(public_dir: &Path, uri_path: &str) -> PathBuf {
    let relative = uri_path.trim_start_matches('/');
    if relative.is_empty() {
        return public_dir.join("index.html");
    }

    let candidate = public_dir.join(relative);
    if candidate.is_dir() {
        return candidate.join("index.html");
    }
    if candidate.exists() {
        return candidate;
    }

    let with_html = public_dir.join(format!("{}.html", relative));
    if with_html.exists() {
        with_html
    } else {
        candidate
    }
}

fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Splice the reload script in before </body>, or append when absent
fn inject_reload_script(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, RELOAD_SCRIPT)
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
