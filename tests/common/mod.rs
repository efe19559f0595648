#![allow(dead_code)]

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use link_status::application::services::LinkSetService;
use link_status::domain::lifecycle::Lifecycle;
use link_status::infrastructure::persistence::{SnapshotFile, SnapshotStore};
use link_status::infrastructure::probe::{HttpProber, ProberSettings};
use link_status::routes;
use link_status::state::AppState;

pub const SNAPSHOT_NAME: &str = "link_sets.json";

/// Fully wired application backed by a temporary snapshot directory.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<SnapshotStore>,
    pub lifecycle: Arc<Lifecycle>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn snapshot_path(&self) -> std::path::PathBuf {
        self.dir.path().join(SNAPSHOT_NAME)
    }

    pub fn router(&self) -> Router {
        routes::router(self.state.clone())
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(Duration::from_secs(5), 1000).await
}

pub async fn create_test_app_with(check_deadline: Duration, max_links: usize) -> TestApp {
    let dir = TempDir::new().unwrap();
    let (store, worker) = SnapshotStore::open(SnapshotFile::new(dir.path().join(SNAPSHOT_NAME)), 1).await;
    tokio::spawn(worker.run());
    let store = Arc::new(store);

    let prober = HttpProber::new(&ProberSettings {
        timeout: Duration::from_secs(5),
        ..ProberSettings::default()
    })
    .unwrap();

    let service = Arc::new(LinkSetService::new(
        Arc::new(prober),
        store.clone(),
        check_deadline,
    ));
    let lifecycle = Arc::new(Lifecycle::new());
    let state = AppState::new(service, lifecycle.clone(), max_links);

    TestApp {
        state,
        store,
        lifecycle,
        dir,
    }
}

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A link target that answers `200 OK` only after `delay`.
pub async fn spawn_slow_target(delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                    .await;
            });
        }
    });

    addr
}

/// Polls `condition` every 10ms for up to two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let started = std::time::Instant::now();
    while !condition() {
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
