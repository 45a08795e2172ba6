//! Shared helpers for tests that need a live HTTP peer.

use std::sync::Arc;

use crate::portal::api::ApiClient;
use crate::portal::storage::{MemoryTokenStore, TokenStore};

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub(crate) async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Portal client over a memory store, optionally pre-seeded with a token.
pub(crate) fn portal_client(origin: &str, token: Option<&str>) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(token.map_or_else(MemoryTokenStore::default, MemoryTokenStore::with_token));
    let dyn_store: Arc<dyn TokenStore> = store.clone();
    (ApiClient::new(reqwest::Client::new(), origin, dyn_store), store)
}
