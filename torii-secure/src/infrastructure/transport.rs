use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application_service::secure_channel::{RemoteAuthorityTransport, TransportError};

/// テストや PoC 用のインメモリトランスポート実装。
///
/// - path -> レスポンスボディの対応を保持し、フェッチ回数と POST 内容を記録する。
/// - `fail_with` でエラーを設定すると、以降の呼び出しはすべてそのエラーを返す。
#[derive(Clone, Default)]
pub struct InMemoryAuthorityTransport {
    inner: Arc<Mutex<TransportState>>,
}

#[derive(Default)]
struct TransportState {
    routes: HashMap<String, Vec<u8>>,
    forced_error: Option<TransportError>,
    fetch_counts: HashMap<String, usize>,
    posts: Vec<(String, Vec<u8>)>,
}

impl InMemoryAuthorityTransport {
    /// 指定パスへのフェッチに返すボディを登録する。
    pub fn insert_route(&self, path: &str, body: Vec<u8>) {
        if let Ok(mut state) = self.inner.lock() {
            state.routes.insert(path.to_string(), body);
        }
    }

    /// 以降のすべての呼び出しを失敗させる（None で解除）。
    pub fn fail_with(&self, error: Option<TransportError>) {
        if let Ok(mut state) = self.inner.lock() {
            state.forced_error = error;
        }
    }

    /// 指定パスへのフェッチが試行された回数を返す。
    pub fn fetch_count(&self, path: &str) -> usize {
        self.inner
            .lock()
            .map(|state| state.fetch_counts.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// 記録された POST の (path, body) 一覧を返す。
    pub fn posted(&self) -> Vec<(String, Vec<u8>)> {
        self.inner
            .lock()
            .map(|state| state.posts.clone())
            .unwrap_or_default()
    }
}

impl RemoteAuthorityTransport for InMemoryAuthorityTransport {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let mut state = self.inner.lock().map_err(|e| TransportError {
            status: 500,
            reason: format!("transport state poisoned: {e}"),
        })?;

        *state.fetch_counts.entry(path.to_string()).or_insert(0) += 1;

        if let Some(error) = &state.forced_error {
            return Err(error.clone());
        }
        state.routes.get(path).cloned().ok_or_else(|| TransportError {
            status: 404,
            reason: format!("no route for {path}"),
        })
    }

    fn post(&self, path: &str, body: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut state = self.inner.lock().map_err(|e| TransportError {
            status: 500,
            reason: format!("transport state poisoned: {e}"),
        })?;

        if let Some(error) = &state.forced_error {
            return Err(error.clone());
        }
        state.posts.push((path.to_string(), body.to_vec()));
        Ok(b"ok".to_vec())
    }
}
