use std::{
    collections::{BTreeMap, HashSet},
    ops::Bound,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    adapters,
    model::object::{ObjectError, ObjectPage, RemoteObject},
};

const STUCK_TOKEN: &str = "stuck";

#[derive(Default)]
struct MockState {
    objects: BTreeMap<String, Vec<u8>>,
    fail_get: HashSet<String>,
    fail_put: HashSet<String>,
    fail_list: bool,
    repeat_token: bool,
    calls: Vec<(&'static str, String)>,
}

/// In-memory store. Clones share state, so a test can keep a handle after
/// boxing one into a `SyncClient`.
#[derive(Clone)]
pub struct MockClient {
    page_size: usize,
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::with_page_size(1000)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("failed to acquire mock state guard")
    }

    pub fn insert(&self, key: &str, body: &[u8]) {
        self.state().objects.insert(key.to_string(), body.to_vec());
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.state().objects.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.state().objects.keys().cloned().collect()
    }

    pub fn fail_get(&self, key: &str) {
        self.state().fail_get.insert(key.to_string());
    }

    pub fn fail_put(&self, key: &str) {
        self.state().fail_put.insert(key.to_string());
    }

    pub fn fail_list(&self) {
        self.state().fail_list = true;
    }

    pub fn repeat_continuation_token(&self) {
        self.state().repeat_token = true;
    }

    pub fn calls_of(&self, op: &str) -> usize {
        self.state().calls.iter().filter(|(o, _)| *o == op).count()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl adapters::ObjectAdapter for MockClient {
    fn fs_list_objects_page(
        &self,
        _bucket: &str,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ObjectPage, ObjectError> {
        let mut state = self.state();
        state.calls.push(("list", prefix.to_string()));

        if state.fail_list {
            return Err(ObjectError::with_status(
                format!("failed to list_objects at: {}", prefix),
                503,
            ));
        }

        let start = match continuation_token {
            Some(tok) if !state.repeat_token => Bound::Excluded(tok),
            _ => Bound::Unbounded,
        };

        let mut matching = state
            .objects
            .range::<String, _>((start, Bound::Unbounded))
            .filter(|(key, _)| key.starts_with(prefix));

        let objects: Vec<RemoteObject> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, body)| RemoteObject {
                key: key.clone(),
                size: Some(body.len() as u64),
            })
            .collect();
        let more = matching.next().is_some();

        let next_continuation_token = if state.repeat_token {
            Some(STUCK_TOKEN.to_string())
        } else if more {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };

        Ok(ObjectPage {
            objects,
            next_continuation_token,
        })
    }

    fn fs_download_object(&self, _bucket: &str, key: &str) -> Result<Vec<u8>, ObjectError> {
        let mut state = self.state();
        state.calls.push(("get", key.to_string()));

        if state.fail_get.contains(key) {
            return Err(ObjectError::with_status(
                format!("failed to get_object: {}", key),
                500,
            ));
        }

        state
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| ObjectError::with_status(format!("no such key: {}", key), 404))
    }

    fn fs_put_object(&self, _bucket: &str, key: &str, body: Vec<u8>) -> Result<(), ObjectError> {
        let mut state = self.state();
        state.calls.push(("put", key.to_string()));

        if state.fail_put.contains(key) {
            return Err(ObjectError::with_status(
                format!("failed to put_object at: {}", key),
                500,
            ));
        }

        state.objects.insert(key.to_string(), body);
        Ok(())
    }
}
