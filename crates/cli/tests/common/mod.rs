//! In-memory storage service for session tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use s3cm_core::{Error, ListResult, ObjectInfo, Result, StorageClient};
use s3cm::output::{Formatter, OutputConfig};

/// Objects returned per listing page, small to exercise pagination
const PAGE_SIZE: usize = 2;

#[derive(Default)]
struct State {
    owned: HashMap<String, BTreeMap<String, Vec<u8>>>,
    foreign: HashSet<String>,
    lose_race: HashSet<String>,
    create_calls: usize,
    object_calls: usize,
}

/// Storage service fake: buckets owned by the caller, buckets owned by others,
/// and names that another account claims just before our create call.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owned_bucket(self, bucket: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .owned
            .insert(bucket.to_string(), BTreeMap::new());
        self
    }

    pub fn with_foreign_bucket(self, bucket: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .foreign
            .insert(bucket.to_string());
        self
    }

    /// The name looks free, but another account claims it before creation
    pub fn losing_race_for(self, bucket: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .lose_race
            .insert(bucket.to_string());
        self
    }

    pub fn with_object(self, bucket: &str, key: &str, content: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .owned
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), content.as_bytes().to_vec());
        self
    }

    pub fn owns(&self, bucket: &str) -> bool {
        self.state.lock().unwrap().owned.contains_key(bucket)
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .owned
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|data| String::from_utf8_lossy(data).into_owned())
    }

    pub fn object_count(&self, bucket: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .owned
            .get(bucket)
            .map_or(0, BTreeMap::len)
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    /// Number of object-level calls (list, get, put, edit, delete, exists)
    pub fn object_calls(&self) -> usize {
        self.state.lock().unwrap().object_calls
    }

    fn with_objects<T>(
        &self,
        bucket: &str,
        f: impl FnOnce(&mut BTreeMap<String, Vec<u8>>) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.lock().unwrap();
        state.object_calls += 1;
        let objects = state
            .owned
            .get_mut(bucket)
            .ok_or_else(|| Error::NotFound(format!("bucket {bucket}")))?;
        f(objects)
    }
}

#[async_trait]
impl StorageClient for MemoryStore {
    async fn account_owner(&self) -> Result<Option<String>> {
        Ok(Some("tester".to_string()))
    }

    async fn owns_bucket(&self, bucket: &str) -> Result<bool> {
        Ok(self.owns(bucket))
    }

    async fn owned_by_other(&self, bucket: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().foreign.contains(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if state.lose_race.contains(bucket) || state.foreign.contains(bucket) {
            state.foreign.insert(bucket.to_string());
            return Err(Error::Conflict(format!(
                "bucket name '{bucket}' was claimed by another account"
            )));
        }
        state.owned.entry(bucket.to_string()).or_default();
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        continuation_token: Option<String>,
    ) -> Result<ListResult> {
        self.with_objects(bucket, |objects| {
            let start: usize = continuation_token
                .as_deref()
                .map_or(0, |t| t.parse().unwrap());
            let items: Vec<ObjectInfo> = objects
                .iter()
                .skip(start)
                .take(PAGE_SIZE)
                .map(|(key, data)| ObjectInfo::new(key, data.len() as i64))
                .collect();
            let next = start + items.len();
            Ok(ListResult {
                items,
                continuation_token: (next < objects.len()).then(|| next.to_string()),
            })
        })
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool> {
        self.with_objects(bucket, |objects| Ok(objects.contains_key(key)))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.with_objects(bucket, |objects| {
            objects
                .get(key)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        self.with_objects(bucket, |objects| {
            let mut info = ObjectInfo::new(key, data.len() as i64);
            info.content_type = content_type;
            objects.insert(key.to_string(), data);
            Ok(info)
        })
    }

    async fn edit_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        self.with_objects(bucket, |objects| {
            let slot = objects
                .get_mut(key)
                .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))?;
            let mut info = ObjectInfo::new(key, data.len() as i64);
            info.content_type = content_type;
            *slot = data;
            Ok(info)
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.with_objects(bucket, |objects| {
            objects
                .remove(key)
                .map(|_| ())
                .ok_or_else(|| Error::NotFound(format!("{bucket}/{key}")))
        })
    }
}

/// Formatter without colors or spinners
pub fn quiet_formatter() -> Formatter {
    Formatter::new(OutputConfig {
        no_color: true,
        no_progress: true,
    })
}
