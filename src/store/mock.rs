use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use crate::core::path;
use crate::models::{FileContent, FileEntry};

use super::local::content_sha;
use super::{RemoteStore, StoreError};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Call {
    List,
    Read(String),
    Write(String),
    Delete(String),
}

#[derive(Clone, Debug)]
enum Failure {
    NotFound,
    Conflict,
    Transient(String),
}

/// In-memory store recording every call, with failures injectable per call.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    files: BTreeMap<String, Vec<u8>>,
    failures: HashMap<Call, Failure>,
    calls: Vec<Call>,
}

impl MockStore {
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().expect("mock store lock");
            for (path, content) in files {
                inner
                    .files
                    .insert(path.to_owned(), content.as_bytes().to_vec());
            }
        }
        store
    }

    pub fn fail_transient(&self, call: Call, message: impl Into<String>) {
        self.fail(call, Failure::Transient(message.into()));
    }

    pub fn fail_conflict(&self, call: Call) {
        self.fail(call, Failure::Conflict);
    }

    pub fn fail_not_found(&self, call: Call) {
        self.fail(call, Failure::NotFound);
    }

    fn fail(&self, call: Call, failure: Failure) {
        let mut inner = self.inner.lock().expect("mock store lock");
        inner.failures.insert(call, failure);
    }

    pub fn calls(&self) -> Vec<Call> {
        let inner = self.inner.lock().expect("mock store lock");
        inner.calls.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        let inner = self.inner.lock().expect("mock store lock");
        inner.files.keys().cloned().collect()
    }

    pub fn content(&self, path: &str) -> Option<String> {
        let inner = self.inner.lock().expect("mock store lock");
        inner
            .files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn sha_of(&self, path: &str) -> Option<String> {
        let inner = self.inner.lock().expect("mock store lock");
        inner.files.get(path).map(|bytes| content_sha(bytes))
    }

    /// Entries as a listing would report them, including directories.
    pub fn snapshot(&self) -> Vec<FileEntry> {
        let inner = self.inner.lock().expect("mock store lock");
        listing(&inner.files)
    }
}

fn listing(files: &BTreeMap<String, Vec<u8>>) -> Vec<FileEntry> {
    let mut dirs = BTreeSet::new();
    let mut entries = Vec::new();
    for (file, content) in files {
        dirs.extend(path::ancestors(file).map(str::to_owned));
        entries.push(FileEntry::file(file.clone(), content_sha(content)));
    }
    entries.extend(dirs.into_iter().map(FileEntry::directory));
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries
}

impl Inner {
    fn record(&mut self, call: Call) -> Result<(), StoreError> {
        self.calls.push(call.clone());
        let subject = match &call {
            Call::List => String::new(),
            Call::Read(p) | Call::Write(p) | Call::Delete(p) => p.clone(),
        };
        match self.failures.get(&call) {
            None => Ok(()),
            Some(Failure::NotFound) => Err(StoreError::NotFound(subject)),
            Some(Failure::Conflict) => Err(StoreError::Conflict(subject)),
            Some(Failure::Transient(message)) => Err(StoreError::Transient(message.clone())),
        }
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn list_entries(&self) -> Result<Vec<FileEntry>, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock");
        inner.record(Call::List)?;
        Ok(listing(&inner.files))
    }

    async fn read_file(&self, path: &str) -> Result<FileContent, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock");
        inner.record(Call::Read(path.to_owned()))?;
        match inner.files.get(path) {
            Some(content) => Ok(FileContent {
                content: content.clone(),
                sha: content_sha(content),
            }),
            None => Err(StoreError::NotFound(path.to_owned())),
        }
    }

    async fn write_file(
        &self,
        path: &str,
        content: Vec<u8>,
        prior_sha: Option<&str>,
    ) -> Result<String, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock");
        inner.record(Call::Write(path.to_owned()))?;
        let current = inner.files.get(path).map(|bytes| content_sha(bytes));
        match (current.as_deref(), prior_sha) {
            (None, None) => {}
            (Some(current), Some(expected)) if current == expected => {}
            (None, Some(_)) => return Err(StoreError::NotFound(path.to_owned())),
            (Some(_), _) => return Err(StoreError::Conflict(path.to_owned())),
        }
        let sha = content_sha(&content);
        inner.files.insert(path.to_owned(), content);
        Ok(sha)
    }

    async fn delete_file(&self, path: &str, sha: Option<&str>) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock");
        inner.record(Call::Delete(path.to_owned()))?;
        let Some(current) = inner.files.get(path).map(|bytes| content_sha(bytes)) else {
            return Err(StoreError::NotFound(path.to_owned()));
        };
        if sha.is_some_and(|expected| expected != current) {
            return Err(StoreError::Conflict(path.to_owned()));
        }
        inner.files.remove(path);
        Ok(())
    }
}
