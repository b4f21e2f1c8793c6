//! Shared test doubles for the listing API and the state reader

#![allow(dead_code)]

use async_trait::async_trait;
use gcpinv::alerter::Alerter;
use gcpinv::error::{Error, Result};
use gcpinv::parallel::RunnerPool;
use gcpinv::remote::{ListApi, ListRequest, Page, ReadResourceArgs, StateReader, SupplierContext};
use gcpinv::resource::NormalizedValue;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PROJECT: &str = "test-project";

enum Listing {
    Pages(Vec<Vec<Value>>),
    Fail(u16),
}

/// Listing API answering from canned pages, keyed by request path
///
/// Unknown paths answer 404, unless a fallback status is set.
#[derive(Default)]
pub struct MockListApi {
    listings: HashMap<String, Listing>,
    fallback: Option<u16>,
    pub calls: AtomicUsize,
    requests: Mutex<Vec<(String, Option<String>)>>,
}

impl MockListApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(mut self, path: &str, pages: Vec<Vec<Value>>) -> Self {
        self.listings.insert(path.to_string(), Listing::Pages(pages));
        self
    }

    pub fn with_items(self, path: &str, items: Vec<Value>) -> Self {
        self.with_pages(path, vec![items])
    }

    pub fn failing(mut self, path: &str, status: u16) -> Self {
        self.listings.insert(path.to_string(), Listing::Fail(status));
        self
    }

    /// Every path not configured fails with `status`
    pub fn failing_everything(mut self, status: u16) -> Self {
        self.fallback = Some(status);
        self
    }

    /// Path and cursor of every call, in call order
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListApi for MockListApi {
    async fn list_page(&self, request: &ListRequest, cursor: Option<&str>) -> Result<Page<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((request.path.clone(), cursor.map(|c| c.to_string())));

        let url = format!("mock://{}", request.path);
        let pages = match self.listings.get(&request.path) {
            Some(Listing::Pages(pages)) => pages,
            Some(Listing::Fail(status)) => return Err(Error::api(*status, url, "mock failure")),
            None => {
                return Err(Error::api(self.fallback.unwrap_or(404), url, "not configured"))
            },
        };

        let index = match cursor {
            None => 0,
            Some(c) => c.trim_start_matches("page-").parse::<usize>().unwrap(),
        };
        let items = pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));

        Ok(Page::from_token(items, next))
    }
}

type Respond = Box<dyn Fn(&ReadResourceArgs) -> Result<NormalizedValue> + Send + Sync>;

/// State reader answering through a closure, with call and concurrency counters
pub struct MockStateReader {
    respond: Respond,
    delay: Duration,
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    reads: Mutex<Vec<ReadResourceArgs>>,
}

impl MockStateReader {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&ReadResourceArgs) -> Result<NormalizedValue> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Echo the identifier and attributes back as the resource state
    pub fn echo() -> Self {
        Self::new(|args| Ok(echo_value(args)))
    }

    /// Fail every read with an API status
    pub fn failing(status: u16) -> Self {
        Self::new(move |args| {
            Err(Error::api(
                status,
                format!("mock://{}/{}", args.resource_type, args.id),
                "mock read failure",
            ))
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Arguments of every read, in call order
    pub fn reads(&self) -> Vec<ReadResourceArgs> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateReader for MockStateReader {
    async fn read_resource(&self, args: &ReadResourceArgs) -> Result<NormalizedValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reads.lock().unwrap().push(args.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        (self.respond)(args)
    }
}

/// `{id, name, email, ...attributes}`
pub fn echo_value(args: &ReadResourceArgs) -> NormalizedValue {
    let mut value = json!({
        "id": args.id,
        "name": args.id,
        "email": args.id,
    });
    for (key, attribute) in &args.attributes {
        value[key.as_str()] = Value::String(attribute.clone());
    }
    NormalizedValue::from(value)
}

pub struct Harness {
    pub ctx: SupplierContext,
    pub api: Arc<MockListApi>,
    pub reader: Arc<MockStateReader>,
}

impl Harness {
    pub fn new(api: MockListApi, reader: MockStateReader) -> Self {
        Self::with_parallelism(api, reader, 10)
    }

    pub fn with_parallelism(api: MockListApi, reader: MockStateReader, parallelism: usize) -> Self {
        let api = Arc::new(api);
        let reader = Arc::new(reader);
        let ctx = SupplierContext {
            project: PROJECT.to_string(),
            api: api.clone(),
            reader: reader.clone(),
            pool: RunnerPool::new(parallelism),
            alerter: Arc::new(Alerter::new()),
        };
        Self { ctx, api, reader }
    }
}

/// Listing items named after `names`
pub fn named(names: &[&str]) -> Vec<Value> {
    names.iter().map(|n| json!({ "name": n })).collect()
}
