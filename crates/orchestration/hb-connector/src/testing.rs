//! In-memory fakes shared by the unit tests.

use async_trait::async_trait;
use hb_error::{DeliveryError, HbError, Result, StorageError};
use hb_traits::{Sink, StorageClient};
use hb_types::{ObjectPage, Page, RawObject};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One recorded `list_objects_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCall {
    pub container: String,
    pub token: Option<String>,
    pub page_size: Option<u32>,
}

/// Storage client that replays scripted listings.
///
/// Continuation tokens are page indices rendered as strings.
#[derive(Default)]
pub struct ScriptedStorage {
    discovery: Option<std::result::Result<Vec<Option<String>>, String>>,
    discovery_delay: Option<Duration>,
    pages: HashMap<String, Vec<std::result::Result<Vec<RawObject>, String>>>,
    discovery_calls: Mutex<usize>,
    page_calls: Mutex<Vec<PageCall>>,
}

impl ScriptedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_containers(mut self, containers: Vec<Option<&str>>) -> Self {
        self.discovery = Some(Ok(containers
            .into_iter()
            .map(|c| c.map(str::to_string))
            .collect()));
        self
    }

    pub fn with_discovery_failure(mut self, message: &str) -> Self {
        self.discovery = Some(Err(message.to_string()));
        self
    }

    /// Make discovery take `delay` before answering.
    pub fn with_discovery_delay(mut self, delay: Duration) -> Self {
        self.discovery_delay = Some(delay);
        self
    }

    /// Script a container listing as pages of keys.
    pub fn with_pages(mut self, container: &str, pages: Vec<Vec<&str>>) -> Self {
        let scripted = pages
            .into_iter()
            .map(|keys| Ok(keys.into_iter().map(RawObject::new).collect()))
            .collect();
        self.pages.insert(container.to_string(), scripted);
        self
    }

    /// Script a container listing with full records.
    pub fn with_objects(mut self, container: &str, pages: Vec<Vec<RawObject>>) -> Self {
        self.pages
            .insert(container.to_string(), pages.into_iter().map(Ok).collect());
        self
    }

    /// Make the page at `index` of a scripted container fail.
    pub fn with_page_failure(mut self, container: &str, index: usize, message: &str) -> Self {
        let pages = self.pages.entry(container.to_string()).or_default();
        while pages.len() <= index {
            pages.push(Ok(Vec::new()));
        }
        pages[index] = Err(message.to_string());
        self
    }

    pub fn discovery_calls(&self) -> usize {
        *self.discovery_calls.lock().unwrap()
    }

    pub fn page_calls(&self) -> Vec<PageCall> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn page_calls_for(&self, container: &str) -> Vec<PageCall> {
        self.page_calls()
            .into_iter()
            .filter(|c| c.container == container)
            .collect()
    }
}

#[async_trait]
impl StorageClient for ScriptedStorage {
    async fn list_containers(&self) -> Result<Vec<Option<String>>> {
        *self.discovery_calls.lock().unwrap() += 1;
        if let Some(delay) = self.discovery_delay {
            tokio::time::sleep(delay).await;
        }
        match &self.discovery {
            Some(Ok(containers)) => Ok(containers.clone()),
            Some(Err(message)) => Err(StorageError::Discovery(message.clone()).into()),
            None => Ok(Vec::new()),
        }
    }

    async fn list_objects_page(
        &self,
        container: &str,
        continuation_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<ObjectPage> {
        self.page_calls.lock().unwrap().push(PageCall {
            container: container.to_string(),
            token: continuation_token.map(str::to_string),
            page_size,
        });

        let list_error = |message: &str| -> HbError {
            StorageError::ListObjects {
                container: container.to_string(),
                message: message.to_string(),
            }
            .into()
        };

        let Some(pages) = self.pages.get(container) else {
            return Err(list_error("NoSuchBucket"));
        };

        let index = match continuation_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| list_error("invalid continuation token"))?,
        };

        match pages.get(index) {
            Some(Ok(objects)) => {
                let next_token = (index + 1 < pages.len()).then(|| (index + 1).to_string());
                Ok(ObjectPage {
                    objects: objects.clone(),
                    next_token,
                })
            }
            Some(Err(message)) => Err(list_error(message)),
            None => Ok(ObjectPage::default()),
        }
    }
}

/// Sink that records every delivered page.
#[derive(Default, Clone)]
pub struct CollectingSink {
    pages: Arc<Mutex<Vec<(String, Page)>>>,
    reject: bool,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record pages but report every delivery as rejected.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// Cancel `token` once `pages` pages have been delivered.
    pub fn cancelling_after(pages: usize, token: CancellationToken) -> Self {
        Self {
            cancel_after: Some((pages, token)),
            ..Self::default()
        }
    }

    pub fn pages(&self) -> Vec<(String, Page)> {
        self.pages.lock().unwrap().clone()
    }

    pub fn pages_for(&self, container: &str) -> Vec<Page> {
        self.pages()
            .into_iter()
            .filter(|(c, _)| c == container)
            .map(|(_, page)| page)
            .collect()
    }

    pub fn names_for(&self, container: &str) -> Vec<Vec<String>> {
        self.pages_for(container)
            .into_iter()
            .map(|page| page.into_iter().map(|d| d.resource_name).collect())
            .collect()
    }
}

#[async_trait]
impl Sink for CollectingSink {
    async fn deliver(&self, container: &str, page: Page) -> Result<()> {
        let delivered = {
            let mut pages = self.pages.lock().unwrap();
            pages.push((container.to_string(), page));
            pages.len()
        };

        if let Some((after, token)) = &self.cancel_after {
            if delivered >= *after {
                token.cancel();
            }
        }

        if self.reject {
            return Err(DeliveryError::Rejected("host refused page".to_string()).into());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "collecting"
    }
}
