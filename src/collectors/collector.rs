use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::Serialize;

use crate::cloud::ResourceSink;
use crate::error::InventoryResult;
use crate::logging::LogContext;
use crate::models::{resource_key, AccountInfo, ResourceRecord};

/// One response of a paginated listing call.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<D> {
    pub items: Vec<D>,
    /// Continuation token; `None` once the listing is exhausted
    pub next_token: Option<String>,
}

impl<D> Page<D> {
    /// Build a page, treating an empty continuation token as the end of the listing.
    pub fn new(items: Vec<D>, next_token: Option<String>) -> Self {
        Page {
            items,
            next_token: next_token.filter(|t| !t.is_empty()),
        }
    }
}

/// A region-scoped source of one resource kind.
///
/// Implementations list raw descriptors page by page and enrich a single
/// descriptor into the service-specific record body. The driving loop lives in
/// [`collect_region`].
#[async_trait]
pub trait ResourceCollector: Send + Sync {
    type Descriptor: Send + 'static;
    type Resource: Serialize + Send + 'static;

    fn resource_type(&self) -> &'static str;

    /// Top-level sink category; the resource type unless overridden.
    fn resource_path(&self) -> &'static str {
        self.resource_type()
    }

    async fn list_page(&self, next_token: Option<String>) -> InventoryResult<Page<Self::Descriptor>>;

    /// Name used to build the persistence key.
    fn resource_name(&self, descriptor: &Self::Descriptor) -> InventoryResult<String>;

    async fn enrich(&self, descriptor: Self::Descriptor) -> InventoryResult<Self::Resource>;
}

/// A record together with its persistence key.
#[derive(Debug, Clone, Serialize)]
pub struct KeyedRecord<R> {
    pub key: String,
    pub record: ResourceRecord<R>,
}

/// Stream every page of the listing, following continuation tokens until a
/// page arrives without one. The stream ends after the first error.
pub fn pages<C>(collector: &C) -> impl Stream<Item = InventoryResult<Page<C::Descriptor>>> + Send + '_
where
    C: ResourceCollector,
{
    // `Some(token)` means another call is due; `None` means the listing is done.
    stream::try_unfold(Some(None::<String>), move |state| async move {
        let token = match state {
            Some(token) => token,
            None => return Ok(None),
        };
        let page = collector.list_page(token).await?;
        let next_state = page.next_token.clone().map(Some);
        Ok(Some((page, next_state)))
    })
}

/// Accumulate all descriptors of the listing, each page exactly once.
pub async fn list_all<C>(collector: &C) -> InventoryResult<Vec<C::Descriptor>>
where
    C: ResourceCollector,
{
    pages(collector)
        .try_fold(Vec::new(), |mut all, page| async move {
            all.extend(page.items);
            Ok(all)
        })
        .await
}

/// Lazily enrich descriptors into keyed records, in listing order.
pub fn records<'a, C>(
    collector: &'a C,
    account: &'a AccountInfo,
    region: &'a str,
    descriptors: Vec<C::Descriptor>,
) -> impl Stream<Item = InventoryResult<KeyedRecord<C::Resource>>> + Send + 'a
where
    C: ResourceCollector,
{
    stream::iter(descriptors).then(move |descriptor| async move {
        let name = collector.resource_name(&descriptor)?;
        let key = resource_key(&account.account_id, region, &name);
        let resource = collector.enrich(descriptor).await?;
        let record = ResourceRecord::new(resource, collector.resource_type(), region, account);
        Ok(KeyedRecord { key, record })
    })
}

/// List, enrich and persist every resource of one kind in one region.
///
/// Returns the number of records written. The first failure aborts the
/// region; records written before it stay in the sink.
pub async fn collect_region<C>(
    collector: &C,
    account: &AccountInfo,
    region: &str,
    sink: &dyn ResourceSink,
    log: &LogContext,
) -> InventoryResult<usize>
where
    C: ResourceCollector,
{
    let descriptors = list_all(collector).await?;
    log.info(format!(
        "Found {} {} resources in {} for {}",
        descriptors.len(),
        collector.resource_type(),
        region,
        account
    ));
    if descriptors.is_empty() {
        return Ok(0);
    }

    let records = records(collector, account, region, descriptors);
    futures::pin_mut!(records);

    let mut written = 0;
    while let Some(keyed) = records.try_next().await? {
        let value = serde_json::to_value(&keyed.record)?;
        sink.save_resource(collector.resource_path(), &keyed.key, &value).await?;
        log.debug(format!("Saved {}/{}", collector.resource_path(), keyed.key));
        written += 1;
    }
    Ok(written)
}
