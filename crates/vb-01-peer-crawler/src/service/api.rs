//! NetworkCrawlerApi implementation.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::core::NetworkCrawler;
use crate::domain::{CrawlError, CrawlReport};
use crate::ports::{NetworkCrawlerApi, NodeProbe, ScanRequest};

#[async_trait]
impl<P: NodeProbe + ?Sized + 'static> NetworkCrawlerApi for NetworkCrawler<P> {
    async fn crawl(
        &self,
        request: ScanRequest,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        self.scan_with_cancel(request, cancel).await
    }
}
