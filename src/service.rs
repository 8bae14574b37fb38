use std::{fs, path::Path, time::Duration};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;
use crate::error::Result;
use crate::models::Document;

/// Asynchronous supplier of document records.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetches the full document list, in display order.
    async fn fetch_all(&self) -> Result<Vec<Document>>;

    /// Looks up one document. Unknown ids yield `Ok(None)`.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Document>>;
}

/// In-memory source that simulates network latency.
pub struct MockDocumentService {
    documents: Vec<Document>,
    list_delay: Duration,
    lookup_delay: Duration,
}

impl MockDocumentService {
    pub fn new(documents: Vec<Document>, list_delay: Duration, lookup_delay: Duration) -> Self {
        Self { documents, list_delay, lookup_delay }
    }

    /// The five demo documents.
    pub fn with_demo_data(list_delay: Duration, lookup_delay: Duration) -> Self {
        Self::new(demo_documents(), list_delay, lookup_delay)
    }

    /// Reads documents from a JSON array of records.
    pub fn from_fixture(path: &Path, list_delay: Duration, lookup_delay: Duration) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let documents: Vec<Document> = serde_json::from_str(&content)?;
        debug!(path = %path.display(), count = documents.len(), "loaded document fixture");
        Ok(Self::new(documents, list_delay, lookup_delay))
    }
}

#[async_trait]
impl DocumentSource for MockDocumentService {
    async fn fetch_all(&self) -> Result<Vec<Document>> {
        tokio::time::sleep(self.list_delay).await;
        Ok(self.documents.clone())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Document>> {
        tokio::time::sleep(self.lookup_delay).await;
        Ok(self.documents.iter().find(|d| d.id == id).cloned())
    }
}

pub fn demo_documents() -> Vec<Document> {
    let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap_or_default();
    vec![
        Document::new("1", "Financial Report.pdf", 120_000, date(4, 1)),
        Document::new("2", "Sales Presentation.pptx", 980_000, date(4, 5)),
        Document::new("3", "Signed_Contract.docx", 45_000, date(4, 10)),
        Document::new("4", "User_Manual.pdf", 250_000, date(4, 12)),
        Document::new("5", "Cover_Image.png", 75_000, date(4, 15)),
    ]
}
