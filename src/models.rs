use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    pub upload_date: NaiveDate,
}

impl Document {
    pub fn new(id: &str, name: &str, size: u64, upload_date: NaiveDate) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            size,
            upload_date,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Popup {
    None,
    Details,
    Help,
}

/// State of the single-document detail popup.
pub enum DetailView {
    Loading(String),
    Found(Document),
    NotFound(String),
}
