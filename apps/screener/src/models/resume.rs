use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text::{clean_text, word_count};

/// A resume as seen by the scorers: raw text plus its cleaned form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub raw_text: String,
    pub cleaned_text: String,
}

impl Resume {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let cleaned_text = clean_text(&raw_text);
        Self {
            id: Uuid::new_v4(),
            raw_text,
            cleaned_text,
        }
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.raw_text)
    }

    pub fn is_blank(&self) -> bool {
        self.cleaned_text.is_empty()
    }
}
