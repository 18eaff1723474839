use super::ShareService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedShare {
    pub file_name: String,
    pub media_type: String,
    pub title: String,
    pub text: String,
    pub byte_len: usize,
}

#[derive(Clone)]
pub struct MockShareClient {
    supported: Arc<Mutex<bool>>,
    failure: Arc<Mutex<Option<String>>>,
    shares: Arc<Mutex<Vec<RecordedShare>>>,
}

impl MockShareClient {
    pub fn new() -> Self {
        Self {
            supported: Arc::new(Mutex::new(true)),
            failure: Arc::new(Mutex::new(None)),
            shares: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Simulate a platform that cannot share this content type.
    pub fn without_support(self) -> Self {
        *self.supported.lock().unwrap() = false;
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        *self.failure.lock().unwrap() = Some(message);
        self
    }

    pub fn recorded_shares(&self) -> Vec<RecordedShare> {
        self.shares.lock().unwrap().clone()
    }
}

impl Default for MockShareClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareService for MockShareClient {
    fn can_share(&self, _media_type: &str) -> bool {
        *self.supported.lock().unwrap()
    }

    async fn share(
        &self,
        file_name: &str,
        data: &[u8],
        media_type: &str,
        title: &str,
        text: &str,
    ) -> Result<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Generic(message));
        }

        self.shares.lock().unwrap().push(RecordedShare {
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
            title: title.to_string(),
            text: text.to_string(),
            byte_len: data.len(),
        });
        Ok(())
    }
}
