use super::CompositionService;
use crate::models::CompositionRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockCompositionClient {
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    error_responses: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    last_request: Arc<Mutex<Option<CompositionRequest>>>,
}

impl MockCompositionClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            error_responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    /// Queue an error; queued errors are consumed before image responses.
    pub fn with_error_response(self, message: String) -> Self {
        self.error_responses.lock().unwrap().push(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<CompositionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockCompositionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompositionService for MockCompositionClient {
    async fn compose(&self, request: &CompositionRequest) -> Result<Vec<u8>> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        *self.last_request.lock().unwrap() = Some(request.clone());

        let mut errors = self.error_responses.lock().unwrap();
        if !errors.is_empty() {
            return Err(Error::AiProvider(errors.remove(0)));
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            // Return a tiny valid PNG as default
            Ok(vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
                0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
                0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
                0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
                0x44, 0x41, // IDAT chunk
                0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2,
                0x25, 0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
                0x44, 0xAE, 0x42, 0x60, 0x82,
            ])
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InlineImage;

    fn make_request(instruction: &str) -> CompositionRequest {
        CompositionRequest {
            first: InlineImage {
                data: "YQ==".to_string(),
                media_type: "image/png".to_string(),
            },
            second: InlineImage {
                data: "Yg==".to_string(),
                media_type: "image/jpeg".to_string(),
            },
            instruction: instruction.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_default_returns_png_bytes() {
        let client = MockCompositionClient::new();

        let bytes = client.compose(&make_request("blend")).await.unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(client.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_cycles_custom_responses() {
        let client = MockCompositionClient::new()
            .with_image_response(vec![1])
            .with_image_response(vec![2]);

        assert_eq!(client.compose(&make_request("a")).await.unwrap(), vec![1]);
        assert_eq!(client.compose(&make_request("b")).await.unwrap(), vec![2]);
        // Should cycle back
        assert_eq!(client.compose(&make_request("c")).await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_mock_errors_take_precedence() {
        let client = MockCompositionClient::new()
            .with_error_response("service unavailable".to_string())
            .with_image_response(vec![7]);

        let err = client.compose(&make_request("a")).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));

        // Error queue drained, image response now served.
        assert_eq!(client.compose(&make_request("b")).await.unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_mock_records_last_request() {
        let client = MockCompositionClient::new();
        client.compose(&make_request("hug them")).await.unwrap();

        let recorded = client.last_request().unwrap();
        assert_eq!(recorded.instruction, "hug them");
        assert_eq!(recorded.first.media_type, "image/png");
    }
}
