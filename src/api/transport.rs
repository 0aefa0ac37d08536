use super::error::map_api_err;
use super::signature::SignedHeaders;
use super::Error;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Moves signed requests to the API and brings back the raw JSON body.
///
/// Implementations only deal with the wire: envelope validation happens in
/// [`super::EssClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, headers: &SignedHeaders) -> Result<Value, Error>;

    async fn post(&self, path: &str, headers: &SignedHeaders, body: &Value)
        -> Result<Value, Error>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        /* `Accept-Encoding: gzip, deflate, br` is added by reqwest itself, which
         * only decompresses bodies when it negotiated the encoding */
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .map_err(|e| Error::InternalError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        path: &str,
        request: RequestBuilder,
        headers: &SignedHeaders,
    ) -> Result<Value, Error> {
        let request = headers
            .pairs()
            .iter()
            .fold(request, |request, (name, value)| request.header(*name, *value));

        let response_text = request
            .send()
            .await
            .map_err(map_api_err)?
            .error_for_status()
            .map_err(map_api_err)?
            .text()
            .await
            .map_err(|e| Error::TransportError(format!("Error reading API response: {}", e)))?;

        log::trace!("path: {}, response_text: {}", path, response_text);

        serde_json::from_str::<Value>(&response_text)
            .map_err(|e| Error::InvalidResponse(e.to_string(), response_text))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, headers: &SignedHeaders) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, path);
        self.send(path, self.client.get(url), headers).await
    }

    async fn post(
        &self,
        path: &str,
        headers: &SignedHeaders,
        body: &Value,
    ) -> Result<Value, Error> {
        let url = format!("{}{}", self.base_url, path);
        self.send(path, self.client.post(url).json(body), headers)
            .await
    }
}

/// In-memory transport that records every call and answers from a script.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub method: http::Method,
        pub path: String,
        pub headers: SignedHeaders,
        pub body: Option<Value>,
    }

    impl Call {
        pub fn endpoint(&self) -> &str {
            endpoint_of(&self.path)
        }
    }

    fn endpoint_of(path: &str) -> &str {
        path.split('?').next().unwrap_or(path)
    }

    #[derive(Default)]
    pub struct FakeTransport {
        routes: Mutex<HashMap<String, VecDeque<Result<Value, Error>>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a reply for `endpoint` (path without query). The last queued
        /// reply keeps being served once the others are used up.
        pub fn reply(self, endpoint: &str, response: Result<Value, Error>) -> Self {
            self.routes
                .lock()
                .unwrap()
                .entry(endpoint.to_string())
                .or_default()
                .push_back(response);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, call: Call) -> Result<Value, Error> {
            let endpoint = call.endpoint().to_string();
            self.calls.lock().unwrap().push(call);

            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&endpoint) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) if !queue.is_empty() => queue[0].clone(),
                _ => Err(Error::TransportError(format!("404 Not Found: {}", endpoint))),
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, path: &str, headers: &SignedHeaders) -> Result<Value, Error> {
            self.answer(Call {
                method: http::Method::GET,
                path: path.to_string(),
                headers: headers.clone(),
                body: None,
            })
        }

        async fn post(
            &self,
            path: &str,
            headers: &SignedHeaders,
            body: &Value,
        ) -> Result<Value, Error> {
            self.answer(Call {
                method: http::Method::POST,
                path: path.to_string(),
                headers: headers.clone(),
                body: Some(body.clone()),
            })
        }
    }
}
