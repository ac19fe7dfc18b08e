//! Shared request plumbing for the services.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::{self, AuthManager};
use crate::error::{ConfigurationError, ErrorClassifier, GenJobError, GenJobResult};
use crate::resilience::CallGuard;
use crate::transport::{HttpRequest, HttpTransport, ResponseParser};

/// Everything a service needs to issue one guarded call.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthManager>,
    guard: CallGuard,
    classifier: ErrorClassifier,
}

impl ServiceContext {
    pub(crate) fn new(
        base_url: Url,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthManager>,
        guard: CallGuard,
        classifier: ErrorClassifier,
    ) -> Self {
        Self {
            base_url,
            transport,
            auth,
            guard,
            classifier,
        }
    }

    pub(crate) fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Appends `path` (which may carry a query) to the base URL, keeping any base path prefix.
    pub(crate) fn url(&self, path: &str) -> GenJobResult<Url> {
        let raw = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|_| ConfigurationError::InvalidBaseUrl { url: raw }.into())
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<T> {
        let url = self.url(path)?;
        self.send(HttpRequest::get(url.as_str()), cancel).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<T> {
        let url = self.url(path)?;
        self.send(HttpRequest::post_json(url.as_str(), body), cancel).await
    }

    // Rate limiter, then deadline, then classification of non-2xx bodies.
    async fn send<T: DeserializeOwned>(
        &self,
        mut request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> GenJobResult<T> {
        let mut url = Url::parse(&request.url)?;
        let mut headers: HashMap<String, String> = std::mem::take(&mut request.headers);
        auth::apply(self.auth.as_ref(), &mut url, &mut headers);
        request.url = url.into();
        request.headers = headers;

        let transport = Arc::clone(&self.transport);
        let response = self
            .guard
            .execute(cancel, move || async move {
                transport.send(request).await.map_err(GenJobError::from)
            })
            .await?;

        ResponseParser::parse_response(response, &self.classifier)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("base_url", &self.base_url.as_str())
            .field("provider", &self.classifier.provider())
            .finish_non_exhaustive()
    }
}
