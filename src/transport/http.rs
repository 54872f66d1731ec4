//! reqwest-backed client for the churn service's HTTP endpoints.

use super::PredictClient;
use crate::config::BackendConfig;
use crate::error::{RequestError, UiError, UiResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Search and pagination parameters of the console's index view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuery {
    pub search: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl Default for IndexQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 0,
            size: 10,
        }
    }
}

pub struct HttpBackend {
    client: Client,
    base: Url,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> UiResult<Self> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| UiError::Config(format!("Invalid base URL: {}", e)))?;
        // Endpoint paths resolve under the base path, not the host root.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(concat!("churn-ui/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| UiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            config: config.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Applies the status policy, then hands the response back.
    fn accept(&self, response: Response) -> Result<Response, RequestError> {
        let status = response.status();
        if self.config.fail_on_http_status && !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// Service liveness text.
    pub async fn status(&self) -> Result<String, RequestError> {
        let url = self.endpoint(&self.config.status_path)?;
        let response = self.accept(self.client.get(url).send().await?)?;
        Ok(response.text().await?)
    }

    /// Fetches the rendered console page.
    #[instrument(skip(self))]
    pub async fn index_page(&self, query: &IndexQuery) -> Result<String, RequestError> {
        let mut url = self.endpoint(&self.config.index_path)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("search", search);
            }
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("size", &query.size.to_string());
        }

        let response = self.accept(self.client.get(url).send().await?)?;
        let html = response.text().await?;
        debug!(bytes = html.len(), "Index page fetched");
        Ok(html)
    }

    /// Downloads the CSV prediction report into `dest`, returning its size.
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    pub async fn download_report(&self, dest: &Path) -> UiResult<u64> {
        let url = self.endpoint(&self.config.report_path)?;
        let response = self
            .accept(self.client.get(url).send().await.map_err(RequestError::from)?)?;
        let body = response.bytes().await.map_err(RequestError::from)?;

        tokio::fs::write(dest, &body).await?;
        info!(bytes = body.len(), "Report saved");
        Ok(body.len() as u64)
    }
}

#[async_trait]
impl PredictClient for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn predict(&self, customer_id: &str) -> Result<String, RequestError> {
        let mut url = self.endpoint(&self.config.predict_path)?;
        url.query_pairs_mut()
            .append_pair(&self.config.customer_param, customer_id);

        let response = self.accept(self.client.post(url).send().await?)?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use tokio_test::{assert_err, assert_ok};

    fn backend_for(base_url: String) -> HttpBackend {
        HttpBackend::new(&BackendConfig {
            base_url,
            ..BackendConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn predict_posts_customer_id_as_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_query(Matcher::UrlEncoded("customerID".into(), "7590-VHVEG".into()))
            .with_status(200)
            .with_body("Churn: Yes (0.8123)")
            .expect(1)
            .create_async()
            .await;

        let backend = backend_for(server.url());
        let body = assert_ok!(backend.predict("7590-VHVEG").await);
        assert_eq!(body, "Churn: Yes (0.8123)");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn predict_returns_body_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .match_query(Matcher::Any)
            .with_body("  Customer not found.\n")
            .create_async()
            .await;

        let backend = backend_for(server.url());
        assert_eq!(backend.predict("0000-NOPE").await.unwrap(), "  Customer not found.\n");
    }

    #[tokio::test]
    async fn http_error_is_a_failed_request_by_default() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Prediction failed: boom")
            .create_async()
            .await;

        let backend = backend_for(server.url());
        let err = assert_err!(backend.predict("7590-VHVEG").await);
        assert!(matches!(err, RequestError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn http_error_body_shown_when_policy_disabled() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Prediction failed: boom")
            .create_async()
            .await;

        let backend = HttpBackend::new(&BackendConfig {
            base_url: server.url(),
            fail_on_http_status: false,
            ..BackendConfig::default()
        })
        .unwrap();
        assert_eq!(backend.predict("x").await.unwrap(), "Prediction failed: boom");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let backend = backend_for(format!("http://127.0.0.1:{}", port));
        let err = assert_err!(backend.predict("7590-VHVEG").await);
        assert!(matches!(err, RequestError::Transport(_)));
    }

    #[tokio::test]
    async fn index_page_forwards_search_and_paging() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/index")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "7590".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("size".into(), "50".into()),
            ]))
            .with_body("<html></html>")
            .create_async()
            .await;

        let backend = backend_for(server.url());
        let query = IndexQuery {
            search: Some("7590".to_string()),
            page: 2,
            size: 50,
        };
        assert_eq!(backend.index_page(&query).await.unwrap(), "<html></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn status_reads_service_banner() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_body("Churn Prediction Service is running!")
            .create_async()
            .await;

        let backend = backend_for(server.url());
        assert_eq!(
            backend.status().await.unwrap(),
            "Churn Prediction Service is running!"
        );
    }

    #[tokio::test]
    async fn report_is_written_to_disk() {
        let csv = "CustomerID,Prediction,Probability\n7590-VHVEG,Yes,0.8123\n";
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download-report")
            .with_header("content-type", "text/csv")
            .with_body(csv)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("predict_report.csv");
        let backend = backend_for(server.url());

        let written = backend.download_report(&dest).await.unwrap();
        assert_eq!(written, csv.len() as u64);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), csv);
    }

    #[tokio::test]
    async fn endpoints_keep_base_path() {
        let mut server = mockito::Server::new_async().await;
        let _root = server
            .mock("POST", "/predict")
            .match_query(Matcher::Any)
            .with_body("served from the host root")
            .create_async()
            .await;
        let predict = server
            .mock("POST", "/churn/predict")
            .match_query(Matcher::UrlEncoded("customerID".into(), "7590-VHVEG".into()))
            .with_body("Churn: No (0.2000)")
            .expect(1)
            .create_async()
            .await;
        let status = server
            .mock("GET", "/churn/")
            .with_body("Churn Prediction Service is running!")
            .expect(2)
            .create_async()
            .await;

        for base_url in [format!("{}/churn/", server.url()), format!("{}/churn", server.url())] {
            let backend = backend_for(base_url);
            assert_eq!(
                backend.endpoint("/download-report").unwrap().path(),
                "/churn/download-report"
            );
            assert_eq!(backend.status().await.unwrap(), "Churn Prediction Service is running!");
        }

        let backend = backend_for(format!("{}/churn/", server.url()));
        assert_eq!(backend.predict("7590-VHVEG").await.unwrap(), "Churn: No (0.2000)");
        predict.assert_async().await;
        status.assert_async().await;
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpBackend::new(&BackendConfig {
            base_url: "::not-a-url".to_string(),
            ..BackendConfig::default()
        });
        assert!(matches!(result, Err(UiError::Config(_))));
    }
}
