use color_eyre::eyre::{Result, eyre};
use reqwest::Client;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

const GENERATE_REPORT_PATH: &str = "/generate_report";

/// Body of `POST /generate_report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    pub company_domains: Vec<String>,
    pub company_name: String,
    pub industry: String,
    #[serde(serialize_with = "empty_if_none")]
    pub gemini_api_key: Option<String>,
    #[serde(serialize_with = "empty_if_none")]
    pub openai_api_key: Option<String>,
}

fn empty_if_none<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    #[serde(default)]
    report: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportClient {
    http: Client,
    endpoint: String,
}

impl ReportClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), GENERATE_REPORT_PATH);
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one report request and returns the report text.
    ///
    /// The error's `Display` is the message meant for the user: the server's
    /// `error` field when the failure response carries one, otherwise a
    /// generic transport or status description.
    pub async fn generate_report(&self, payload: &RequestPayload) -> Result<String> {
        debug!(endpoint = %self.endpoint, domains = payload.company_domains.len(), "sending report request");

        let response = self.http.post(&self.endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "report service returned an error");
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "failed to read error response body");
                    String::new()
                }
            };

            if let Ok(ErrorResponse { error: Some(message) }) =
                serde_json::from_str::<ErrorResponse>(&body)
            {
                if !message.is_empty() {
                    return Err(eyre!(message));
                }
            }
            return Err(eyre!("Request failed with status code {}", status.as_u16()));
        }

        let body: ReportResponse = response.json().await?;
        body.report
            .ok_or_else(|| eyre!("Report service response did not include a report"))
    }
}
