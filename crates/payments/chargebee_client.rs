use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

use crate::domain::{
    repositories::billing::BillingProvider,
    value_objects::plans::{PlanDescriptor, ProviderPlan},
};

/// Minimal Chargebee (API v2) client built on reqwest.
pub struct ChargebeeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ChargebeeErrorEnvelope {
    message: Option<String>,
    #[serde(rename = "type")]
    type_: Option<String>,
    api_error_code: Option<String>,
    param: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlanEnvelope {
    plan: ProviderPlan,
}

impl ChargebeeClient {
    /// Client for `https://<site>.chargebee.com`.
    pub fn new(api_key: String, site: &str) -> Result<Self> {
        Self::with_base_url(api_key, &format!("https://{site}.chargebee.com"))
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .with_context(|| format!("invalid Chargebee base url: {base_url}"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let (error_type, api_error_code, param, message) =
            match serde_json::from_str::<ChargebeeErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope.type_,
                    envelope.api_error_code,
                    envelope.param,
                    envelope.message,
                ),
                Err(_) => (None, None, None, None),
            };

        error!(
            status = %status,
            chargebee_error_type = ?error_type,
            chargebee_api_error_code = ?api_error_code,
            chargebee_error_param = ?param,
            chargebee_error_message = ?message,
            response_body = %body,
            context = %context,
            "chargebee api request failed"
        );

        anyhow::bail!(
            "Chargebee API request failed: {} (status {}, api_error_code={:?}, message={:?})",
            context,
            status,
            api_error_code,
            message
        );
    }

    /// Creates a plan. https://apidocs.chargebee.com/docs/api/plans#create_a_plan
    pub async fn create_plan(&self, plan: &PlanDescriptor) -> Result<ProviderPlan> {
        let url = self.base_url.join("api/v2/plans")?;

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.api_key, Some(""))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&plan.form_fields())
            .send()
            .await?;
        let resp = Self::ensure_success(resp, &format!("create plan {}", plan.id)).await?;

        let parsed: PlanEnvelope = resp.json().await?;
        info!(plan_id = %parsed.plan.id, "chargebee: plan created");
        Ok(parsed.plan)
    }
}

#[async_trait]
impl BillingProvider for ChargebeeClient {
    async fn create_plan(&self, plan: &PlanDescriptor) -> Result<ProviderPlan> {
        ChargebeeClient::create_plan(self, plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::plans::plan_catalog;
    use mockito::Matcher;

    fn expert_plan() -> PlanDescriptor {
        plan_catalog()
            .into_iter()
            .find(|plan| plan.id == "expert-package-1-v1")
            .unwrap()
    }

    #[test]
    fn site_selects_hosted_domain() {
        let client = ChargebeeClient::new("key".to_string(), "ellipsis-test").unwrap();

        assert_eq!(client.base_url().as_str(), "https://ellipsis-test.chargebee.com/");
    }

    #[tokio::test]
    async fn create_plan_posts_form_with_basic_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v2/plans")
            // base64("test_key:")
            .match_header("authorization", "Basic dGVzdF9rZXk6")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "expert-package-1-v1".into()),
                Matcher::UrlEncoded("price".into(), "5000".into()),
                Matcher::UrlEncoded("period".into(), "1".into()),
                Matcher::UrlEncoded("period_unit".into(), "year".into()),
                Matcher::UrlEncoded("currency_code".into(), "USD".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"plan":{"id":"expert-package-1-v1","name":"Expert Package - 1 Skill","price":5000,"period":1,"period_unit":"year","status":"active","object":"plan"}}"#,
            )
            .create_async()
            .await;

        let client = ChargebeeClient::with_base_url("test_key".to_string(), &server.url()).unwrap();
        let created = client.create_plan(&expert_plan()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, "expert-package-1-v1");
        assert_eq!(created.price, Some(5000));
        assert_eq!(created.status.as_deref(), Some("active"));
        assert_eq!(created.extra.get("object"), Some(&serde_json::json!("plan")));
    }

    #[tokio::test]
    async fn provider_errors_surface_error_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v2/plans")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"message":"The value expert-package-1-v1 is already present.","type":"invalid_request","api_error_code":"duplicate_entry","param":"id","http_status_code":400}"#,
            )
            .create_async()
            .await;

        let client = ChargebeeClient::with_base_url("test_key".to_string(), &server.url()).unwrap();
        let err = client.create_plan(&expert_plan()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("duplicate_entry"), "{message}");
        assert!(message.contains("create plan expert-package-1-v1"), "{message}");
    }
}
