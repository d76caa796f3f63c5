//! The reqwest-backed gateway client.

use crate::client::config::ClientConfig;
use crate::error::{GatewayError, Result};
use crate::traits::{FeeGateway, TokenProvider};
use crate::types::{BatchCreate, FeeChange, FeeQuery, FeeRecord, SingleCreate, StudentSummary};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Production implementation of [`FeeGateway`] over HTTPS/JSON.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    token: Arc<dyn TokenProvider>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct WarningBody {
    warning: String,
}

#[derive(Deserialize)]
struct DuplicateBody {
    existing_fee_id: String,
}

#[derive(Deserialize)]
struct FeesEnvelope {
    fees: Vec<FeeRecord>,
}

#[derive(serde::Serialize)]
struct BatchCreatePayload<'a> {
    school_id: &'a str,
    month: &'a str,
    force_overwrite: bool,
}

#[derive(serde::Serialize)]
struct SingleCreatePayload<'a> {
    student_id: &'a str,
    month: &'a str,
    paid_amount: Decimal,
}

impl GatewayClient {
    pub fn new(config: ClientConfig, token: Arc<dyn TokenProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(GatewayClient {
            http,
            config: Arc::new(config),
            token,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        let base = url::Url::parse(&self.config.base_url)
            .map_err(|e| GatewayError::Config(format!("bad base url: {e}")))?;
        base.join(path)
            .map_err(|e| GatewayError::Config(format!("bad endpoint {path}: {e}")))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.bearer_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder, what: &str) -> Result<(u16, Vec<u8>)> {
        let response = self.authorize(req).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        if self.config.enable_logging {
            tracing::debug!("[Gateway] {} -> {} ({} bytes)", what, status, body.len());
        }
        Ok((status, body))
    }
}

#[async_trait]
impl FeeGateway for GatewayClient {
    async fn list_fees(&self, query: &FeeQuery) -> Result<Vec<FeeRecord>> {
        let req = self
            .http
            .get(self.endpoint("/fees")?)
            .query(&query.to_params());
        let (status, body) = self.send(req, "GET /fees").await?;
        expect_success(status, &body)?;
        decode_json(&body)
    }

    async fn create_monthly_batch(
        &self,
        school_id: &str,
        month: &str,
        force_overwrite: bool,
    ) -> Result<BatchCreate> {
        let req = self
            .http
            .post(self.endpoint("/fees/create")?)
            .json(&BatchCreatePayload {
                school_id,
                month,
                force_overwrite,
            });
        let (status, body) = self.send(req, "POST /fees/create").await?;
        decode_batch_create(status, &body)
    }

    async fn create_single(
        &self,
        student_id: &str,
        month: &str,
        paid_amount: Decimal,
    ) -> Result<SingleCreate> {
        let req = self
            .http
            .post(self.endpoint("/fees/create-single")?)
            .json(&SingleCreatePayload {
                student_id,
                month,
                paid_amount,
            });
        let (status, body) = self.send(req, "POST /fees/create-single").await?;
        decode_single_create(status, &body)
    }

    async fn update_fees(&self, changes: &[FeeChange]) -> Result<Vec<FeeRecord>> {
        let req = self
            .http
            .post(self.endpoint("/fees/update")?)
            .json(&serde_json::json!({ "fees": changes }));
        let (status, body) = self.send(req, "POST /fees/update").await?;
        expect_success(status, &body)?;
        let envelope: FeesEnvelope = decode_json(&body)?;
        Ok(envelope.fees)
    }

    async fn delete_fees(&self, ids: &[String]) -> Result<()> {
        let req = self
            .http
            .post(self.endpoint("/fees/delete")?)
            .json(&serde_json::json!({ "fee_ids": ids }));
        let (status, body) = self.send(req, "POST /fees/delete").await?;
        expect_success(status, &body)
    }

    async fn list_students(&self, school_id: &str) -> Result<Vec<StudentSummary>> {
        let req = self
            .http
            .get(self.endpoint("/students")?)
            .query(&[("school_id", school_id)]);
        let (status, body) = self.send(req, "GET /students").await?;
        expect_success(status, &body)?;
        decode_json(&body)
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

fn expect_success(status: u16, body: &[u8]) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(status_error(status, body))
    }
}

/// Map a non-2xx response to an error, preferring the gateway's own
/// message when the body carries one.
fn status_error(status: u16, body: &[u8]) -> GatewayError {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "error", alias = "detail")]
        message: String,
    }
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
    GatewayError::Status { status, message }
}

/// Interpret `POST /fees/create-single`: 2xx carries the created
/// record, 409 carries the id of the record already occupying the
/// (student, month) slot.
fn decode_single_create(status: u16, body: &[u8]) -> Result<SingleCreate> {
    match status {
        s if (200..300).contains(&s) => Ok(SingleCreate::Created(decode_json(body)?)),
        409 => {
            let dup: DuplicateBody = decode_json(body)?;
            Ok(SingleCreate::Duplicate {
                existing_id: dup.existing_fee_id,
            })
        }
        _ => Err(status_error(status, body)),
    }
}

/// Interpret `POST /fees/create`: 2xx carries a human message, 409
/// carries the overwrite warning awaiting confirmation.
fn decode_batch_create(status: u16, body: &[u8]) -> Result<BatchCreate> {
    match status {
        s if (200..300).contains(&s) => {
            let msg: MessageBody = decode_json(body)?;
            Ok(BatchCreate::Created {
                message: msg.message,
            })
        }
        409 => {
            let warn: WarningBody = decode_json(body)?;
            Ok(BatchCreate::NeedsConfirmation {
                warning: warn.warning,
            })
        }
        _ => Err(status_error(status, body)),
    }
}
