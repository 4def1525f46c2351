//! Cliente del endpoint de antecedentes penales.
//!
//! The backend folds its error envelope into the report object itself, so
//! interpretation happens on the decoded body: a `captcha_required` error
//! code short-circuits to the recoverable state, an explicit
//! `success: false` carries the backend message through, and anything else
//! is the report.

use async_trait::async_trait;
use reqwest::Client;

use crate::model::{AntecedentesPenales, Cedula, Config};
use crate::service::workflow::{ConsultaProvider, QueryOutcome, SubmitError};

const ENDPOINT: &str = "api/antecedentes-penales";
const ERROR_CAPTCHA: &str = "captcha_required";

pub const MENSAJE_ERROR_ANTECEDENTES: &str =
    "Ocurrió un error al consultar antecedentes penales";

/// Client for the criminal-record certificate endpoint.
pub struct AntecedentesClient {
    client: Client,
    config: Config,
}

impl AntecedentesClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Issue one `POST /api/antecedentes-penales` with `{ "cedula": ... }`
    /// and interpret the response envelope.
    pub async fn consultar(
        &self,
        cedula: &Cedula,
    ) -> Result<QueryOutcome<AntecedentesPenales>, SubmitError> {
        let url = endpoint_url(&self.config, ENDPOINT);

        tracing::debug!(cedula = %cedula, url = %url, "Consultando antecedentes penales");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "cedula": cedula }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, bytes = body.len(), "Respuesta del backend recibida");

        let reporte: AntecedentesPenales = match serde_json::from_str(&body) {
            Ok(reporte) => reporte,
            Err(_) if !status.is_success() => {
                return Err(SubmitError::Parse(format!(
                    "Unexpected status {}: {}",
                    status, body
                )));
            }
            Err(e) => {
                return Err(SubmitError::Parse(format!(
                    "Failed to deserialize response: {}",
                    e
                )));
            }
        };

        if reporte.error.as_deref() == Some(ERROR_CAPTCHA) {
            return Ok(QueryOutcome::CaptchaRequired {
                message: reporte.message,
            });
        }

        if reporte.success == Some(false) {
            return Ok(QueryOutcome::Failure {
                message: reporte.message,
            });
        }

        if !status.is_success() {
            return Err(SubmitError::Parse(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        tracing::debug!(
            cedula = %reporte.cedula,
            tiene_antecedentes = reporte.tiene_antecedentes,
            tiene_certificado = reporte.certificado_disponible(),
            "Reporte de antecedentes decodificado"
        );

        Ok(QueryOutcome::Report(reporte))
    }
}

#[async_trait]
impl ConsultaProvider for AntecedentesClient {
    type Report = AntecedentesPenales;

    fn domain(&self) -> &'static str {
        "antecedentes-penales"
    }

    fn generic_error_message(&self) -> &'static str {
        MENSAJE_ERROR_ANTECEDENTES
    }

    async fn submit(
        &self,
        cedula: &Cedula,
    ) -> Result<QueryOutcome<AntecedentesPenales>, SubmitError> {
        self.consultar(cedula).await
    }
}

pub(crate) fn endpoint_url(config: &Config, path: &str) -> String {
    format!(
        "{}/{}",
        config.api_base_url.as_str().trim_end_matches('/'),
        path
    )
}
