//! Cliente del endpoint de citaciones judiciales.

use async_trait::async_trait;
use reqwest::Client;

use crate::model::{Cedula, CitacionesJudiciales, CitacionesRespuesta, Config};
use crate::service::antecedentes::endpoint_url;
use crate::service::workflow::{ConsultaProvider, QueryOutcome, SubmitError};

const ENDPOINT: &str = "api/citaciones-judiciales";
const ERROR_CAPTCHA: &str = "captcha_required";

pub const MENSAJE_ERROR_CITACIONES: &str = "Ocurrió un error al hacer scraping";

/// Client for the judicial-summons endpoint.
pub struct CitacionesClient {
    client: Client,
    config: Config,
}

impl CitacionesClient {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Issue one `POST /api/citaciones-judiciales` with `{ "cedula": ... }`.
    ///
    /// A successful envelope with `totalCitaciones: 0` is the distinguished
    /// no-results answer, not an error.
    pub async fn consultar(
        &self,
        cedula: &Cedula,
    ) -> Result<QueryOutcome<CitacionesJudiciales>, SubmitError> {
        let url = endpoint_url(&self.config, ENDPOINT);

        tracing::debug!(cedula = %cedula, url = %url, "Consultando citaciones judiciales");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "cedula": cedula }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, bytes = body.len(), "Respuesta del backend recibida");

        let respuesta: CitacionesRespuesta = match serde_json::from_str(&body) {
            Ok(respuesta) => respuesta,
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

        interpretar(respuesta)
    }
}

/// Interpret a decoded summons envelope.
///
/// An explicit failure always surfaces the fixed domain message; the
/// backend's `message` field is ignored on this path.
fn interpretar(
    respuesta: CitacionesRespuesta,
) -> Result<QueryOutcome<CitacionesJudiciales>, SubmitError> {
    if respuesta.error.as_deref() == Some(ERROR_CAPTCHA) {
        return Ok(QueryOutcome::CaptchaRequired {
            message: respuesta.message,
        });
    }

    if respuesta.success != Some(true) {
        return Ok(QueryOutcome::Failure { message: None });
    }

    let data = respuesta.data.ok_or_else(|| {
        SubmitError::Parse("Successful envelope without data payload".to_string())
    })?;

    tracing::debug!(
        cedula = %data.cedula,
        total = data.total_citaciones,
        "Citaciones decodificadas"
    );

    if data.total_citaciones == 0 {
        return Ok(QueryOutcome::NoResults);
    }

    Ok(QueryOutcome::Report(data))
}

#[async_trait]
impl ConsultaProvider for CitacionesClient {
    type Report = CitacionesJudiciales;

    fn domain(&self) -> &'static str {
        "citaciones-judiciales"
    }

    fn generic_error_message(&self) -> &'static str {
        MENSAJE_ERROR_CITACIONES
    }

    async fn submit(
        &self,
        cedula: &Cedula,
    ) -> Result<QueryOutcome<CitacionesJudiciales>, SubmitError> {
        self.consultar(cedula).await
    }
}
