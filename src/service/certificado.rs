//! Descarga y visualización del certificado oficial en PDF.
//!
//! The criminal-record report may carry a document reference
//! (`certificadoPdf`). Viewing and downloading are independent actions:
//! viewing opens the overlay, downloading fetches the bytes and never
//! touches the overlay.

use std::path::{Path, PathBuf};

use reqwest::Client;
use url::Url;

use crate::model::AntecedentesPenales;

#[derive(Debug, thiserror::Error)]
pub enum CertificadoError {
    #[error("El reporte no incluye un certificado PDF")]
    SinCertificado,

    #[error("Referencia de certificado inválida: {0}")]
    ReferenciaInvalida(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No se pudo escribir el certificado: {0}")]
    Io(#[from] std::io::Error),
}

/// Default download filename, keyed by the queried identifier.
pub fn nombre_archivo(data: &AntecedentesPenales) -> String {
    format!("certificado-antecedentes-{}.pdf", data.cedula_consultada())
}

/// Download the certificate referenced by the report into `destino`.
///
/// When `destino` is `None` the default filename is used in the current
/// directory. Returns the path written.
pub async fn descargar(
    data: &AntecedentesPenales,
    destino: Option<&Path>,
) -> Result<PathBuf, CertificadoError> {
    let referencia = match (&data.certificado_pdf, data.certificado_disponible()) {
        (Some(referencia), true) => referencia,
        _ => return Err(CertificadoError::SinCertificado),
    };

    let url = Url::parse(referencia)
        .map_err(|e| CertificadoError::ReferenciaInvalida(format!("{referencia}: {e}")))?;

    let destino = destino
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(nombre_archivo(data)));

    tracing::info!(url = %url, destino = %destino.display(), "Descargando certificado PDF");

    let response = Client::new().get(url).send().await?;
    let response = response.error_for_status()?;
    let bytes = response.bytes().await?;

    tokio::fs::write(&destino, &bytes).await?;

    tracing::info!(bytes = bytes.len(), destino = %destino.display(), "Certificado descargado");

    Ok(destino)
}

/// Overlay view-model for the in-page certificate viewer.
///
/// `mostrar` only opens when the report actually carries a certificate
/// reference; `descargar` never opens it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VisorCertificado {
    visible: bool,
}

impl VisorCertificado {
    pub fn mostrar(&mut self, data: &AntecedentesPenales) -> bool {
        if data.certificado_disponible() {
            self.visible = true;
        }
        self.visible
    }

    pub fn cerrar(&mut self) {
        self.visible = false;
    }

    pub fn esta_visible(&self) -> bool {
        self.visible
    }
}
