use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Resultado de la consulta de antecedentes penales.
///
/// This mirrors the backend's JSON shape, camelCase field names included.
/// The backend also folds its success/error envelope into the same object,
/// so those fields live here too and are interpreted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntecedentesPenales {
    #[serde(default)]
    pub cedula: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub resultado: String,
    #[serde(default)]
    pub resultado_formateado: String,
    #[serde(default)]
    pub tiene_antecedentes: bool,
    #[serde(default)]
    pub fecha_consulta: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificado_pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiene_certificado: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub informacion_personal: Option<InformacionPersonal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalles_consulta: Option<DetallesConsulta>,
    /// Raw upstream payload. Kept as an opaque string-keyed mapping; never
    /// destructured without a presence check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datos_completos: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AntecedentesPenales {
    /// Whether the report carries an official certificate reference.
    pub fn certificado_disponible(&self) -> bool {
        self.tiene_certificado.unwrap_or(false) && self.certificado_pdf.is_some()
    }

    /// Full name, preferring the nested personal-info record.
    pub fn nombre_completo(&self) -> Option<&str> {
        self.informacion_personal
            .as_ref()
            .map(|info| info.nombre.as_str())
            .filter(|n| !n.is_empty())
            .or_else(|| Some(self.nombre.as_str()).filter(|n| !n.is_empty()))
    }

    /// Identifier, preferring the nested personal-info record.
    pub fn cedula_consultada(&self) -> &str {
        self.informacion_personal
            .as_ref()
            .map(|info| info.cedula.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.cedula)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InformacionPersonal {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub cedula: String,
    #[serde(default)]
    pub antecedentes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetallesConsulta {
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub hora: String,
    #[serde(default)]
    pub sistema: String,
}
