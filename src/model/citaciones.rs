use serde::{Deserialize, Serialize};

/// Una citación judicial individual, tal como la publica el backend.
///
/// Date fields arrive as plain strings and may be empty when the milestone
/// has not happened; empty means absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitacionJudicial {
    #[serde(default)]
    pub provincia: String,
    #[serde(default)]
    pub canton: String,
    #[serde(default)]
    pub judicatura: String,
    #[serde(default)]
    pub numero_causa: String,
    #[serde(default)]
    pub demandado: String,
    #[serde(default)]
    pub proceso: String,
    #[serde(default)]
    pub fecha_razon_copias: String,
    #[serde(default)]
    pub fecha_razon_envio: String,
    #[serde(default)]
    pub fecha_boletas_recibidas: String,
    #[serde(default)]
    pub fecha_devolucion: String,
    #[serde(default)]
    pub fecha_asignacion_citado: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub fecha_acta_citacion: String,
    #[serde(default)]
    pub tipos_citacion: String,
}

impl CitacionJudicial {
    pub fn clasificacion(&self) -> EstadoCitacion {
        EstadoCitacion::clasificar(&self.estado)
    }
}

/// Payload of a successful summons query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitacionesJudiciales {
    #[serde(default)]
    pub citaciones: Vec<CitacionJudicial>,
    #[serde(default)]
    pub total_citaciones: u64,
    #[serde(default)]
    pub cedula: String,
}

/// Envelope the summons endpoint wraps its payload in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitacionesRespuesta {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<CitacionesJudiciales>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Three-way classification of a summons status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoCitacion {
    NoRealizado,
    Realizado,
    Otro,
}

impl EstadoCitacion {
    pub fn clasificar(estado: &str) -> Self {
        match estado.trim() {
            "NO REALIZADO" => EstadoCitacion::NoRealizado,
            "REALIZADO" => EstadoCitacion::Realizado,
            _ => EstadoCitacion::Otro,
        }
    }

    /// Badge glyph for terminal rendering.
    pub fn glifo(self) -> &'static str {
        match self {
            EstadoCitacion::NoRealizado => "✖",
            EstadoCitacion::Realizado => "✔",
            EstadoCitacion::Otro => "•",
        }
    }
}
