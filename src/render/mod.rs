//! Terminal rendering of consultation results.
//!
//! Every renderer is a pure function from result data to a `String`; the
//! CLI decides where it goes. Absent fields are omitted entirely, never
//! printed blank.

pub mod antecedentes;
pub mod citaciones;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const MESES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

pub const FECHA_NO_DISPONIBLE: &str = "Fecha no disponible";

/// Error banner shared by every domain.
pub fn render_error(mensaje: &str) -> String {
    format!("⚠ Error en la consulta\n  {mensaje}\n")
}

/// Captcha notice with the manual-retry affordance.
pub fn render_aviso_captcha(mensaje: &str) -> String {
    format!(
        "⚠ Verificación humana requerida\n  {mensaje}\n  Reintente la consulta con la misma cédula una vez resuelto el captcha.\n"
    )
}

/// Format a backend timestamp the way the certificate shows dates
/// ("15 de marzo de 2024, 14:30"). Unparseable input degrades to a fixed
/// placeholder instead of failing the render.
pub fn formatear_fecha(raw: &str) -> String {
    if let Ok(fecha) = DateTime::parse_from_rfc3339(raw) {
        return formatear(fecha.date_naive(), Some((fecha.naive_local().format("%H:%M")).to_string()));
    }
    if let Ok(fecha) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return formatear(fecha.date(), Some(fecha.format("%H:%M").to_string()));
    }
    if let Ok(fecha) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return formatear(fecha, None);
    }
    FECHA_NO_DISPONIBLE.to_string()
}

fn formatear(fecha: NaiveDate, hora: Option<String>) -> String {
    use chrono::Datelike;

    let mes = MESES[fecha.month0() as usize];
    match hora {
        Some(hora) => format!("{} de {} de {}, {}", fecha.day(), mes, fecha.year(), hora),
        None => format!("{} de {} de {}", fecha.day(), mes, fecha.year()),
    }
}
