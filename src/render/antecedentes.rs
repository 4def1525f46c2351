//! Tarjeta del certificado de antecedentes penales.

use std::fmt::Write;

use crate::model::AntecedentesPenales;
use crate::render::formatear_fecha;

const RESULTADO_SIN_DETALLE: &str = "Consulta realizada";

const NOTA_LEGAL: &str = "Información importante: Este certificado es válido únicamente para el \
momento de su consulta. Los antecedentes penales pueden cambiar en cualquier momento. Para \
trámites oficiales, se recomienda obtener un certificado oficial del Ministerio del Interior.";

/// Render the full report card.
pub fn render_reporte(data: &AntecedentesPenales) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Certificado de Antecedentes Penales ===");
    let _ = writeln!(out);

    // Estado principal
    if data.tiene_antecedentes {
        let _ = writeln!(out, "  ⚠ TIENE ANTECEDENTES PENALES");
        let _ = writeln!(
            out,
            "  Se encontraron registros en el sistema del Ministerio del Interior"
        );
    } else {
        let _ = writeln!(out, "  ✔ NO TIENE ANTECEDENTES PENALES");
        let _ = writeln!(
            out,
            "  No se encontraron registros en el sistema del Ministerio del Interior"
        );
    }
    let _ = writeln!(out);

    // Certificado PDF
    if data.certificado_disponible() {
        let _ = writeln!(out, "Certificado Oficial PDF");
        let _ = writeln!(
            out,
            "  Documento oficial generado por el Ministerio del Interior"
        );
        if let Some(referencia) = &data.certificado_pdf {
            let _ = writeln!(out, "  {:<26} {}", "Referencia", referencia);
        }
        let _ = writeln!(
            out,
            "  Use --ver-certificado para abrir el visor o --descargar-certificado para guardarlo."
        );
    } else {
        let _ = writeln!(out, "ⓘ Certificado no disponible");
        let _ = writeln!(
            out,
            "  El certificado PDF no pudo ser generado automáticamente. Puede obtenerlo"
        );
        let _ = writeln!(out, "  manualmente en el portal del Ministerio del Interior.");
    }
    let _ = writeln!(out);

    // Información personal
    let _ = writeln!(out, "Información Personal");
    let _ = writeln!(
        out,
        "  {:<26} {}",
        "Nombre Completo",
        data.nombre_completo().unwrap_or("No disponible")
    );
    let _ = writeln!(
        out,
        "  {:<26} {}",
        "Cédula de Identidad",
        data.cedula_consultada()
    );
    let _ = writeln!(out);

    // Detalles de la consulta
    let _ = writeln!(out, "Detalles de la Consulta");
    let _ = writeln!(
        out,
        "  {:<26} {}",
        "Fecha y Hora de Consulta",
        formatear_fecha(&data.fecha_consulta)
    );
    let _ = writeln!(
        out,
        "  {:<26} {}",
        "Sistema Consultado", "Ministerio del Interior del Ecuador"
    );
    let _ = writeln!(out);

    // Resultado oficial
    let _ = writeln!(out, "Resultado Oficial");
    let resultado = if data.resultado_formateado.is_empty() {
        &data.resultado
    } else {
        &data.resultado_formateado
    };
    let _ = writeln!(out, "  {:<26} {}", "Resultado del Sistema", resultado);
    if !data.resultado.is_empty() && data.resultado != RESULTADO_SIN_DETALLE {
        let _ = writeln!(out, "  {:<26} {}", "Detalle", data.resultado);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{NOTA_LEGAL}");

    out
}

/// Render the certificate viewer overlay. `None` when the report carries no
/// certificate reference.
pub fn render_visor(data: &AntecedentesPenales) -> Option<String> {
    let referencia = data.certificado_pdf.as_deref()?;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "┌─ Certificado de Antecedentes Penales - {} ─┐",
        data.nombre_completo().unwrap_or("No disponible")
    );
    let _ = writeln!(out, "│ Documento: {referencia}");
    let _ = writeln!(
        out,
        "│ Use --descargar-certificado para guardar una copia local."
    );
    let _ = writeln!(out, "└ Cerrar: cualquier tecla ┘");
    Some(out)
}
