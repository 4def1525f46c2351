//! Tarjetas de citaciones judiciales.

use std::fmt::Write;

use crate::model::{CitacionJudicial, CitacionesJudiciales};

const TIPO_DESCONOCIDO: &str = "DESCONOCIDO";

// Date milestones in display order; empty values are skipped entirely.
const FECHAS: [(&str, fn(&CitacionJudicial) -> &str); 6] = [
    ("Razón de Envío", |c| &c.fecha_razon_envio),
    ("Boletas Recibidas", |c| &c.fecha_boletas_recibidas),
    ("Asignación Citado", |c| &c.fecha_asignacion_citado),
    ("Acta de Citación", |c| &c.fecha_acta_citacion),
    ("Razón de Copias", |c| &c.fecha_razon_copias),
    ("Devolución", |c| &c.fecha_devolucion),
];

/// Render the summary header plus one card per summons record.
pub fn render_citaciones(data: &CitacionesJudiciales) -> String {
    let mut out = String::new();

    let etiqueta = if data.citaciones.len() == 1 {
        "citación"
    } else {
        "citaciones"
    };
    let _ = writeln!(
        out,
        "⚖ Citaciones Judiciales Encontradas ({} {})",
        data.citaciones.len(),
        etiqueta
    );
    let _ = writeln!(out, "  {:<22} {}", "Total Citaciones", data.total_citaciones);
    let _ = writeln!(out, "  {:<22} {}", "Cédula", data.cedula);

    for citacion in &data.citaciones {
        let _ = writeln!(out);
        render_tarjeta(&mut out, citacion);
    }

    out
}

/// Empty-answer panel; no cards are rendered alongside it.
pub fn render_sin_resultados() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "⚖ No se encontraron citaciones");
    let _ = writeln!(
        out,
        "  No se encontraron citaciones judiciales para la cédula consultada."
    );
    out
}

fn render_tarjeta(out: &mut String, citacion: &CitacionJudicial) {
    let _ = writeln!(out, "─── Causa: {} ───", citacion.numero_causa);
    if !citacion.proceso.is_empty() {
        let _ = writeln!(out, "  {}", citacion.proceso);
    }
    let clasificacion = citacion.clasificacion();
    let _ = writeln!(
        out,
        "  {:<22} {} {}",
        "Estado",
        clasificacion.glifo(),
        citacion.estado
    );
    if !citacion.demandado.is_empty() {
        let _ = writeln!(out, "  {:<22} {}", "Demandado", citacion.demandado);
    }

    let _ = writeln!(out, "  📍 Ubicación");
    let _ = writeln!(out, "    {:<20} {}", "Provincia", citacion.provincia);
    let _ = writeln!(out, "    {:<20} {}", "Cantón", citacion.canton);
    let _ = writeln!(out, "    {:<20} {}", "Judicatura", citacion.judicatura);

    let fechas_presentes: Vec<(&str, &str)> = FECHAS
        .iter()
        .map(|(etiqueta, valor)| (*etiqueta, valor(citacion)))
        .filter(|(_, valor)| !valor.trim().is_empty())
        .collect();
    if !fechas_presentes.is_empty() {
        let _ = writeln!(out, "  📅 Fechas del Proceso");
        for (etiqueta, valor) in fechas_presentes {
            let _ = writeln!(out, "    {:<20} {}", etiqueta, valor);
        }
    }

    let _ = writeln!(out, "  ℹ Detalles");
    let tipo = if citacion.tipos_citacion.is_empty() {
        TIPO_DESCONOCIDO
    } else {
        &citacion.tipos_citacion
    };
    let _ = writeln!(out, "    {:<20} {}", "Tipo de Citación", tipo);
}
