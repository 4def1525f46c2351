//! Superficie de línea de comandos: un subcomando por dominio de consulta.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use url::Url;

use crate::model::Config;
use crate::nav;
use crate::render;
use crate::service::certificado::{self, VisorCertificado};
use crate::service::{
    AntecedentesClient, CancelToken, CitacionesClient, QueryState, QueryWorkflow, SubmitResult,
    cancel_pair,
};

const EXIT_VALIDACION: u8 = 2;
const EXIT_CANCELADO: u8 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "consultas-ec",
    version,
    about = "Consultas y verificaciones ciudadanas contra los registros oficiales"
)]
pub struct Cli {
    /// Base URL del backend de consultas
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<Url>,

    /// URL de la sesión en vivo de la automatización
    #[arg(long, global = true, value_name = "URL")]
    pub live_view_url: Option<Url>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Consulta de antecedentes penales
    Antecedentes {
        /// Número de cédula (10 dígitos)
        cedula: String,

        /// Abrir el visor del certificado PDF tras la consulta
        #[arg(long)]
        ver_certificado: bool,

        /// Descargar el certificado PDF (ruta opcional)
        #[arg(long, value_name = "RUTA", num_args = 0..=1)]
        descargar_certificado: Option<Option<PathBuf>>,
    },

    /// Consulta de citaciones judiciales
    Citaciones {
        /// Número de cédula (10 dígitos)
        cedula: String,
    },

    /// Dominios de consulta disponibles
    Menu {
        /// Ruta activa a resaltar
        #[arg(long, value_name = "RUTA", default_value = "")]
        activa: String,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::from_env().with_overrides(cli.base_url, cli.live_view_url);

    match cli.command {
        Command::Antecedentes {
            cedula,
            ver_certificado,
            descargar_certificado,
        } => consultar_antecedentes(config, &cedula, ver_certificado, descargar_certificado).await,
        Command::Citaciones { cedula } => consultar_citaciones(config, &cedula).await,
        Command::Menu { activa } => {
            print!("{}", nav::render_menu(&activa));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn consultar_antecedentes(
    config: Config,
    cedula: &str,
    ver_certificado: bool,
    descargar_certificado: Option<Option<PathBuf>>,
) -> anyhow::Result<ExitCode> {
    let workflow = QueryWorkflow::new(AntecedentesClient::new(config.clone()), &config);

    if let Some(code) = enviar(&workflow, cedula).await? {
        return Ok(code);
    }

    match workflow.state() {
        QueryState::Success(data) => {
            print!("{}", render::antecedentes::render_reporte(&data));

            if ver_certificado {
                let mut visor = VisorCertificado::default();
                if visor.mostrar(&data) {
                    if let Some(overlay) = render::antecedentes::render_visor(&data) {
                        print!("{overlay}");
                    }
                    visor.cerrar();
                } else {
                    eprintln!("El reporte no incluye un certificado PDF para visualizar.");
                }
            }

            if let Some(destino) = descargar_certificado {
                let ruta = certificado::descargar(&data, destino.as_deref()).await?;
                println!("Certificado guardado en {}", ruta.display());
            }

            Ok(ExitCode::SUCCESS)
        }
        estado => Ok(salida_no_exitosa(estado)),
    }
}

async fn consultar_citaciones(config: Config, cedula: &str) -> anyhow::Result<ExitCode> {
    let workflow = QueryWorkflow::new(CitacionesClient::new(config.clone()), &config);

    if let Some(code) = enviar(&workflow, cedula).await? {
        return Ok(code);
    }

    match workflow.state() {
        QueryState::Success(data) => {
            print!("{}", render::citaciones::render_citaciones(&data));
            Ok(ExitCode::SUCCESS)
        }
        QueryState::NoResults => {
            // A valid empty answer, not an error.
            print!("{}", render::citaciones::render_sin_resultados());
            Ok(ExitCode::SUCCESS)
        }
        estado => Ok(salida_no_exitosa(estado)),
    }
}

/// Drive one submission with ctrl-c wired to cooperative cancellation,
/// offering the manual retry affordance while the backend reports a
/// captcha. Returns an exit code when the submission did not settle in a
/// renderable state.
async fn enviar<P>(workflow: &QueryWorkflow<P>, cedula: &str) -> anyhow::Result<Option<ExitCode>>
where
    P: crate::service::ConsultaProvider,
{
    match workflow
        .submit_with_cancel(cedula, &cancelacion_por_ctrl_c())
        .await
    {
        SubmitResult::Completed => {}
        SubmitResult::Rejected { message } => {
            eprint!("{}", render::render_error(&message));
            return Ok(Some(ExitCode::from(EXIT_VALIDACION)));
        }
        SubmitResult::Cancelled => {
            eprintln!("Consulta cancelada.");
            return Ok(Some(ExitCode::from(EXIT_CANCELADO)));
        }
        SubmitResult::Ignored => return Ok(Some(ExitCode::FAILURE)),
    }

    while workflow.needs_retry() {
        let QueryState::CaptchaRequired { message } = workflow.state() else {
            break;
        };
        eprint!("{}", render::render_aviso_captcha(&message));

        if !confirmar_reintento()? {
            return Ok(Some(ExitCode::FAILURE));
        }

        match workflow.retry().await {
            SubmitResult::Completed => {}
            SubmitResult::Cancelled => {
                eprintln!("Consulta cancelada.");
                return Ok(Some(ExitCode::from(EXIT_CANCELADO)));
            }
            _ => return Ok(Some(ExitCode::FAILURE)),
        }
    }

    Ok(None)
}

/// Ask the user whether to replay the last submission. A closed or
/// non-interactive stdin counts as declining.
fn confirmar_reintento() -> anyhow::Result<bool> {
    eprint!("¿Reintentar la consulta con la misma cédula? [s/N] ");
    let mut linea = String::new();
    std::io::stdin().read_line(&mut linea)?;
    Ok(matches!(
        linea.trim().to_lowercase().as_str(),
        "s" | "si" | "sí"
    ))
}

fn salida_no_exitosa<T>(estado: QueryState<T>) -> ExitCode {
    match estado {
        QueryState::Failed { message } => {
            eprint!("{}", render::render_error(&message));
            ExitCode::FAILURE
        }
        // Captcha settles inside `enviar`; no other state survives a
        // settled submission.
        _ => ExitCode::FAILURE,
    }
}

fn cancelacion_por_ctrl_c() -> CancelToken {
    let (handle, token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_antecedentes_with_descarga_sin_ruta() {
        let cli = Cli::parse_from([
            "consultas-ec",
            "antecedentes",
            "0912345678",
            "--descargar-certificado",
        ]);
        match cli.command {
            Command::Antecedentes {
                descargar_certificado,
                ver_certificado,
                ..
            } => {
                assert_eq!(descargar_certificado, Some(None));
                assert!(!ver_certificado);
            }
            _ => panic!("subcomando inesperado"),
        }
    }

    #[test]
    fn test_parses_overrides_globales() {
        let cli = Cli::parse_from([
            "consultas-ec",
            "citaciones",
            "0912345678",
            "--base-url",
            "http://localhost:3000",
        ]);
        assert_eq!(
            cli.base_url.unwrap().as_str(),
            "http://localhost:3000/"
        );
    }
}
