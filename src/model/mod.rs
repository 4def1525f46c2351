pub mod antecedentes;
pub mod cedula;
pub mod citaciones;
pub mod config;

pub use antecedentes::{AntecedentesPenales, DetallesConsulta, InformacionPersonal};
pub use cedula::{Cedula, CedulaInvalida};
pub use citaciones::{
    CitacionJudicial, CitacionesJudiciales, CitacionesRespuesta, EstadoCitacion,
};
pub use config::Config;
