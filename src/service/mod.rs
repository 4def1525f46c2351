pub mod antecedentes;
pub mod certificado;
pub mod citaciones;
pub mod observer;
pub mod workflow;

pub use antecedentes::AntecedentesClient;
pub use citaciones::CitacionesClient;
pub use observer::{LogObserver, ObserverSink};
pub use workflow::{
    CancelHandle, CancelToken, ConsultaProvider, QueryOutcome, QueryState, QueryWorkflow,
    SubmitError, SubmitResult, cancel_pair,
};
