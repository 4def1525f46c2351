//! Consultation lifecycle shared by every query domain.
//!
//! Drives a submission through idle → submitting → settled, guarding against
//! duplicate in-flight requests, signalling the live-view observer, and
//! collapsing every failure into a rendered state. Nothing here panics on a
//! bad response; the caller always gets a `QueryState` back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use url::Url;
use uuid::Uuid;

use crate::model::{Cedula, Config};
use crate::service::observer::{LogObserver, ObserverSink};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// What a domain provider concluded from one backend round trip.
#[derive(Debug, Clone)]
pub enum QueryOutcome<T> {
    /// The backend answered with a report to render.
    Report(T),
    /// A valid empty answer (e.g. zero summons records).
    NoResults,
    /// Automated retrieval was blocked by a human-verification challenge;
    /// recoverable by manual retry.
    CaptchaRequired { message: Option<String> },
    /// The backend reported failure explicitly; message passed through
    /// verbatim when present.
    Failure { message: Option<String> },
}

/// One query domain: knows how to submit an identifier to its endpoint and
/// interpret the response envelope.
#[async_trait]
pub trait ConsultaProvider: Send + Sync {
    type Report: Clone + Send + Sync + 'static;

    /// Short tag used in diagnostics.
    fn domain(&self) -> &'static str;

    /// Localized fallback shown when transport or decoding fails.
    fn generic_error_message(&self) -> &'static str;

    async fn submit(&self, cedula: &Cedula) -> Result<QueryOutcome<Self::Report>, SubmitError>;
}

/// View state of a consultation page.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Idle,
    Submitting,
    Success(T),
    NoResults,
    Failed { message: String },
    CaptchaRequired { message: String },
}

/// How a `submit` call was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// The submission ran and settled; read `state()` for the outcome.
    Completed,
    /// Client-side validation failed; no request was issued.
    Rejected { message: String },
    /// Another submission was already in flight; this one was dropped.
    Ignored,
    /// The cancellation token fired before the backend answered.
    Cancelled,
}

/// Cooperative cancellation token passed into a submission.
///
/// The default token never fires.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolves when the token is cancelled; pends forever otherwise.
    pub async fn cancelled(&self) {
        let Some(mut rx) = self.rx.clone() else {
            return std::future::pending().await;
        };
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                // Handle dropped without firing.
                return std::future::pending().await;
            }
        }
    }
}

pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx: Some(rx) })
}

struct WorkflowInner<T> {
    state: QueryState<T>,
    last_cedula: Option<Cedula>,
}

/// Per-domain consultation workflow.
///
/// Exactly one request is in flight at a time; a second `submit` while one
/// is running is ignored rather than queued.
pub struct QueryWorkflow<P: ConsultaProvider> {
    provider: P,
    live_view_url: Option<Url>,
    observer: Box<dyn ObserverSink>,
    in_flight: AtomicBool,
    inner: Mutex<WorkflowInner<P::Report>>,
}

impl<P: ConsultaProvider> QueryWorkflow<P> {
    pub fn new(provider: P, config: &Config) -> Self {
        Self {
            provider,
            live_view_url: config.live_view_url.clone(),
            observer: Box::new(LogObserver),
            in_flight: AtomicBool::new(false),
            inner: Mutex::new(WorkflowInner {
                state: QueryState::Idle,
                last_cedula: None,
            }),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ObserverSink>) -> Self {
        self.observer = observer;
        self
    }

    /// Current view state.
    pub fn state(&self) -> QueryState<P::Report> {
        self.lock_inner().state.clone()
    }

    /// Whether the last submission settled in the captcha-required state and
    /// the retry affordance should be offered.
    pub fn needs_retry(&self) -> bool {
        matches!(self.lock_inner().state, QueryState::CaptchaRequired { .. })
    }

    /// Validate and submit an identifier.
    pub async fn submit(&self, input: &str) -> SubmitResult {
        self.submit_with_cancel(input, &CancelToken::never()).await
    }

    /// Validate and submit an identifier with cooperative cancellation.
    pub async fn submit_with_cancel(&self, input: &str, cancel: &CancelToken) -> SubmitResult {
        let cedula = match input.parse::<Cedula>() {
            Ok(cedula) => cedula,
            Err(e) => {
                tracing::debug!(domain = self.provider.domain(), error = %e, "Submission rejected by validation");
                return SubmitResult::Rejected {
                    message: e.to_string(),
                };
            }
        };
        self.submit_cedula(cedula, cancel).await
    }

    /// Replay the last submitted identifier unchanged. No-op when nothing
    /// has been submitted yet.
    pub async fn retry(&self) -> SubmitResult {
        let last = self.lock_inner().last_cedula.clone();
        match last {
            Some(cedula) => self.submit_cedula(cedula, &CancelToken::never()).await,
            None => SubmitResult::Ignored,
        }
    }

    async fn submit_cedula(&self, cedula: Cedula, cancel: &CancelToken) -> SubmitResult {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(
                domain = self.provider.domain(),
                "Submission already in flight, ignoring"
            );
            return SubmitResult::Ignored;
        }

        let consulta_id = Uuid::new_v4();
        {
            let mut inner = self.lock_inner();
            inner.state = QueryState::Submitting;
            inner.last_cedula = Some(cedula.clone());
        }

        tracing::info!(
            consulta_id = %consulta_id,
            domain = self.provider.domain(),
            cedula = %cedula,
            "Iniciando consulta"
        );

        let observing = self.open_live_view();

        let outcome = tokio::select! {
            result = self.provider.submit(&cedula) => Some(result),
            _ = cancel.cancelled() => None,
        };

        let (result, next_state) = match outcome {
            None => {
                tracing::info!(consulta_id = %consulta_id, "Consulta cancelada");
                (SubmitResult::Cancelled, QueryState::Idle)
            }
            Some(Ok(QueryOutcome::Report(report))) => {
                tracing::info!(consulta_id = %consulta_id, "Consulta exitosa");
                (SubmitResult::Completed, QueryState::Success(report))
            }
            Some(Ok(QueryOutcome::NoResults)) => {
                tracing::info!(consulta_id = %consulta_id, "Consulta sin resultados");
                (SubmitResult::Completed, QueryState::NoResults)
            }
            Some(Ok(QueryOutcome::CaptchaRequired { message })) => {
                tracing::warn!(consulta_id = %consulta_id, "Captcha requerido por el backend");
                let message =
                    message.unwrap_or_else(|| self.provider.generic_error_message().to_string());
                (
                    SubmitResult::Completed,
                    QueryState::CaptchaRequired { message },
                )
            }
            Some(Ok(QueryOutcome::Failure { message })) => {
                let message =
                    message.unwrap_or_else(|| self.provider.generic_error_message().to_string());
                tracing::warn!(consulta_id = %consulta_id, message = %message, "Fallo reportado por el backend");
                (SubmitResult::Completed, QueryState::Failed { message })
            }
            Some(Err(e)) => {
                tracing::error!(consulta_id = %consulta_id, error = %e, "Fallo de transporte en la consulta");
                (
                    SubmitResult::Completed,
                    QueryState::Failed {
                        message: self.provider.generic_error_message().to_string(),
                    },
                )
            }
        };

        self.lock_inner().state = next_state;

        if observing {
            self.observer.close();
        }
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    fn open_live_view(&self) -> bool {
        let Some(base) = &self.live_view_url else {
            return false;
        };
        let raw = format!("{}/vnc.html", base.as_str().trim_end_matches('/'));
        match Url::parse(&raw) {
            Ok(url) => {
                self.observer.open(&url);
                true
            }
            Err(e) => {
                tracing::warn!(url = %raw, error = %e, "URL de sesión en vivo inválida");
                false
            }
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, WorkflowInner<P::Report>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    enum Guion {
        Resultado(Result<QueryOutcome<String>, SubmitError>),
        EsperarPuerta,
        Pendiente,
    }

    struct ProveedorFalso {
        guiones: Mutex<VecDeque<Guion>>,
        llamadas: AtomicUsize,
        cedulas: Mutex<Vec<String>>,
        inicio: Notify,
        puerta: Notify,
    }

    impl ProveedorFalso {
        fn new(guiones: Vec<Guion>) -> Arc<Self> {
            Arc::new(Self {
                guiones: Mutex::new(guiones.into()),
                llamadas: AtomicUsize::new(0),
                cedulas: Mutex::new(Vec::new()),
                inicio: Notify::new(),
                puerta: Notify::new(),
            })
        }

        fn llamadas(&self) -> usize {
            self.llamadas.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConsultaProvider for Arc<ProveedorFalso> {
        type Report = String;

        fn domain(&self) -> &'static str {
            "prueba"
        }

        fn generic_error_message(&self) -> &'static str {
            "Ocurrió un error en la consulta de prueba"
        }

        async fn submit(&self, cedula: &Cedula) -> Result<QueryOutcome<String>, SubmitError> {
            self.llamadas.fetch_add(1, Ordering::SeqCst);
            self.cedulas.lock().unwrap().push(cedula.to_string());
            let guion = self
                .guiones
                .lock()
                .unwrap()
                .pop_front()
                .expect("guion agotado");
            match guion {
                Guion::Resultado(resultado) => resultado,
                Guion::EsperarPuerta => {
                    self.inicio.notify_one();
                    self.puerta.notified().await;
                    Ok(QueryOutcome::Report("tardío".to_string()))
                }
                Guion::Pendiente => {
                    self.inicio.notify_one();
                    std::future::pending().await
                }
            }
        }
    }

    #[derive(Default)]
    struct ObservadorGrabador {
        eventos: Mutex<Vec<String>>,
    }

    impl ObserverSink for Arc<ObservadorGrabador> {
        fn open(&self, url: &Url) {
            self.eventos.lock().unwrap().push(format!("open {url}"));
        }

        fn close(&self) {
            self.eventos.lock().unwrap().push("close".to_string());
        }
    }

    fn config_sin_live_view() -> Config {
        Config {
            api_base_url: Url::parse("http://localhost:3000").unwrap(),
            live_view_url: None,
        }
    }

    fn config_con_live_view() -> Config {
        Config {
            api_base_url: Url::parse("http://localhost:3000").unwrap(),
            live_view_url: Some(Url::parse("http://localhost:5900").unwrap()),
        }
    }

    #[tokio::test]
    async fn test_invalid_identifier_blocks_submission() {
        let proveedor = ProveedorFalso::new(vec![]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        let resultado = workflow.submit("123").await;
        assert_eq!(
            resultado,
            SubmitResult::Rejected {
                message: "La cédula debe tener exactamente 10 dígitos".to_string()
            }
        );
        assert_eq!(proveedor.llamadas(), 0);
        assert_eq!(workflow.state(), QueryState::Idle);
    }

    #[tokio::test]
    async fn test_success_report() {
        let proveedor = ProveedorFalso::new(vec![Guion::Resultado(Ok(QueryOutcome::Report(
            "informe".to_string(),
        )))]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        assert_eq!(workflow.submit("0912345678").await, SubmitResult::Completed);
        assert_eq!(
            workflow.state(),
            QueryState::Success("informe".to_string())
        );
        assert!(!workflow.needs_retry());
    }

    #[tokio::test]
    async fn test_no_results_is_not_an_error() {
        let proveedor = ProveedorFalso::new(vec![Guion::Resultado(Ok(QueryOutcome::NoResults))]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        assert_eq!(workflow.submit("0912345678").await, SubmitResult::Completed);
        assert_eq!(workflow.state(), QueryState::NoResults);
    }

    #[tokio::test]
    async fn test_explicit_failure_message_passes_through_verbatim() {
        let proveedor = ProveedorFalso::new(vec![Guion::Resultado(Ok(QueryOutcome::Failure {
            message: Some("cédula no registrada".to_string()),
        }))]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        workflow.submit("0912345678").await;
        assert_eq!(
            workflow.state(),
            QueryState::Failed {
                message: "cédula no registrada".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_transport_error_collapses_to_generic_message() {
        let proveedor = ProveedorFalso::new(vec![Guion::Resultado(Err(SubmitError::Parse(
            "json truncado".to_string(),
        )))]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        workflow.submit("0912345678").await;
        assert_eq!(
            workflow.state(),
            QueryState::Failed {
                message: "Ocurrió un error en la consulta de prueba".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_captcha_then_retry_replays_same_cedula() {
        let proveedor = ProveedorFalso::new(vec![
            Guion::Resultado(Ok(QueryOutcome::CaptchaRequired {
                message: Some("Resuelva el captcha en la ventana".to_string()),
            })),
            Guion::Resultado(Ok(QueryOutcome::Report("informe".to_string()))),
        ]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        workflow.submit("0912345678").await;
        assert_eq!(
            workflow.state(),
            QueryState::CaptchaRequired {
                message: "Resuelva el captcha en la ventana".to_string()
            }
        );
        assert!(workflow.needs_retry());

        assert_eq!(workflow.retry().await, SubmitResult::Completed);
        assert_eq!(proveedor.llamadas(), 2);
        assert_eq!(
            *proveedor.cedulas.lock().unwrap(),
            vec!["0912345678".to_string(), "0912345678".to_string()]
        );
        assert_eq!(
            workflow.state(),
            QueryState::Success("informe".to_string())
        );
        assert!(!workflow.needs_retry());
    }

    #[tokio::test]
    async fn test_retry_without_prior_submission_is_noop() {
        let proveedor = ProveedorFalso::new(vec![]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        assert_eq!(workflow.retry().await, SubmitResult::Ignored);
        assert_eq!(proveedor.llamadas(), 0);
    }

    #[tokio::test]
    async fn test_submission_while_in_flight_is_ignored() {
        let proveedor = ProveedorFalso::new(vec![Guion::EsperarPuerta]);
        let workflow = Arc::new(QueryWorkflow::new(
            Arc::clone(&proveedor),
            &config_sin_live_view(),
        ));

        let primera = {
            let workflow = Arc::clone(&workflow);
            tokio::spawn(async move { workflow.submit("0912345678").await })
        };
        proveedor.inicio.notified().await;

        assert_eq!(workflow.submit("0912345678").await, SubmitResult::Ignored);
        assert_eq!(workflow.state(), QueryState::Submitting);

        proveedor.puerta.notify_one();
        assert_eq!(primera.await.unwrap(), SubmitResult::Completed);
        assert_eq!(proveedor.llamadas(), 1);
    }

    #[tokio::test]
    async fn test_new_submission_clears_previous_result() {
        let proveedor = ProveedorFalso::new(vec![
            Guion::Resultado(Ok(QueryOutcome::Failure { message: None })),
            Guion::Resultado(Ok(QueryOutcome::Report("informe".to_string()))),
        ]);
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view());

        workflow.submit("0912345678").await;
        assert!(matches!(workflow.state(), QueryState::Failed { .. }));

        workflow.submit("0912345678").await;
        assert_eq!(
            workflow.state(),
            QueryState::Success("informe".to_string())
        );
    }

    #[tokio::test]
    async fn test_observer_opens_and_closes_when_configured() {
        let proveedor = ProveedorFalso::new(vec![Guion::Resultado(Ok(QueryOutcome::Report(
            "informe".to_string(),
        )))]);
        let observador = Arc::new(ObservadorGrabador::default());
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_con_live_view())
            .with_observer(Box::new(Arc::clone(&observador)));

        workflow.submit("0912345678").await;
        assert_eq!(
            *observador.eventos.lock().unwrap(),
            vec![
                "open http://localhost:5900/vnc.html".to_string(),
                "close".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_observer_untouched_without_live_view() {
        let proveedor = ProveedorFalso::new(vec![Guion::Resultado(Ok(QueryOutcome::Report(
            "informe".to_string(),
        )))]);
        let observador = Arc::new(ObservadorGrabador::default());
        let workflow = QueryWorkflow::new(Arc::clone(&proveedor), &config_sin_live_view())
            .with_observer(Box::new(Arc::clone(&observador)));

        workflow.submit("0912345678").await;
        assert!(observador.eventos.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_settles_back_to_idle() {
        let proveedor = ProveedorFalso::new(vec![
            Guion::Pendiente,
            Guion::Resultado(Ok(QueryOutcome::Report("informe".to_string()))),
        ]);
        let observador = Arc::new(ObservadorGrabador::default());
        let workflow = Arc::new(
            QueryWorkflow::new(Arc::clone(&proveedor), &config_con_live_view())
                .with_observer(Box::new(Arc::clone(&observador))),
        );

        let (handle, token) = cancel_pair();
        let tarea = {
            let workflow = Arc::clone(&workflow);
            tokio::spawn(async move { workflow.submit_with_cancel("0912345678", &token).await })
        };
        proveedor.inicio.notified().await;
        handle.cancel();

        assert_eq!(tarea.await.unwrap(), SubmitResult::Cancelled);
        assert_eq!(workflow.state(), QueryState::Idle);
        // Observer still closed after a cancelled submission.
        assert_eq!(
            observador.eventos.lock().unwrap().last().map(String::as_str),
            Some("close")
        );

        // The workflow accepts a fresh submission afterwards.
        assert_eq!(workflow.submit("0912345678").await, SubmitResult::Completed);
    }

    #[test]
    fn test_cancel_token_default_never_fires() {
        let token = CancelToken::never();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_pair_fires() {
        let (handle, token) = cancel_pair();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
