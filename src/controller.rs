use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc;

use crate::model::RecipePair;
use crate::selection::{TransformationOption, TransformationSelection};
use crate::service::RecipeService;
use crate::workflow::{FetchState, FetchWorkflow, PendingFetch, RequestToken};
use crate::TransformError;

/// User intents emitted by the view
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetQuery(String),
    SetOption(TransformationOption),
    /// Axis and value as raw strings, e.g. from a form field or CLI flag
    SetOptionNamed { axis: String, value: String },
    Submit,
    Retry,
}

/// Receives the state after every observable change
pub trait Renderer {
    fn render(&mut self, selection: &TransformationSelection, state: &FetchState);
}

struct Completion {
    token: RequestToken,
    outcome: Result<RecipePair, TransformError>,
}

/// Owns the selection and fetch state and is the only place either is mutated.
///
/// Service calls run as tokio tasks; their outcomes are queued and applied
/// one at a time by [`next_completion`](Self::next_completion), so the
/// renderer never sees a half-applied response.
pub struct Controller<R: Renderer> {
    selection: TransformationSelection,
    workflow: FetchWorkflow,
    service: Arc<dyn RecipeService>,
    renderer: R,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<R: Renderer> Controller<R> {
    pub fn new(service: Arc<dyn RecipeService>, renderer: R) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            selection: TransformationSelection::new(),
            workflow: FetchWorkflow::new(),
            service,
            renderer,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn selection(&self) -> &TransformationSelection {
        &self.selection
    }

    pub fn state(&self) -> &FetchState {
        self.workflow.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Whether a submit would do anything; views use this to disable the submit button
    pub fn can_submit(&self) -> bool {
        !self.selection.query().is_empty()
    }

    /// Apply an intent.
    ///
    /// Submit and Retry spawn the service call on the current tokio runtime
    /// and return its token; they return `Ok(None)` when there was nothing
    /// to send.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Option<RequestToken>, TransformError> {
        let token = match intent {
            Intent::SetQuery(query) => {
                self.selection.set_query(query);
                None
            }
            Intent::SetOption(option) => {
                self.selection.set_option(option);
                None
            }
            Intent::SetOptionNamed { axis, value } => {
                self.selection.set_option_named(&axis, &value)?;
                None
            }
            Intent::Submit => match self.workflow.begin(&self.selection) {
                Some(pending) => Some(self.spawn(pending)),
                None => return Ok(None),
            },
            Intent::Retry => match self.workflow.retry() {
                Some(pending) => Some(self.spawn(pending)),
                None => return Ok(None),
            },
        };

        self.render();
        Ok(token)
    }

    fn spawn(&mut self, pending: PendingFetch) -> RequestToken {
        let PendingFetch { token, request } = pending;
        let service = Arc::clone(&self.service);
        let completions = self.completions_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let call = tokio::spawn(async move { service.transform(&request).await });
            // A panicking service still produces a completion
            let outcome = call.await.unwrap_or_else(|e| Err(e.into()));
            // The controller may have been dropped; nothing left to update then
            let _ = completions.send(Completion { token, outcome });
        });
        token
    }

    /// Wait for the next finished call and apply it.
    ///
    /// Returns `None` when no call is in flight, otherwise whether the
    /// outcome was applied (`false` for a superseded request).
    pub async fn next_completion(&mut self) -> Option<bool> {
        if self.in_flight == 0 {
            return None;
        }

        let completion = self.completions_rx.recv().await?;
        self.in_flight -= 1;

        let applied = self.workflow.complete(completion.token, completion.outcome);
        if applied {
            self.render();
        } else {
            debug!("Response #{} superseded", completion.token.generation());
        }
        Some(applied)
    }

    /// Apply completions until nothing is in flight
    pub async fn run_until_idle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    fn render(&mut self) {
        self.renderer.render(&self.selection, self.workflow.state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recipe;
    use crate::request::TransformRequest;
    use crate::selection::Vegetarian;
    use crate::workflow::FetchPhase;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers after a delay taken from the URL, e.g. `http://slow` waits longer
    struct DelayedService;

    #[async_trait]
    impl RecipeService for DelayedService {
        async fn transform(
            &self,
            request: &TransformRequest,
        ) -> Result<RecipePair, TransformError> {
            let delay = if request.url.contains("slow") { 500 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if request.url.contains("broken") {
                return Err(TransformError::Status {
                    status: 502,
                    body: "bad gateway".to_string(),
                });
            }
            Ok(RecipePair {
                transformed: Recipe {
                    title: format!("{} transformed", request.url),
                    ..Default::default()
                },
                original: Recipe {
                    title: request.url.clone(),
                    ..Default::default()
                },
            })
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<(FetchPhase, Option<String>, Option<String>)>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, _selection: &TransformationSelection, state: &FetchState) {
            self.frames.push((
                state.phase().clone(),
                state.current().map(|r| r.title.clone()),
                state.previous().map(|r| r.title.clone()),
            ));
        }
    }

    fn controller() -> Controller<RecordingRenderer> {
        Controller::new(Arc::new(DelayedService), RecordingRenderer::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_with_empty_query_does_nothing() {
        let mut controller = controller();
        assert!(!controller.can_submit());

        let token = controller.dispatch(Intent::Submit).unwrap();

        assert!(token.is_none());
        assert_eq!(controller.state().phase(), &FetchPhase::Idle);
        assert!(controller.renderer().frames.is_empty());
        assert!(controller.next_completion().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_loads_both_snapshots_in_one_frame() {
        let mut controller = controller();
        controller
            .dispatch(Intent::SetQuery("http://fast".to_string()))
            .unwrap();
        controller
            .dispatch(Intent::SetOption(Vegetarian::Veg.into()))
            .unwrap();
        controller.dispatch(Intent::Submit).unwrap();
        assert!(controller.state().is_loading());

        controller.run_until_idle().await;

        assert_eq!(controller.state().phase(), &FetchPhase::Loaded);
        for (_, current, previous) in &controller.renderer().frames {
            assert_eq!(current.is_some(), previous.is_some());
        }
        let (phase, current, previous) = controller.renderer().frames.last().unwrap();
        assert_eq!(phase, &FetchPhase::Loaded);
        assert_eq!(current.as_deref(), Some("http://fast transformed"));
        assert_eq!(previous.as_deref(), Some("http://fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_superseded_response_is_discarded() {
        let mut controller = controller();
        controller
            .dispatch(Intent::SetQuery("http://slow".to_string()))
            .unwrap();
        controller.dispatch(Intent::Submit).unwrap();
        controller
            .dispatch(Intent::SetQuery("http://fast".to_string()))
            .unwrap();
        controller.dispatch(Intent::Submit).unwrap();

        assert_eq!(controller.next_completion().await, Some(true));
        assert_eq!(controller.next_completion().await, Some(false));
        assert_eq!(controller.next_completion().await, None);

        assert_eq!(
            controller.state().previous().map(|r| r.title.as_str()),
            Some("http://fast")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_then_retry() {
        let mut controller = controller();
        controller
            .dispatch(Intent::SetQuery("http://broken".to_string()))
            .unwrap();
        controller.dispatch(Intent::Submit).unwrap();
        controller.run_until_idle().await;

        assert!(controller.state().error().unwrap().contains("502"));

        let token = controller.dispatch(Intent::Retry).unwrap();
        assert!(token.is_some());
        assert!(controller.state().is_loading());
        controller.run_until_idle().await;
        assert!(matches!(controller.state().phase(), FetchPhase::Failed(_)));
    }

    struct PanickingService;

    #[async_trait]
    impl RecipeService for PanickingService {
        async fn transform(
            &self,
            _request: &TransformRequest,
        ) -> Result<RecipePair, TransformError> {
            panic!("scraper crashed");
        }
    }

    #[tokio::test]
    async fn test_panicking_service_enters_failed() {
        let mut controller =
            Controller::new(Arc::new(PanickingService), RecordingRenderer::default());
        controller
            .dispatch(Intent::SetQuery("http://x/recipe".to_string()))
            .unwrap();
        controller.dispatch(Intent::Submit).unwrap();

        let finished =
            tokio::time::timeout(Duration::from_secs(2), controller.run_until_idle()).await;

        assert!(finished.is_ok());
        assert!(controller
            .state()
            .error()
            .unwrap()
            .starts_with("Transformation call did not finish"));
        assert_eq!(controller.next_completion().await, None);
    }

    #[tokio::test]
    async fn test_unknown_axis_is_rejected() {
        let mut controller = controller();
        let result = controller.dispatch(Intent::SetOptionNamed {
            axis: "SPICE".to_string(),
            value: "HOT".to_string(),
        });

        assert!(matches!(result, Err(TransformError::UnknownAxis(_))));
        assert!(controller.renderer().frames.is_empty());
    }
}
