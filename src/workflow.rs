use log::{debug, info, warn};

use crate::model::{Recipe, RecipePair};
use crate::request::TransformRequest;
use crate::selection::TransformationSelection;
use crate::service::RecipeService;
use crate::TransformError;

/// Where the workflow is in its fetch lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last call failed; carries a human-readable reason
    Failed(String),
}

/// Observable result of the most recent fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    phase: FetchPhase,
    snapshots: Option<RecipePair>,
}

impl FetchState {
    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// The transformed recipe
    pub fn current(&self) -> Option<&Recipe> {
        self.snapshots.as_ref().map(|pair| &pair.transformed)
    }

    /// The pre-transform snapshot returned alongside [`current`](Self::current)
    pub fn previous(&self) -> Option<&Recipe> {
        self.snapshots.as_ref().map(|pair| &pair.original)
    }

    pub fn snapshots(&self) -> Option<&RecipePair> {
        self.snapshots.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Generation tag of a dispatched request; later submits get larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A request that has been started and is waiting for its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub token: RequestToken,
    pub request: TransformRequest,
}

/// Drives one [`FetchState`] through submit, response and failure.
///
/// Only the response to the latest dispatched request is applied; anything
/// older is dropped when it arrives.
#[derive(Debug, Default)]
pub struct FetchWorkflow {
    state: FetchState,
    generation: u64,
    last_request: Option<TransformRequest>,
}

impl FetchWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Start a fetch for the selection.
    ///
    /// Returns `None` and changes nothing when the query is empty. Otherwise
    /// the phase is `Loading` when this returns.
    pub fn begin(&mut self, selection: &TransformationSelection) -> Option<PendingFetch> {
        if selection.query().is_empty() {
            debug!("Ignoring submit with empty recipe address");
            return None;
        }

        Some(self.dispatch(TransformRequest::from_selection(selection)))
    }

    /// Re-issue the last request after a failure
    pub fn retry(&mut self) -> Option<PendingFetch> {
        if !matches!(self.state.phase, FetchPhase::Failed(_)) {
            return None;
        }
        let request = self.last_request.clone()?;
        Some(self.dispatch(request))
    }

    fn dispatch(&mut self, request: TransformRequest) -> PendingFetch {
        self.generation += 1;
        let token = RequestToken(self.generation);
        info!("Fetching {} (request #{})", request.url, token.0);

        self.state.phase = FetchPhase::Loading;
        self.last_request = Some(request.clone());
        PendingFetch { token, request }
    }

    /// Apply the outcome of a dispatched request.
    ///
    /// Returns `false` when the token has been superseded and the outcome was discarded.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<RecipePair, TransformError>,
    ) -> bool {
        if token.0 != self.generation {
            debug!(
                "Discarding stale response #{} (latest is #{})",
                token.0, self.generation
            );
            return false;
        }

        match outcome {
            Ok(pair) => {
                info!("Loaded '{}'", pair.transformed.title);
                self.state = FetchState {
                    phase: FetchPhase::Loaded,
                    snapshots: Some(pair),
                };
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", token.0, e);
                self.state.phase = FetchPhase::Failed(e.to_string());
            }
        }
        true
    }

    /// Begin, call the service once, and complete.
    ///
    /// Returns the token that was dispatched, or `None` when the query is empty.
    pub async fn submit<S>(
        &mut self,
        service: &S,
        selection: &TransformationSelection,
    ) -> Option<RequestToken>
    where
        S: RecipeService + ?Sized,
    {
        let pending = self.begin(selection)?;
        let outcome = service.transform(&pending.request).await;
        self.complete(pending.token, outcome);
        Some(pending.token)
    }
}
