//! Scripted place-detail source with optional blocking gates.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{Notify, mpsc};

use crate::domain::location::PlaceId;
use crate::domain::ports::{PlaceDetailField, PlaceDetails, PlaceDetailsError, PlaceDetailsSource};

type Scripted = Result<PlaceDetails, PlaceDetailsError>;

#[derive(Debug, Default)]
struct ScriptState {
    responses: HashMap<PlaceId, VecDeque<Scripted>>,
    gates: HashMap<PlaceId, Arc<Notify>>,
    calls: Vec<PlaceId>,
}

/// Place-detail source answering from a script.
///
/// Lookups for places without a scripted answer fail with `NotFound`. A
/// gated place blocks each lookup until its [`Notify`] is signalled, and an
/// optional channel reports every lookup as it starts.
#[derive(Debug, Default)]
pub struct ScriptedPlaceDetailsSource {
    state: Mutex<ScriptState>,
    entered: Option<mpsc::UnboundedSender<PlaceId>>,
}

impl ScriptedPlaceDetailsSource {
    /// Source reporting lookup starts on `entered`.
    pub fn with_entered(entered: mpsc::UnboundedSender<PlaceId>) -> Self {
        Self {
            entered: Some(entered),
            ..Self::default()
        }
    }

    /// Queue `result` for the next lookup of `place_id`.
    pub fn respond(&self, place_id: &PlaceId, result: Scripted) {
        self.lock()
            .responses
            .entry(place_id.clone())
            .or_default()
            .push_back(result);
    }

    /// Block lookups of `place_id` until the returned gate is notified.
    pub fn gate(&self, place_id: &PlaceId) -> Arc<Notify> {
        Arc::clone(
            self.lock()
                .gates
                .entry(place_id.clone())
                .or_insert_with(|| Arc::new(Notify::new())),
        )
    }

    /// Identifiers looked up so far, in call order.
    pub fn calls(&self) -> Vec<PlaceId> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PlaceDetailsSource for ScriptedPlaceDetailsSource {
    async fn lookup_place_details(
        &self,
        place_id: &PlaceId,
        _fields: &[PlaceDetailField],
    ) -> Result<PlaceDetails, PlaceDetailsError> {
        let gate = {
            let mut state = self.lock();
            state.calls.push(place_id.clone());
            state.gates.get(place_id).cloned()
        };
        if let Some(entered) = &self.entered {
            // The receiver may already be gone when a test stops listening.
            entered.send(place_id.clone()).ok();
        }
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.lock()
            .responses
            .get_mut(place_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(PlaceDetailsError::not_found(place_id.as_str())))
    }
}
