//! Fetch lifecycle for the selected location.
//!
//! `Idle -> Pending -> {Success, Error}`, re-entering `Pending` on every
//! submit. Each submit issues a [`FetchTicket`]; only the ticket of the latest
//! submit may change state, so a slow response for a previous location is
//! dropped instead of overwriting the newer one.

use tracing::{debug, warn};

use crate::bucket::{DayBucketer, DayZone};
use crate::error::FetchError;
use crate::model::{ForecastPayload, Location};
use crate::provider::ForecastSource;
use crate::view::ForecastView;

/// The only failure text ever shown to the user.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching data";

/// Identity of one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    location: Location,
}

impl FetchTicket {
    pub fn location(&self) -> &Location {
        &self.location
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Idle,
    Pending {
        location: Location,
    },
    Success {
        location: Location,
        view: ForecastView,
    },
    Error {
        location: Location,
        reason: String,
    },
}

/// What the renderer should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rendered<'a> {
    Idle,
    Loading,
    Failed(&'a str),
    Ready(&'a ForecastView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer submit superseded this ticket; the outcome was dropped.
    Stale,
}

#[derive(Debug)]
pub struct QueryCoordinator {
    state: QueryState,
    generation: u64,
    location_changing: bool,
    zone: DayZone,
}

impl Default for QueryCoordinator {
    fn default() -> Self {
        Self::new(DayZone::default())
    }
}

impl QueryCoordinator {
    pub fn new(zone: DayZone) -> Self {
        Self {
            state: QueryState::Idle,
            generation: 0,
            location_changing: false,
            zone,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn location(&self) -> Option<&Location> {
        match &self.state {
            QueryState::Idle => None,
            QueryState::Pending { location }
            | QueryState::Success { location, .. }
            | QueryState::Error { location, .. } => Some(location),
        }
    }

    /// Start a fetch cycle for `input`.
    ///
    /// Blank input is ignored. Submitting the current location again starts a
    /// new cycle, which is how a failed fetch is retried.
    pub fn submit(&mut self, input: &str) -> Option<FetchTicket> {
        let location = Location::parse(input)?;

        self.generation += 1;
        debug!(location = %location, generation = self.generation, "entering pending");
        self.state = QueryState::Pending {
            location: location.clone(),
        };

        Some(FetchTicket {
            generation: self.generation,
            location,
        })
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && matches!(self.state, QueryState::Pending { .. })
    }

    /// Apply a fetch outcome if `ticket` is still the latest one.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ForecastPayload, FetchError>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            warn!(
                location = %ticket.location,
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded forecast response"
            );
            return Resolution::Stale;
        }

        let location = ticket.location.clone();
        self.state = match outcome {
            Ok(payload) => {
                let bucketer = DayBucketer::for_city(self.zone, &payload.city);
                let view = ForecastView::from_payload(&payload, bucketer);
                debug!(location = %location, days = view.daily.len(), "fetch succeeded");
                QueryState::Success { location, view }
            }
            Err(err) => {
                warn!(location = %location, error = %err, "fetch failed");
                QueryState::Error {
                    location,
                    reason: GENERIC_FETCH_ERROR.to_string(),
                }
            }
        };

        Resolution::Applied
    }

    /// Independent of the fetch state: while set, everything renders as loading.
    pub fn set_location_changing(&mut self, changing: bool) {
        self.location_changing = changing;
    }

    pub fn is_location_changing(&self) -> bool {
        self.location_changing
    }

    pub fn rendered(&self) -> Rendered<'_> {
        if self.location_changing {
            return Rendered::Loading;
        }

        match &self.state {
            QueryState::Idle => Rendered::Idle,
            QueryState::Pending { .. } => Rendered::Loading,
            QueryState::Success { view, .. } => Rendered::Ready(view),
            QueryState::Error { reason, .. } => Rendered::Failed(reason.as_str()),
        }
    }
}

/// Run the fetch for `ticket`, handing the ticket back for [`QueryCoordinator::resolve`].
pub async fn fetch_ticket(
    source: &dyn ForecastSource,
    ticket: FetchTicket,
) -> (FetchTicket, Result<ForecastPayload, FetchError>) {
    let outcome = source.fetch(&ticket.location).await;
    (ticket, outcome)
}
