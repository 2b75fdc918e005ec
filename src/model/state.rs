use std::collections::VecDeque;
use std::ops::RangeInclusive;

use log::{debug, error};

use super::markers::{MarkerSet, RenderReport};
use super::source::FetchResult;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    Loading,
}

/// Something the user has to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    TownsUnavailable,
}

/// A request that has been issued. The sequence number comes back with the
/// response so late answers to older requests can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub sequence: u64,
    pub url: String,
}

#[derive(Debug, PartialEq)]
pub enum CycleOutcome {
    Rendered(RenderReport),
    Failed,
    /// A newer request has been issued since, the response was dropped.
    Stale,
}

/// Everything the handlers share: how many towns are wanted, what is on the
/// map, and whether a request is in flight.
#[derive(Debug)]
pub struct AppState {
    base_url: String,
    town_count: u32,
    town_count_range: RangeInclusive<u32>,
    markers: MarkerSet,
    latest_sequence: u64,
    loading: LoadingState,
    notifications: VecDeque<Notification>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let town_count_range = config.town_count_range();
        Self {
            base_url: config.api_base_url.clone(),
            town_count: config
                .initial_town_count
                .clamp(*town_count_range.start(), *town_count_range.end()),
            town_count_range,
            markers: MarkerSet::default(),
            latest_sequence: 0,
            loading: LoadingState::Idle,
            notifications: VecDeque::new(),
        }
    }

    pub fn town_count(&self) -> u32 {
        self.town_count
    }

    /// Returns the count that was actually stored after clamping it to the
    /// allowed range.
    pub fn set_town_count(&mut self, count: u32) -> u32 {
        self.town_count = count.clamp(*self.town_count_range.start(), *self.town_count_range.end());
        self.town_count
    }

    pub fn request_url(&self) -> String {
        format!("{}{}", self.base_url, self.town_count)
    }

    /// Start a new fetch for the current town count. Any request issued
    /// earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_sequence += 1;
        self.loading = LoadingState::Loading;
        let ticket = FetchTicket {
            sequence: self.latest_sequence,
            url: self.request_url(),
        };
        debug!("Issuing request #{} for {}", ticket.sequence, ticket.url);
        ticket
    }

    /// Apply the response to request `sequence`. The markers only change if
    /// this is the latest request and it succeeded.
    pub fn complete_fetch(&mut self, sequence: u64, result: FetchResult) -> CycleOutcome {
        if sequence != self.latest_sequence {
            debug!(
                "Discarding response #{sequence}, request #{} is newer",
                self.latest_sequence
            );
            return CycleOutcome::Stale;
        }
        self.loading = LoadingState::Idle;

        match result {
            Ok(towns) => CycleOutcome::Rendered(self.markers.replace(&towns)),
            Err(err) => {
                error!("Error fetching or plotting towns: {err}");
                self.notifications.push_back(Notification::TownsUnavailable);
                CycleOutcome::Failed
            }
        }
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }
}
