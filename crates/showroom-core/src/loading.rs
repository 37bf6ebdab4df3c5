//! Model load bookkeeping.
//!
//! Every request gets a ticket tagged with a generation number. Results
//! arriving for anything but the newest ticket are stale and dropped. A
//! failed load is retried once with the placeholder asset.

/// Identifies one model load request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub path: String,
    pub generation: u64,
    /// Placeholder retry after a failed load
    pub fallback: bool,
    /// Path the host asked for (differs from `path` for fallbacks)
    pub requested: String,
}

/// Load progress surfaced to the host
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading {
        path: String,
    },
    Ready {
        path: String,
        /// Showing the placeholder instead of the requested model
        fallback: bool,
    },
    Failed {
        path: String,
        reason: String,
    },
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready { .. })
    }

    /// Text for the loading/error indicator, if one should be shown
    pub fn message(&self) -> Option<String> {
        match self {
            LoadStatus::Idle => None,
            LoadStatus::Loading { .. } => Some("Loading model...".to_string()),
            LoadStatus::Ready { fallback: false, .. } => None,
            LoadStatus::Ready { fallback: true, .. } => {
                Some("Model unavailable, showing placeholder".to_string())
            }
            LoadStatus::Failed { reason, .. } => Some(format!("Failed to load model: {}", reason)),
        }
    }
}

/// What to do with a finished load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Newest request succeeded; bind the scene
    Apply,
    /// Superseded by a newer request; ignore silently
    Stale,
    /// Requested asset failed; load the placeholder with this ticket
    RetryWithPlaceholder(LoadTicket),
    /// Placeholder failed too
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct LoadTracker {
    placeholder: String,
    generation: u64,
    current: Option<LoadTicket>,
    status: LoadStatus,
}

impl LoadTracker {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            generation: 0,
            current: None,
            status: LoadStatus::Idle,
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Placeholder used by failures of later requests
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn current(&self) -> Option<&LoadTicket> {
        self.current.as_ref()
    }

    /// Path the host most recently asked for
    pub fn requested_path(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.requested.as_str())
    }

    /// Start a load, superseding any in flight
    pub fn request(&mut self, path: impl Into<String>) -> LoadTicket {
        let path = path.into();
        self.issue(path.clone(), path, false)
    }

    fn issue(&mut self, path: String, requested: String, fallback: bool) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            path: path.clone(),
            generation: self.generation,
            fallback,
            requested,
        };
        tracing::debug!("Load #{} requested: {}", ticket.generation, path);
        self.current = Some(ticket.clone());
        self.status = LoadStatus::Loading { path };
        ticket
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Record a finished load and decide how to proceed
    pub fn complete(&mut self, ticket: &LoadTicket, result: Result<(), String>) -> LoadOutcome {
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale load #{} ({})", ticket.generation, ticket.path);
            return LoadOutcome::Stale;
        }

        match result {
            Ok(()) => {
                self.status = LoadStatus::Ready {
                    path: ticket.path.clone(),
                    fallback: ticket.fallback,
                };
                LoadOutcome::Apply
            }
            Err(reason) if !ticket.fallback && ticket.path != self.placeholder => {
                tracing::warn!(
                    "Failed to load {}: {}; falling back to {}",
                    ticket.path,
                    reason,
                    self.placeholder
                );
                let retry = self.issue(self.placeholder.clone(), ticket.requested.clone(), true);
                LoadOutcome::RetryWithPlaceholder(retry)
            }
            Err(reason) => {
                tracing::error!("Failed to load {}: {}", ticket.path, reason);
                self.status = LoadStatus::Failed {
                    path: ticket.path.clone(),
                    reason,
                };
                LoadOutcome::GiveUp
            }
        }
    }
}
