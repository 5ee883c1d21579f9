use std::sync::Arc;

use tracing::{debug, warn};

use beast_core::model::{ImageHandle, Roster};
use beast_core::render::SourceImage;

use crate::asset_proxy::fetch_image_route;
use crate::blobs::BlobStore;
use crate::chooser::IndexChooser;
use crate::error::{FetchError, SessionError};

//
// ─── SLOTS & PHASES ────────────────────────────────────────────────────────────
//

/// The two image slots a session keeps filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Current,
    Next,
}

/// Coarse view of `SessionState` used for rendering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Guessing,
    Revealed,
    Errored,
}

//
// ─── FETCH REQUESTS ────────────────────────────────────────────────────────────
//

/// Identifies one issued fetch. Only the latest ticket per slot in the live
/// lifetime is accepted by `GuessSession::complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    lifetime: u64,
    slot: Slot,
    seq: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

/// Work the caller has to perform: fetch `route`, decode it, report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub index: usize,
    pub name: String,
    pub image_path: String,
    pub route: String,
}

impl FetchRequest {
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.ticket.slot
    }
}

#[derive(Debug, Clone)]
struct PendingFetch {
    seq: u64,
    name: String,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// A decoded image installed in a slot, addressed through the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub name: String,
    pub handle: ImageHandle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current: Option<LoadedImage>,
    pub next: Option<LoadedImage>,
    pub guess_text: String,
    pub revealed: bool,
    pub errored: bool,
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.errored {
            SessionPhase::Errored
        } else if self.current.is_none() {
            SessionPhase::Loading
        } else if self.revealed {
            SessionPhase::Revealed
        } else {
            SessionPhase::Guessing
        }
    }
}

/// Why a completion was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The session was torn down or re-initialized after the request was issued.
    Cancelled,
    /// A newer request for the same slot is outstanding.
    Superseded,
    /// The session already failed.
    SessionErrored,
}

/// What `GuessSession::complete` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Installed { slot: Slot, handle: ImageHandle },
    /// The current image could not be loaded; the session is now errored.
    Errored,
    /// The prefetch failed and was discarded.
    NextDiscarded,
    Dropped(DropReason),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-writer guess loop over a roster.
///
/// The session never performs I/O. Operations that need an image return
/// `FetchRequest`s, and the caller reports each outcome with `complete`.
pub struct GuessSession {
    roster: Arc<Roster>,
    chooser: Arc<dyn IndexChooser>,
    state: SessionState,
    blobs: BlobStore,
    lifetime: u64,
    active: bool,
    seq: u64,
    pending_current: Option<PendingFetch>,
    pending_next: Option<PendingFetch>,
}

impl GuessSession {
    /// # Errors
    ///
    /// Returns `SessionError::EmptyRoster` if the roster has no entries.
    pub fn new(roster: Arc<Roster>, chooser: Arc<dyn IndexChooser>) -> Result<Self, SessionError> {
        if roster.is_empty() {
            return Err(SessionError::EmptyRoster);
        }
        Ok(Self {
            roster,
            chooser,
            state: SessionState::default(),
            blobs: BlobStore::new(),
            lifetime: 0,
            active: false,
            seq: 0,
            pending_current: None,
            pending_next: None,
        })
    }

    /// Start a fresh lifetime and request the current and next images.
    ///
    /// Anything left from a previous lifetime is released, and its outstanding
    /// requests will be dropped when they complete.
    pub fn initialize(&mut self) -> Vec<FetchRequest> {
        self.reset();
        self.lifetime += 1;
        self.active = true;
        debug!(lifetime = self.lifetime, "guess session initialized");
        vec![self.issue(Slot::Current), self.issue(Slot::Next)]
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotGuessing` outside the `Guessing` phase.
    pub fn edit_guess(&mut self, text: &str) -> Result<(), SessionError> {
        if self.phase() != SessionPhase::Guessing {
            return Err(SessionError::NotGuessing);
        }
        text.clone_into(&mut self.state.guess_text);
        Ok(())
    }

    /// Record the guess verbatim and reveal the answer.
    ///
    /// Guesses are not scored; the name is simply shown next to the guess.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotGuessing` outside the `Guessing` phase and
    /// `SessionError::EmptyGuess` for an empty string. Neither changes state.
    pub fn submit_guess(&mut self, text: &str) -> Result<(), SessionError> {
        if self.phase() != SessionPhase::Guessing {
            return Err(SessionError::NotGuessing);
        }
        if text.is_empty() {
            return Err(SessionError::EmptyGuess);
        }
        text.clone_into(&mut self.state.guess_text);
        self.state.revealed = true;
        Ok(())
    }

    /// Move to the prefetched image and start prefetching another one.
    ///
    /// When the prefetch has not landed yet the session falls back to
    /// `Loading` and also requests a new current image.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRevealed` outside the `Revealed` phase.
    pub fn advance(&mut self) -> Result<Vec<FetchRequest>, SessionError> {
        if self.phase() != SessionPhase::Revealed {
            return Err(SessionError::NotRevealed);
        }

        if let Some(old) = self.state.current.take() {
            self.blobs.revoke(old.handle);
        }
        self.state.guess_text.clear();
        self.state.revealed = false;

        let mut requests = Vec::with_capacity(2);
        match self.state.next.take() {
            Some(next) => self.state.current = Some(next),
            None => requests.push(self.issue(Slot::Current)),
        }
        requests.push(self.issue(Slot::Next));
        Ok(requests)
    }

    /// Commit the outcome of a request issued by `initialize` or `advance`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<SourceImage, FetchError>,
    ) -> Completion {
        if !self.active || ticket.lifetime != self.lifetime {
            debug!(slot = ?ticket.slot, "dropping completion from a finished lifetime");
            return Completion::Dropped(DropReason::Cancelled);
        }
        if self.state.errored {
            return Completion::Dropped(DropReason::SessionErrored);
        }

        let pending = match ticket.slot {
            Slot::Current => &mut self.pending_current,
            Slot::Next => &mut self.pending_next,
        };
        let name = match pending.take_if(|p| p.seq == ticket.seq) {
            Some(p) => p.name,
            None => {
                debug!(slot = ?ticket.slot, "dropping superseded completion");
                return Completion::Dropped(DropReason::Superseded);
            }
        };

        match (ticket.slot, outcome) {
            (slot, Ok(image)) => {
                let handle = self.blobs.create(image);
                let loaded = LoadedImage { name, handle };
                let target = match slot {
                    Slot::Current => {
                        self.state.revealed = false;
                        &mut self.state.current
                    }
                    Slot::Next => &mut self.state.next,
                };
                if let Some(old) = target.replace(loaded) {
                    self.blobs.revoke(old.handle);
                }
                Completion::Installed { slot, handle }
            }
            (Slot::Current, Err(err)) => {
                warn!(error = %err, name = %name, "current image failed to load");
                self.state.errored = true;
                self.pending_next = None;
                Completion::Errored
            }
            (Slot::Next, Err(err)) => {
                debug!(error = %err, name = %name, "prefetch failed; discarding");
                Completion::NextDiscarded
            }
        }
    }

    /// End the lifetime. Later completions are dropped and every handle is released.
    pub fn teardown(&mut self) {
        self.reset();
        self.active = false;
    }

    fn reset(&mut self) {
        self.blobs.revoke_all();
        self.state = SessionState::default();
        self.pending_current = None;
        self.pending_next = None;
    }

    fn issue(&mut self, slot: Slot) -> FetchRequest {
        let index = self.chooser.choose(self.roster.len()) % self.roster.len();
        let entry = &self.roster.entries()[index];
        self.seq += 1;
        let pending = PendingFetch {
            seq: self.seq,
            name: entry.name().to_string(),
        };
        match slot {
            Slot::Current => self.pending_current = Some(pending),
            Slot::Next => self.pending_next = Some(pending),
        }
        debug!(?slot, index, name = entry.name(), "issuing image fetch");

        FetchRequest {
            ticket: FetchTicket {
                lifetime: self.lifetime,
                slot,
                seq: self.seq,
            },
            index,
            name: entry.name().to_string(),
            image_path: entry.image_path().to_string(),
            route: fetch_image_route(entry.image_path()),
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn current(&self) -> Option<&LoadedImage> {
        self.state.current.as_ref()
    }

    #[must_use]
    pub fn next(&self) -> Option<&LoadedImage> {
        self.state.next.as_ref()
    }

    #[must_use]
    pub fn guess_text(&self) -> &str {
        &self.state.guess_text
    }

    #[must_use]
    pub fn image(&self, handle: ImageHandle) -> Option<Arc<SourceImage>> {
        self.blobs.get(handle)
    }

    /// Handles that have been created and not yet released.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.blobs.live()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
