use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// Fade-in duration when a banner appears
const FADE_IN_MS: u64 = 200;

/// How long a banner stays fully visible
pub const DEFAULT_HOLD_MS: u64 = 5000;

/// Fade-out duration once the hold expires
const FADE_OUT_MS: u64 = 400;

/// Outcome kind, which selects the banner styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    /// Increments with every `show`; the latest banner has the highest value.
    pub generation: u64,
    pub shown_at: Instant,
}

/// Where a banner is in its fade-in / hold / fade-out timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    FadingIn,
    Visible,
    FadingOut,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerTiming {
    pub fade_in: Duration,
    pub hold: Duration,
    pub fade_out: Duration,
}

impl Default for BannerTiming {
    fn default() -> Self {
        Self {
            fade_in: Duration::from_millis(FADE_IN_MS),
            hold: Duration::from_millis(DEFAULT_HOLD_MS),
            fade_out: Duration::from_millis(FADE_OUT_MS),
        }
    }
}

impl BannerTiming {
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    pub fn total(&self) -> Duration {
        self.fade_in + self.hold + self.fade_out
    }

    pub fn phase(&self, elapsed: Duration) -> Visibility {
        if elapsed < self.fade_in {
            Visibility::FadingIn
        } else if elapsed < self.fade_in + self.hold {
            Visibility::Visible
        } else if elapsed < self.total() {
            Visibility::FadingOut
        } else {
            Visibility::Hidden
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    banner: Option<Banner>,
}

/// The single shared banner region.
///
/// Clones share the same region. `show` overwrites the current banner and
/// restarts its timeline; subscribers only ever see the latest value.
#[derive(Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    updates: Arc<watch::Sender<Option<Banner>>>,
    scroll_requests: Arc<AtomicU64>,
    timing: BannerTiming,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(BannerTiming::default())
    }
}

impl Notifier {
    pub fn new(timing: BannerTiming) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            updates: Arc::new(updates),
            scroll_requests: Arc::new(AtomicU64::new(0)),
            timing,
        }
    }

    pub fn timing(&self) -> BannerTiming {
        self.timing
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the banner with new text and styling, scroll it into view,
    /// and start its timeline.
    pub fn show(&self, kind: BannerKind, text: impl Into<String>) -> Banner {
        self.show_at(kind, text, Instant::now())
    }

    /// `show` with an explicit start time for the timeline.
    pub fn show_at(&self, kind: BannerKind, text: impl Into<String>, at: Instant) -> Banner {
        let mut slot = self.lock();
        slot.generation += 1;
        let banner = Banner {
            kind,
            text: text.into(),
            generation: slot.generation,
            shown_at: at,
        };
        slot.banner = Some(banner.clone());
        self.scroll_requests.fetch_add(1, Ordering::Relaxed);
        self.updates.send_replace(Some(banner.clone()));
        debug!(kind = kind.css_class(), generation = banner.generation, "Banner shown");
        banner
    }

    pub fn success(&self, text: impl Into<String>) -> Banner {
        self.show(BannerKind::Success, text)
    }

    pub fn error(&self, text: impl Into<String>) -> Banner {
        self.show(BannerKind::Error, text)
    }

    pub fn clear(&self) {
        let mut slot = self.lock();
        slot.banner = None;
        self.updates.send_replace(None);
    }

    /// The last banner shown, whatever its visibility.
    pub fn current(&self) -> Option<Banner> {
        self.lock().banner.clone()
    }

    pub fn visibility_at(&self, now: Instant) -> Visibility {
        match self.lock().banner.as_ref() {
            Some(banner) => self
                .timing
                .phase(now.saturating_duration_since(banner.shown_at)),
            None => Visibility::Hidden,
        }
    }

    /// Drop the banner once its timeline has run out. Returns true if it was
    /// removed. A newer banner restarts the timeline, so an older one can
    /// never hide it.
    pub fn expire(&self, now: Instant) -> bool {
        let mut slot = self.lock();
        let expired = slot
            .banner
            .as_ref()
            .map(|b| self.timing.phase(now.saturating_duration_since(b.shown_at)) == Visibility::Hidden)
            .unwrap_or(false);
        if expired {
            slot.banner = None;
            self.updates.send_replace(None);
        }
        expired
    }

    /// Number of scroll-into-view requests issued so far.
    pub fn scroll_requests(&self) -> u64 {
        self.scroll_requests.load(Ordering::Relaxed)
    }

    /// Watch banner changes. Only the latest value is observable.
    pub fn subscribe(&self) -> watch::Receiver<Option<Banner>> {
        self.updates.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
