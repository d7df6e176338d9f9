use chrono::Utc;
use tracing::{debug, info, warn};

use crate::models::Review;
use crate::storage::Storage;

const APPROVED_KEY: &str = "reviews.approved";
const PENDING_KEY: &str = "reviews.pending";

/// How many approved reviews the site displays.
const LATEST_LIMIT: usize = 6;

/// Moderated review state: pending submissions, approved testimonials and
/// the transient moderation-panel flag.
///
/// Every mutation persists the affected collection through the storage
/// backend, best-effort: a failed write is logged and the in-memory state
/// stays authoritative. Loading never fails; missing or unreadable stored
/// state falls back to defaults.
pub struct ReviewStore<S: Storage> {
    storage: S,
    approved: Vec<Review>,
    pending: Vec<Review>,
    admin_open: bool,
}

impl<S: Storage> ReviewStore<S> {
    /// Load both collections from storage, seeding the approved list with
    /// the two sample reviews on first run, then write both keys back so
    /// storage holds valid collections after any session start.
    pub fn load(storage: S) -> Self {
        let now = Utc::now().timestamp_millis();
        let approved = read_or(&storage, APPROVED_KEY, || seed_approved(now));
        let pending = read_or(&storage, PENDING_KEY, Vec::new);

        let store = Self {
            storage,
            approved,
            pending,
            admin_open: false,
        };

        store.persist_approved();
        store.persist_pending();

        info!(
            approved = store.approved.len(),
            pending = store.pending.len(),
            "Loaded review store"
        );

        store
    }

    /// Queue a review for moderation and return it.
    ///
    /// Always succeeds: content is not validated here, and persistence is
    /// best-effort.
    pub fn submit(&mut self, text: &str, name: Option<&str>, anonymous: bool) -> Review {
        let review = Review::new(text, name, anonymous);

        debug!(id = %review.id, "Review submitted");

        self.pending.insert(0, review.clone());
        self.persist_pending();

        review
    }

    /// Queue a review with no name and the anonymous flag set.
    pub fn submit_anonymous(&mut self, text: &str) -> Review {
        self.submit(text, None, true)
    }

    /// Move the pending review with this id to the end of the approved
    /// collection, flipping its `approved` flag.
    ///
    /// Returns false, changing nothing, when no pending review matches.
    pub fn approve(&mut self, id: &str) -> bool {
        match self.pending.iter().position(|review| review.id == id) {
            Some(index) => {
                let mut review = self.pending.remove(index);
                review.approved = true;
                self.approved.push(review);
                self.persist_pending();
                self.persist_approved();

                info!(id, "Review approved");

                true
            }
            None => {
                debug!(id, "No pending review to approve");
                false
            }
        }
    }

    /// Remove the pending review with this id entirely.
    ///
    /// Returns false, changing nothing, when no pending review matches.
    pub fn reject(&mut self, id: &str) -> bool {
        match self.pending.iter().position(|review| review.id == id) {
            Some(index) => {
                self.pending.remove(index);
                self.persist_pending();

                info!(id, "Review rejected");

                true
            }
            None => {
                debug!(id, "No pending review to reject");
                false
            }
        }
    }

    /// The reviews the site displays: a copy of the approved collection,
    /// newest first, capped at six. Ties on the creation stamp keep
    /// approval order.
    pub fn latest_approved(&self) -> Vec<Review> {
        let mut latest = self.approved.clone();
        latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        latest.truncate(LATEST_LIMIT);
        latest
    }

    /// Number of reviews awaiting moderation.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Approved reviews in approval order.
    pub fn approved(&self) -> &[Review] {
        &self.approved
    }

    /// Pending reviews, newest submission first.
    pub fn pending(&self) -> &[Review] {
        &self.pending
    }

    /// Whether the moderation panel is open. Transient; never persisted.
    pub fn is_admin_open(&self) -> bool {
        self.admin_open
    }

    pub fn toggle_admin(&mut self) {
        self.admin_open = !self.admin_open;
    }

    pub fn open_admin(&mut self) {
        self.admin_open = true;
    }

    pub fn close_admin(&mut self) {
        self.admin_open = false;
    }

    fn persist_approved(&self) {
        persist(&self.storage, APPROVED_KEY, &self.approved);
    }

    fn persist_pending(&self) {
        persist(&self.storage, PENDING_KEY, &self.pending);
    }
}

/// Read and parse a stored collection, falling back to `default` when the
/// key is absent, the read fails or the value does not parse.
fn read_or<S, F>(storage: &S, key: &str, default: F) -> Vec<Review>
where
    S: Storage,
    F: FnOnce() -> Vec<Review>,
{
    match storage.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(reviews) => reviews,
            Err(err) => {
                warn!(key, %err, "Stored reviews unreadable, using defaults");
                default()
            }
        },
        Ok(None) => default(),
        Err(err) => {
            warn!(key, %err, "Storage read failed, using defaults");
            default()
        }
    }
}

/// Serialize and write one collection, swallowing write failures: the
/// in-memory state stays authoritative and only durability is lost.
fn persist<S: Storage>(storage: &S, key: &str, reviews: &[Review]) {
    let raw = match serde_json::to_string(reviews) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key, %err, "Failed to encode reviews");
            return;
        }
    };

    if let Err(err) = storage.write(key, &raw) {
        warn!(key, %err, "Failed to persist reviews");
    }
}

/// The two sample reviews shown before any real submission is approved.
fn seed_approved(now_ms: i64) -> Vec<Review> {
    let seed = |id: &str, text: &str| Review {
        id: id.to_string(),
        text: text.to_string(),
        name: None,
        anonymous: true,
        created_at: now_ms,
        approved: true,
    };

    vec![
        seed(
            "seed-1",
            "“Скористалися послугами — все офіційно та в строк.”",
        ),
        seed("seed-2", "“Доступна ціна і чудова підтримка.”"),
    ]
}
