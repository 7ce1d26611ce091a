use biometrics::{Collector, Counter, Moments};

pub(crate) static COMPLETION_REQUESTS: Counter =
    Counter::new("teman_wisata.completion.requests");
pub(crate) static COMPLETION_UPSTREAM_ERRORS: Counter =
    Counter::new("teman_wisata.completion.upstream_errors");
pub(crate) static COMPLETION_CONNECTIVITY_ERRORS: Counter =
    Counter::new("teman_wisata.completion.connectivity_errors");
pub(crate) static COMPLETION_DURATION: Moments =
    Moments::new("teman_wisata.completion.duration_seconds");

pub(crate) static STORE_SAVES: Counter = Counter::new("teman_wisata.store.saves");
pub(crate) static STORE_LOAD_FALLBACKS: Counter =
    Counter::new("teman_wisata.store.load_fallbacks");

pub(crate) static SESSIONS_CREATED: Counter = Counter::new("teman_wisata.sessions.created");
pub(crate) static SESSIONS_DELETED: Counter = Counter::new("teman_wisata.sessions.deleted");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&COMPLETION_REQUESTS);
    collector.register_counter(&COMPLETION_UPSTREAM_ERRORS);
    collector.register_counter(&COMPLETION_CONNECTIVITY_ERRORS);
    collector.register_moments(&COMPLETION_DURATION);

    collector.register_counter(&STORE_SAVES);
    collector.register_counter(&STORE_LOAD_FALLBACKS);

    collector.register_counter(&SESSIONS_CREATED);
    collector.register_counter(&SESSIONS_DELETED);
}
