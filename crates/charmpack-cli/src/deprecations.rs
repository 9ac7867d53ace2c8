//! One-time deprecation notices

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Where each notice is explained; the id is appended as the anchor
const DEPRECATION_URL_BASE: &str = "https://discourse.charmhub.io/t/4652#heading--";

/// Notices currently in use, by id
const DEPRECATION_MESSAGES: &[(&str, &str)] = &[(
    "dn01",
    "Packing a charm without a charmcraft.yaml configuration file is deprecated.",
)];

static NOTIFIER: Lazy<DeprecationNotifier> =
    Lazy::new(|| DeprecationNotifier::new(DEPRECATION_MESSAGES, DEPRECATION_URL_BASE));

/// Emits each deprecation notice at most once
pub struct DeprecationNotifier {
    messages: HashMap<&'static str, &'static str>,
    url_base: String,
    notified: Mutex<HashSet<&'static str>>,
}

impl DeprecationNotifier {
    pub fn new(messages: &[(&'static str, &'static str)], url_base: impl Into<String>) -> Self {
        Self {
            messages: messages.iter().copied().collect(),
            url_base: url_base.into(),
            notified: Mutex::new(HashSet::new()),
        }
    }

    /// The process-wide notifier with the real notices
    pub fn global() -> &'static DeprecationNotifier {
        &NOTIFIER
    }

    /// Warn about `id` unless already done or running in managed mode
    ///
    /// Inside a managed instance the outer invocation already warned.
    pub fn notify(&self, id: &'static str, managed_mode: bool) {
        if managed_mode {
            return;
        }
        let Some(message) = self.messages.get(id) else {
            debug!("Unknown deprecation id '{id}'");
            return;
        };
        if !self.notified.lock().insert(id) {
            return;
        }

        warn!("DEPRECATED: {message}");
        warn!("See {}{id} for more information.", self.url_base);
    }
}
