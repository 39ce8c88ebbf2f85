use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationNavigation {
    pub from: String,
    pub to: String,
}

/// Stand-ins for the browser services the page talks to: native dialogs,
/// local storage, location, autoplay policy, and document visibility.
#[derive(Debug)]
pub(crate) struct PlatformMocks {
    document_url: String,
    alert_messages: Vec<String>,
    confirm_messages: Vec<String>,
    confirm_responses: VecDeque<bool>,
    default_confirm_response: bool,
    local_storage: BTreeMap<String, String>,
    location_navigations: Vec<LocationNavigation>,
    autoplay_allowed: bool,
    document_hidden: bool,
}

impl PlatformMocks {
    pub(crate) fn new(url: &str, initial_local_storage: &[(&str, &str)]) -> Self {
        Self {
            document_url: url.to_string(),
            alert_messages: Vec::new(),
            confirm_messages: Vec::new(),
            confirm_responses: VecDeque::new(),
            default_confirm_response: true,
            local_storage: initial_local_storage
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            location_navigations: Vec::new(),
            autoplay_allowed: true,
            document_hidden: false,
        }
    }

    pub(crate) fn document_url(&self) -> &str {
        &self.document_url
    }

    pub(crate) fn alert(&mut self, message: &str) {
        self.alert_messages.push(message.to_string());
    }

    pub(crate) fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alert_messages)
    }

    pub(crate) fn confirm(&mut self, message: &str) -> bool {
        self.confirm_messages.push(message.to_string());
        self.confirm_responses
            .pop_front()
            .unwrap_or(self.default_confirm_response)
    }

    pub(crate) fn take_confirm_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.confirm_messages)
    }

    pub(crate) fn enqueue_confirm_response(&mut self, accepted: bool) {
        self.confirm_responses.push_back(accepted);
    }

    pub(crate) fn set_default_confirm_response(&mut self, accepted: bool) {
        self.default_confirm_response = accepted;
    }

    pub(crate) fn local_storage_get(&self, key: &str) -> Option<&str> {
        self.local_storage.get(key).map(String::as_str)
    }

    pub(crate) fn local_storage_set(&mut self, key: &str, value: &str) {
        self.local_storage.insert(key.to_string(), value.to_string());
    }

    pub(crate) fn local_storage_remove(&mut self, key: &str) {
        self.local_storage.remove(key);
    }

    pub(crate) fn navigate(&mut self, to: &str) {
        let from = std::mem::replace(&mut self.document_url, to.to_string());
        self.location_navigations.push(LocationNavigation {
            from,
            to: to.to_string(),
        });
    }

    pub(crate) fn take_location_navigations(&mut self) -> Vec<LocationNavigation> {
        std::mem::take(&mut self.location_navigations)
    }

    pub(crate) fn autoplay_allowed(&self) -> bool {
        self.autoplay_allowed
    }

    pub(crate) fn set_autoplay_allowed(&mut self, allowed: bool) {
        self.autoplay_allowed = allowed;
    }

    pub(crate) fn document_hidden(&self) -> bool {
        self.document_hidden
    }

    pub(crate) fn set_document_hidden(&mut self, hidden: bool) {
        self.document_hidden = hidden;
    }
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

impl TraceState {
    pub(crate) fn event_line(&mut self, line: String) {
        if self.enabled && self.events {
            self.line(line);
        }
    }

    pub(crate) fn timer_line(&mut self, line: String) {
        if self.enabled && self.timers {
            self.line(line);
        }
    }

    pub(crate) fn line(&mut self, line: String) {
        log::debug!("{line}");
        if self.enabled {
            if self.to_stderr {
                eprintln!("{line}");
            }
            if self.logs.len() >= self.log_limit {
                self.logs.pop_front();
            }
            self.logs.push_back(line);
        }
    }
}
