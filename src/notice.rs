use chrono::{DateTime, Duration, Local};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Local>,
}

/// Short-lived user-facing messages, e.g. a favorite that failed to save.
#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    items: Vec<Notice>,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, now: DateTime<Local>) {
        self.items.push(Notice {
            message: message.into(),
            raised_at: now,
        });
    }

    pub fn active(&self, now: DateTime<Local>) -> impl Iterator<Item = &Notice> {
        let ttl = self.ttl;
        self.items
            .iter()
            .filter(move |notice| now - notice.raised_at < ttl)
    }

    pub fn prune(&mut self, now: DateTime<Local>) {
        let ttl = self.ttl;
        self.items.retain(|notice| now - notice.raised_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
