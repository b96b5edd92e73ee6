//! Scripted collaborators for testing.

use super::exchange::{Announcer, ContributionSource, Decision, Reply};
use super::{Range, Revealed, RunId};
use crate::crypto::Commitment;
use crate::error::{FairError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;

/// Replies from a queue; cancels once the queue runs dry
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    replies: VecDeque<Reply>,
    decision: Decision,
    requested: Vec<Range>,
}

impl ScriptedSource {
    /// Queue numeric contributions, aborting on the first rejection
    pub fn numbers(values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(values.into_iter().map(Reply::Number))
    }

    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            decision: Decision::Abort,
            requested: Vec::new(),
        }
    }

    /// Answer rejections with `decision`
    pub fn on_invalid(mut self, decision: Decision) -> Self {
        self.decision = decision;
        self
    }

    /// Ranges asked for, in order
    pub fn requested(&self) -> &[Range] {
        &self.requested
    }

    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl ContributionSource for ScriptedSource {
    async fn request(&mut self, range: Range) -> Result<Reply> {
        self.requested.push(range);
        Ok(self.replies.pop_front().unwrap_or(Reply::Cancel))
    }

    fn on_rejected(&mut self, _error: &FairError) -> Decision {
        self.decision
    }
}

/// Something an announcer was shown
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnouncerEvent {
    Committed {
        run_id: RunId,
        commitment: Commitment,
        range: Range,
    },
    Rejected(String),
    Revealed(Revealed),
}

/// Keeps every announcement for later inspection
#[derive(Clone, Debug, Default)]
pub struct RecordingAnnouncer {
    events: Vec<AnnouncerEvent>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AnnouncerEvent] {
        &self.events
    }

    pub fn commitments(&self) -> Vec<Commitment> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AnnouncerEvent::Committed { commitment, .. } => Some(*commitment),
                _ => None,
            })
            .collect()
    }

    pub fn reveals(&self) -> Vec<&Revealed> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AnnouncerEvent::Revealed(revealed) => Some(revealed),
                _ => None,
            })
            .collect()
    }
}

impl Announcer for RecordingAnnouncer {
    fn committed(&mut self, run_id: RunId, commitment: &Commitment, range: Range) {
        self.events.push(AnnouncerEvent::Committed {
            run_id,
            commitment: *commitment,
            range,
        });
    }

    fn rejected(&mut self, error: &FairError) {
        self.events.push(AnnouncerEvent::Rejected(error.to_string()));
    }

    fn revealed(&mut self, revealed: &Revealed) {
        self.events.push(AnnouncerEvent::Revealed(revealed.clone()));
    }
}
