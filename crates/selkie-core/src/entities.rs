//! Sequence-diagram and timeline entities.
//!
//! These follow the same boundary contract as [`crate::model::GraphModel`]:
//! lenient construction skips malformed entries, references to unknown
//! participants are dropped, and step ranges are clamped to the valid
//! `[1, total_steps]` window.

use crate::model::payload_array;
use crate::{Error, PayloadOptions, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Actor,
    Object,
}

impl Default for ParticipantKind {
    fn default() -> Self {
        Self::Actor
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: ParticipantKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::Solid
    }
}

/// One message row in a sequence diagram. Steps are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub step: u32,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub line: LineStyle,
}

impl Message {
    pub fn is_self_message(&self) -> bool {
        self.source == self.target
    }
}

/// A vertical bar on a participant's lifeline denoting active processing
/// between two steps (inclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    pub participant: String,
    pub start_step: u32,
    pub end_step: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    Alt,
    Loop,
    Opt,
}

/// A labeled box grouping a contiguous range of steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub kind: FragmentKind,
    pub start_step: u32,
    pub end_step: u32,
    #[serde(default)]
    pub label: String,
}

/// Validated sequence-diagram content.
#[derive(Debug, Clone, Default)]
pub struct SequenceModel {
    participants: Vec<Participant>,
    messages: Vec<Message>,
    activations: Vec<Activation>,
    fragments: Vec<Fragment>,
    total_steps: u32,
}

impl SequenceModel {
    pub fn from_payload(payload: &Value, options: PayloadOptions) -> Result<Self> {
        let mut participants: Vec<Participant> = Vec::new();
        let mut known: FxHashSet<String> = FxHashSet::default();

        for (i, item) in payload_array(payload, "participants", options)?
            .iter()
            .enumerate()
        {
            let Some(p) = parse_entry::<Participant>(item, i, "participants", options)? else {
                continue;
            };
            if p.id.is_empty() || known.contains(&p.id) {
                tracing::debug!(index = i, "skipping participant with empty or duplicate id");
                continue;
            }
            known.insert(p.id.clone());
            participants.push(p);
        }

        let mut messages: Vec<Message> = Vec::new();
        for (i, item) in payload_array(payload, "events", options)?.iter().enumerate() {
            let Some(m) = parse_entry::<Message>(item, i, "events", options)? else {
                continue;
            };
            if !known.contains(&m.source) || !known.contains(&m.target) {
                tracing::warn!(
                    source = %m.source,
                    target = %m.target,
                    "dropping message with unknown participant"
                );
                continue;
            }
            if m.step == 0 {
                tracing::debug!(index = i, "dropping message with step 0 (steps are 1-based)");
                continue;
            }
            messages.push(m);
        }

        // An explicit totalSteps bounds the valid window; otherwise the
        // window is whatever the messages actually cover.
        let explicit_total = payload.get("totalSteps").and_then(Value::as_u64);
        let total_steps = match explicit_total {
            Some(total) => {
                let total = u32::try_from(total).unwrap_or(u32::MAX);
                messages.retain(|m| {
                    let keep = m.step <= total;
                    if !keep {
                        tracing::warn!(step = m.step, total, "dropping message past totalSteps");
                    }
                    keep
                });
                total
            }
            None => messages.iter().map(|m| m.step).max().unwrap_or(0),
        };

        messages.sort_by_key(|m| m.step);

        let mut activations: Vec<Activation> = Vec::new();
        for (i, item) in payload_array(payload, "activations", options)?
            .iter()
            .enumerate()
        {
            let Some(mut a) = parse_entry::<Activation>(item, i, "activations", options)? else {
                continue;
            };
            if !known.contains(&a.participant) {
                tracing::warn!(participant = %a.participant, "dropping activation with unknown participant");
                continue;
            }
            a.start_step = a.start_step.max(1);
            a.end_step = a.end_step.min(total_steps);
            if a.start_step > a.end_step {
                continue;
            }
            activations.push(a);
        }

        let mut fragments: Vec<Fragment> = Vec::new();
        for (i, item) in payload_array(payload, "fragments", options)?
            .iter()
            .enumerate()
        {
            let Some(mut f) = parse_entry::<Fragment>(item, i, "fragments", options)? else {
                continue;
            };
            f.start_step = f.start_step.max(1);
            f.end_step = f.end_step.min(total_steps);
            if f.start_step > f.end_step {
                continue;
            }
            fragments.push(f);
        }

        Ok(Self {
            participants,
            messages,
            activations,
            fragments,
            total_steps,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn participant_index(&self, id: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// One entry on a vertical timeline, ordered by source array order (the
/// period label is free text, so no date sorting is attempted).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub name: String,
    #[serde(default, alias = "year")]
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Validated timeline content.
#[derive(Debug, Clone, Default)]
pub struct TimelineModel {
    entries: Vec<TimelineEntry>,
}

impl TimelineModel {
    pub fn from_payload(payload: &Value, options: PayloadOptions) -> Result<Self> {
        let mut entries: Vec<TimelineEntry> = Vec::new();
        for (i, item) in payload_array(payload, "events", options)?.iter().enumerate() {
            let Some(entry) = parse_entry::<TimelineEntry>(item, i, "events", options)? else {
                continue;
            };
            if entry.name.is_empty() {
                tracing::debug!(index = i, "skipping timeline entry with empty name");
                continue;
            }
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry<T: serde::de::DeserializeOwned>(
    item: &Value,
    index: usize,
    section: &str,
    options: PayloadOptions,
) -> Result<Option<T>> {
    match serde_json::from_value(item.clone()) {
        Ok(entry) => Ok(Some(entry)),
        Err(err) => {
            if options.suppress_errors {
                tracing::debug!(index, section, %err, "skipping malformed entry");
                Ok(None)
            } else {
                Err(Error::InvalidPayload {
                    section: section.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }
}
