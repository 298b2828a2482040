//! Sequence diagram layout: participants left-to-right, message rows
//! beneath the headers, activation bars and fragment boxes derived from step
//! ranges.

use crate::model::{
    ActivationBar, Bounds, FragmentBox, MessageLine, ParticipantBox, Position, SequenceLayout,
};
use crate::text::TextScale;
use crate::{Error, Result};
use selkie_core::SequenceModel;

const PARTICIPANT_MIN_WIDTH: f64 = 80.0;
const PARTICIPANT_LABEL_PADDING: f64 = 12.0;
/// Extra lifeline below the last message row.
const LIFELINE_TAIL: f64 = 40.0;
/// Vertical room a fragment label needs above its first covered row.
const FRAGMENT_LABEL_ROOM: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct SequenceOptions {
    pub padding: f64,
    /// Minimum center-to-center participant spacing; widened to fit the
    /// longest participant label.
    pub participant_spacing: f64,
    pub participant_height: f64,
    /// Distance from the diagram top to the first message row.
    pub header_height: f64,
    pub row_height: f64,
    /// Horizontal reach of a self-message loop.
    pub self_loop_width: f64,
    pub activation_width: f64,
    pub fragment_margin: f64,
    pub text: TextScale,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            padding: 50.0,
            participant_spacing: 150.0,
            participant_height: 60.0,
            header_height: 100.0,
            row_height: 40.0,
            self_loop_width: 40.0,
            activation_width: 10.0,
            fragment_margin: 20.0,
            text: TextScale::default(),
        }
    }
}

pub fn layout_sequence(model: &SequenceModel, opts: &SequenceOptions) -> Result<SequenceLayout> {
    let usable = opts.padding.is_finite()
        && opts.participant_spacing.is_finite()
        && opts.participant_spacing > 0.0
        && opts.header_height.is_finite()
        && opts.row_height.is_finite()
        && opts.row_height > 0.0;
    if !usable {
        return Err(Error::InvalidOptions {
            message: "sequence options must be finite with positive spacing and row height"
                .to_string(),
        });
    }

    if model.is_empty() {
        return Ok(SequenceLayout::default());
    }

    let longest_label = model
        .participants()
        .iter()
        .map(|p| opts.text.measure(display_label(&p.label, &p.id)).width)
        .fold(0.0f64, f64::max);
    let spacing = opts
        .participant_spacing
        .max(longest_label + 2.0 * PARTICIPANT_LABEL_PADDING);

    let total_steps = model.total_steps();
    let rows_top = opts.padding + opts.header_height;
    let lifeline_bottom = rows_top + total_steps as f64 * opts.row_height + LIFELINE_TAIL;
    let row_y = |step: u32| rows_top + (step.saturating_sub(1)) as f64 * opts.row_height;

    let mut participants: Vec<ParticipantBox> = Vec::with_capacity(model.participants().len());
    for (i, p) in model.participants().iter().enumerate() {
        let label_width = opts.text.measure(display_label(&p.label, &p.id)).width;
        let width = (label_width + 2.0 * PARTICIPANT_LABEL_PADDING).max(PARTICIPANT_MIN_WIDTH);
        let center_x = opts.padding + spacing / 2.0 + i as f64 * spacing;
        participants.push(ParticipantBox {
            id: p.id.clone(),
            x: center_x - width / 2.0,
            y: opts.padding,
            width,
            height: opts.participant_height,
            center_x,
            lifeline_top: opts.padding + opts.participant_height,
            lifeline_bottom,
        });
    }

    let center_of = |id: &str| {
        model
            .participant_index(id)
            .map(|i| participants[i].center_x)
    };

    let mut messages: Vec<MessageLine> = Vec::with_capacity(model.messages().len());
    for m in model.messages() {
        let (Some(x1), Some(x2)) = (center_of(&m.source), center_of(&m.target)) else {
            continue;
        };
        let y = row_y(m.step);
        let points = if m.is_self_message() {
            // Outward bow: out to the right of the lifeline and back.
            vec![
                Position { x: x1, y },
                Position {
                    x: x1 + opts.self_loop_width,
                    y,
                },
                Position {
                    x: x1 + opts.self_loop_width,
                    y: y + opts.row_height / 2.0,
                },
                Position {
                    x: x1,
                    y: y + opts.row_height / 2.0,
                },
            ]
        } else {
            vec![Position { x: x1, y }, Position { x: x2, y }]
        };
        messages.push(MessageLine {
            step: m.step,
            source: m.source.clone(),
            target: m.target.clone(),
            points,
            self_message: m.is_self_message(),
            line: m.line,
        });
    }

    let mut activations: Vec<ActivationBar> = Vec::with_capacity(model.activations().len());
    for a in model.activations() {
        let Some(center_x) = center_of(&a.participant) else {
            continue;
        };
        let top = row_y(a.start_step) - opts.row_height / 2.0;
        let bottom = row_y(a.end_step) + opts.row_height / 2.0;
        activations.push(ActivationBar {
            participant: a.participant.clone(),
            x: center_x - opts.activation_width / 2.0,
            y: top,
            width: opts.activation_width,
            height: bottom - top,
        });
    }

    let mut fragments: Vec<FragmentBox> = Vec::with_capacity(model.fragments().len());
    for f in model.fragments() {
        // Horizontal extent spans the participants actually touched in the
        // step range; an empty range falls back to the full participant row.
        let mut lo: Option<usize> = None;
        let mut hi: Option<usize> = None;
        for m in model.messages() {
            if m.step < f.start_step || m.step > f.end_step {
                continue;
            }
            for id in [m.source.as_str(), m.target.as_str()] {
                if let Some(i) = model.participant_index(id) {
                    lo = Some(lo.map_or(i, |v| v.min(i)));
                    hi = Some(hi.map_or(i, |v| v.max(i)));
                }
            }
        }
        let (lo, hi) = match (lo, hi) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => (0, participants.len() - 1),
        };
        let left = participants[lo].center_x - spacing / 2.0 + opts.fragment_margin;
        let right = participants[hi].center_x + spacing / 2.0 - opts.fragment_margin;
        let top = row_y(f.start_step) - opts.row_height * FRAGMENT_LABEL_ROOM;
        let bottom = row_y(f.end_step) + opts.row_height / 2.0;
        fragments.push(FragmentBox {
            kind: f.kind,
            label: f.label.clone(),
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        });
    }

    let mut extremes: Vec<(f64, f64)> = Vec::new();
    for p in &participants {
        extremes.push((p.x, p.y));
        extremes.push((p.x + p.width, p.lifeline_bottom));
    }
    for m in &messages {
        for pt in &m.points {
            extremes.push((pt.x, pt.y));
        }
    }
    for f in &fragments {
        extremes.push((f.x, f.y));
        extremes.push((f.x + f.width, f.y + f.height));
    }
    let bounds = Bounds::from_points(extremes);

    Ok(SequenceLayout {
        participants,
        messages,
        activations,
        fragments,
        bounds,
    })
}

fn display_label<'a>(label: &'a str, id: &'a str) -> &'a str {
    if label.is_empty() { id } else { label }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selkie_core::PayloadOptions;
    use serde_json::json;

    fn sequence(payload: serde_json::Value) -> SequenceModel {
        SequenceModel::from_payload(&payload, PayloadOptions::lenient()).expect("lenient")
    }

    fn two_party() -> SequenceModel {
        sequence(json!({
            "participants": [{"id": "alice"}, {"id": "bob"}],
            "events": [
                {"step": 1, "source": "alice", "target": "bob", "label": "hello"},
                {"step": 2, "source": "bob", "target": "bob", "label": "think"},
                {"step": 3, "source": "bob", "target": "alice", "label": "reply", "line": "dashed"},
            ],
        }))
    }

    #[test]
    fn empty_model_yields_empty_layout() {
        let layout =
            layout_sequence(&SequenceModel::default(), &SequenceOptions::default()).expect("ok");
        assert!(layout.participants.is_empty());
        assert!(layout.bounds.is_none());
    }

    #[test]
    fn participants_are_evenly_spaced_left_to_right() {
        let model = sequence(json!({
            "participants": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        }));
        let layout = layout_sequence(&model, &SequenceOptions::default()).expect("ok");
        let xs: Vec<f64> = layout.participants.iter().map(|p| p.center_x).collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert!((xs[1] - xs[0] - (xs[2] - xs[1])).abs() < 1e-9);
    }

    #[test]
    fn long_labels_widen_the_spacing() {
        let narrow = layout_sequence(
            &sequence(json!({"participants": [{"id": "a"}, {"id": "b"}]})),
            &SequenceOptions::default(),
        )
        .expect("ok");
        let wide = layout_sequence(
            &sequence(json!({"participants": [
                {"id": "a", "label": "An Extremely Verbose Participant Name Indeed"},
                {"id": "b"},
            ]})),
            &SequenceOptions::default(),
        )
        .expect("ok");
        let gap = |l: &SequenceLayout| l.participants[1].center_x - l.participants[0].center_x;
        assert!(gap(&wide) > gap(&narrow));
    }

    #[test]
    fn message_rows_step_down_by_row_height() {
        let opts = SequenceOptions::default();
        let layout = layout_sequence(&two_party(), &opts).expect("ok");
        let y1 = layout.messages[0].points[0].y;
        let y3 = layout.messages[2].points[0].y;
        assert!((y3 - y1 - 2.0 * opts.row_height).abs() < 1e-9);
    }

    #[test]
    fn self_messages_bow_outward() {
        let layout = layout_sequence(&two_party(), &SequenceOptions::default()).expect("ok");
        let lifeline_x = layout.participants[1].center_x;

        let loop_msg = &layout.messages[1];
        assert!(loop_msg.self_message);
        let max_x = loop_msg
            .points
            .iter()
            .map(|p| p.x)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(max_x > lifeline_x);

        let normal = &layout.messages[0];
        assert!(!normal.self_message);
        assert_eq!(normal.points.len(), 2);
        assert_eq!(normal.points[0].y, normal.points[1].y);
    }

    #[test]
    fn activations_span_their_step_range() {
        let model = sequence(json!({
            "participants": [{"id": "a"}, {"id": "b"}],
            "events": [
                {"step": 1, "source": "a", "target": "b"},
                {"step": 2, "source": "b", "target": "a"},
                {"step": 3, "source": "a", "target": "b"},
            ],
            "activations": [{"participant": "b", "startStep": 1, "endStep": 2}],
        }));
        let opts = SequenceOptions::default();
        let layout = layout_sequence(&model, &opts).expect("ok");
        assert_eq!(layout.activations.len(), 1);
        let bar = &layout.activations[0];
        assert!((bar.height - 2.0 * opts.row_height).abs() < 1e-9);
        let lifeline_x = layout.participants[1].center_x;
        assert!((bar.x + bar.width / 2.0 - lifeline_x).abs() < 1e-9);
    }

    #[test]
    fn fragments_span_the_participants_they_touch() {
        let model = sequence(json!({
            "participants": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
            "events": [
                {"step": 1, "source": "a", "target": "b"},
                {"step": 2, "source": "b", "target": "a"},
                {"step": 3, "source": "b", "target": "c"},
            ],
            "fragments": [
                {"kind": "loop", "startStep": 1, "endStep": 2, "label": "retry"},
            ],
        }));
        let layout = layout_sequence(&model, &SequenceOptions::default()).expect("ok");
        assert_eq!(layout.fragments.len(), 1);
        let frag = &layout.fragments[0];
        // Steps 1-2 only touch a and b; c stays outside the box.
        let c_x = layout.participants[2].center_x;
        assert!(frag.x + frag.width < c_x);
        assert!(frag.x < layout.participants[0].center_x);
    }
}
