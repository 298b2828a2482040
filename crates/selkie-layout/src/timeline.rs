//! Vertical timeline layout: entry cards alternating left/right of a
//! central spine, with content-aware row heights.
//!
//! Row height is never a fixed multiple: each card is sized from the text it
//! actually carries (title line, wrapped summary, wrapped description), and
//! the running y offset accumulates prior heights plus the inter-row gap.

use crate::model::{Bounds, TimelineCard, TimelineLayout, TimelineSide};
use crate::text::TextScale;
use crate::{Error, Result};
use selkie_core::{TimelineEntry, TimelineModel};

/// Horizontal gap between the spine and the near edge of a card.
const SPINE_GAP_X: f64 = 40.0;
/// Spine overhang above the first card and below the last one.
const SPINE_OVERHANG: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct TimelineOptions {
    pub padding: f64,
    pub card_width: f64,
    pub min_row_height: f64,
    pub row_gap: f64,
    /// Inner card padding, applied vertically above and below the text.
    pub card_padding: f64,
    pub text: TextScale,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            padding: 50.0,
            card_width: 260.0,
            min_row_height: 80.0,
            row_gap: 24.0,
            card_padding: 16.0,
            text: TextScale::default(),
        }
    }
}

pub fn layout_timeline(model: &TimelineModel, opts: &TimelineOptions) -> Result<TimelineLayout> {
    let usable = opts.padding.is_finite()
        && opts.card_width.is_finite()
        && opts.card_width > 0.0
        && opts.min_row_height.is_finite()
        && opts.row_gap.is_finite()
        && opts.row_gap >= 0.0;
    if !usable {
        return Err(Error::InvalidOptions {
            message: "timeline options must be finite with a positive card width".to_string(),
        });
    }

    if model.is_empty() {
        return Ok(TimelineLayout::default());
    }

    let spine_x = opts.padding + opts.card_width + SPINE_GAP_X;
    let content_width = (opts.card_width - 2.0 * opts.card_padding).max(1.0);

    let mut cards: Vec<TimelineCard> = Vec::with_capacity(model.entries().len());
    let mut y = opts.padding;

    for (i, entry) in model.entries().iter().enumerate() {
        let height = row_height(entry, content_width, opts);
        let side = if i % 2 == 0 {
            TimelineSide::Left
        } else {
            TimelineSide::Right
        };
        let x = match side {
            TimelineSide::Left => spine_x - SPINE_GAP_X - opts.card_width,
            TimelineSide::Right => spine_x + SPINE_GAP_X,
        };
        cards.push(TimelineCard {
            entry: i,
            side,
            x,
            y,
            width: opts.card_width,
            height,
        });
        y += height + opts.row_gap;
    }

    let spine_top = opts.padding - SPINE_OVERHANG;
    let spine_bottom = y - opts.row_gap + SPINE_OVERHANG;

    let bounds = Bounds::from_points(
        cards
            .iter()
            .flat_map(|c| [(c.x, c.y), (c.x + c.width, c.y + c.height)])
            .chain([(spine_x, spine_top), (spine_x, spine_bottom)]),
    );

    Ok(TimelineLayout {
        cards,
        spine_x,
        spine_top,
        spine_bottom,
        bounds,
    })
}

fn row_height(entry: &TimelineEntry, content_width: f64, opts: &TimelineOptions) -> f64 {
    let line_height = opts.text.line_height();

    // Title row: name plus the period label on one line.
    let mut height = line_height;
    if let Some(summary) = entry.summary.as_deref() {
        height += opts.text.wrapped_line_count(summary, content_width) as f64 * line_height;
    }
    if let Some(description) = entry.description.as_deref() {
        height += opts.text.wrapped_line_count(description, content_width) as f64 * line_height;
    }

    (height + 2.0 * opts.card_padding).max(opts.min_row_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use selkie_core::PayloadOptions;
    use serde_json::json;

    fn timeline(payload: serde_json::Value) -> TimelineModel {
        TimelineModel::from_payload(&payload, PayloadOptions::lenient()).expect("lenient")
    }

    fn entry(name: &str, extra: serde_json::Value) -> serde_json::Value {
        let mut v = json!({"name": name, "period": "1900"});
        if let (Some(obj), Some(extra)) = (v.as_object_mut(), extra.as_object()) {
            for (k, val) in extra {
                obj.insert(k.clone(), val.clone());
            }
        }
        v
    }

    #[test]
    fn empty_model_yields_empty_layout() {
        let layout =
            layout_timeline(&TimelineModel::default(), &TimelineOptions::default()).expect("ok");
        assert!(layout.cards.is_empty());
        assert!(layout.bounds.is_none());
    }

    #[test]
    fn cards_alternate_sides_of_the_spine() {
        let model = timeline(json!({
            "events": [
                entry("first", json!({})),
                entry("second", json!({})),
                entry("third", json!({})),
            ],
        }));
        let layout = layout_timeline(&model, &TimelineOptions::default()).expect("ok");
        let sides: Vec<TimelineSide> = layout.cards.iter().map(|c| c.side).collect();
        assert_eq!(
            sides,
            vec![TimelineSide::Left, TimelineSide::Right, TimelineSide::Left]
        );
        for card in &layout.cards {
            match card.side {
                TimelineSide::Left => assert!(card.x + card.width < layout.spine_x),
                TimelineSide::Right => assert!(card.x > layout.spine_x),
            }
        }
    }

    #[test]
    fn row_height_grows_with_optional_content() {
        let opts = TimelineOptions::default();
        let summary = "A short summary of the era.";
        let description = "A considerably longer description that wraps across \
                           several lines and therefore needs extra vertical room.";

        let bare = timeline(json!({"events": [entry("bare", json!({}))]}));
        let with_summary = timeline(json!({
            "events": [entry("s", json!({"summary": summary}))],
        }));
        let with_both = timeline(json!({
            "events": [entry("sd", json!({"summary": summary, "description": description}))],
        }));

        let h = |m: &TimelineModel| layout_timeline(m, &opts).expect("ok").cards[0].height;
        let h_bare = h(&bare);
        let h_summary = h(&with_summary);
        let h_both = h(&with_both);
        assert!(h_bare <= h_summary);
        assert!(h_summary < h_both);
        assert!(h_bare >= opts.min_row_height);
    }

    #[test]
    fn y_offsets_are_a_running_sum_of_prior_heights() {
        let opts = TimelineOptions::default();
        let long = "text ".repeat(60);
        let model = timeline(json!({
            "events": [
                entry("a", json!({"description": long})),
                entry("b", json!({})),
                entry("c", json!({})),
            ],
        }));
        let layout = layout_timeline(&model, &opts).expect("ok");
        let cards = &layout.cards;
        assert!((cards[1].y - (cards[0].y + cards[0].height + opts.row_gap)).abs() < 1e-9);
        assert!((cards[2].y - (cards[1].y + cards[1].height + opts.row_gap)).abs() < 1e-9);
        // The oversized first card must push everything below it down.
        assert!(cards[0].height > opts.min_row_height);
    }

    #[test]
    fn entries_keep_source_order_top_to_bottom() {
        let model = timeline(json!({
            "events": [
                entry("newest", json!({"period": "2000"})),
                entry("oldest", json!({"period": "1500"})),
            ],
        }));
        let layout = layout_timeline(&model, &TimelineOptions::default()).expect("ok");
        assert!(layout.cards[0].y < layout.cards[1].y);
        assert_eq!(layout.cards[0].entry, 0);
    }

    #[test]
    fn spine_spans_all_cards() {
        let model = timeline(json!({
            "events": [entry("a", json!({})), entry("b", json!({}))],
        }));
        let layout = layout_timeline(&model, &TimelineOptions::default()).expect("ok");
        let last = layout.cards.last().expect("cards");
        assert!(layout.spine_top < layout.cards[0].y);
        assert!(layout.spine_bottom > last.y + last.height - 1e-9);
    }
}
