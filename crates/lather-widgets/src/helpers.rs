#![forbid(unsafe_code)]

//! Small utilities shared by every widget and page: element lookup, batch
//! text updates, event delegation, number parsing and formatting, and popup
//! placement.

use std::rc::Rc;

use lather_core::abort::AbortSignal;
use lather_core::dom::{Document, EventContext, ListenerId, NodeId};
use lather_core::event::EventKind;
use lather_core::geometry::{Point, Rect, Size};
use lather_core::html::Html;
use lather_core::selector::Selector;

/// Minimum distance kept between a popup and the viewport edge.
pub const POPUP_MARGIN: i32 = 8;

/// Vertical gap between an anchor and its popup.
pub const POPUP_GAP: i32 = 6;

/// Look up an element by id. Missing elements are not an error.
#[must_use]
pub fn element(doc: &Document, id: &str) -> Option<NodeId> {
    let found = doc.get_element_by_id(id);
    #[cfg(feature = "tracing")]
    if found.is_none() {
        tracing::trace!(id, "element not found");
    }
    found
}

/// Replace the text of the element with `id`. Returns `false` if missing.
pub fn set_text(doc: &mut Document, id: &str, text: &str) -> bool {
    match element(doc, id) {
        Some(node) => {
            doc.set_text_content(node, text);
            true
        }
        None => false,
    }
}

/// Apply many `(id, text)` updates; missing ids are skipped. Returns the
/// number of elements updated.
pub fn set_texts(doc: &mut Document, updates: &[(&str, &str)]) -> usize {
    updates
        .iter()
        .filter(|(id, text)| set_text(doc, id, text))
        .count()
}

/// Replace the children of the element with `id`. Returns `false` if missing.
pub fn set_content(doc: &mut Document, id: &str, html: &Html) -> bool {
    match element(doc, id) {
        Some(node) => {
            doc.replace_children(node, html);
            true
        }
        None => false,
    }
}

/// Listen on `container` for `kind` events whose target is, or sits inside,
/// an element matching `selector` within the container. The handler receives
/// the matched element.
///
/// Because the listener lives on the container, it keeps working when the
/// container's children are re-rendered.
pub fn delegate<F>(
    doc: &Document,
    container: NodeId,
    kind: EventKind,
    selector: Selector,
    signal: Option<&AbortSignal>,
    handler: F,
) -> ListenerId
where
    F: Fn(&EventContext<'_>, NodeId) + 'static,
{
    doc.add_event_listener(
        container,
        kind,
        Rc::new(move |ctx: &EventContext<'_>| {
            let Some(matched) = ctx.doc.closest(ctx.target(), &selector) else {
                return;
            };
            if matched != container && ctx.doc.contains(container, matched) {
                handler(ctx, matched);
            }
        }),
        signal.cloned(),
    )
}

/// Parse the leading number of `input` the way form fields are read:
/// surrounding whitespace and trailing junk are ignored, and anything that
/// does not start with a finite number yields `0.0`.
#[must_use]
pub fn parse_number(input: &str) -> f64 {
    let s = input.trim_start();
    let b = s.as_bytes();
    let mut end = 0;
    if end < b.len() && (b[end] == b'+' || b[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < b.len() && b[end] == b'.' {
        end += 1;
        let frac_start = end;
        while end < b.len() && b[end].is_ascii_digit() {
            end += 1;
        }
        digits += end - frac_start;
    }
    if digits == 0 {
        return 0.0;
    }
    if end < b.len() && (b[end] == b'e' || b[end] == b'E') {
        let mut e = end + 1;
        if e < b.len() && (b[e] == b'+' || b[e] == b'-') {
            e += 1;
        }
        let exp_start = e;
        while e < b.len() && b[e].is_ascii_digit() {
            e += 1;
        }
        if e > exp_start {
            end = e;
        }
    }
    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Format with exactly `decimals` places; negative zero prints as zero.
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    let out = format!("{value:.decimals$}");
    if out.starts_with('-') && out[1..].chars().all(|c| c == '0' || c == '.') {
        out[1..].to_string()
    } else {
        out
    }
}

/// Format with at most `max_decimals` places and no trailing zeros.
#[must_use]
pub fn format_trimmed(value: f64, max_decimals: usize) -> String {
    let fixed = format_fixed(value, max_decimals);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Place a popup of `size` next to `anchor` inside `viewport`.
///
/// The popup sits below the anchor, left-aligned with it. It flips above the
/// anchor when it would overflow the bottom edge and there is room above,
/// and is clamped horizontally to stay [`POPUP_MARGIN`] inside the viewport.
#[must_use]
pub fn place_popup(anchor: Rect, size: Size, viewport: Rect) -> Point {
    let below = anchor.bottom() + POPUP_GAP;
    let above = anchor.y - POPUP_GAP - size.height;
    let fits_below = below + size.height <= viewport.bottom() - POPUP_MARGIN;
    let fits_above = above >= viewport.y + POPUP_MARGIN;
    let y = if !fits_below && fits_above { above } else { below };

    let max_x = viewport.right() - POPUP_MARGIN - size.width;
    let x = anchor.x.min(max_x).max(viewport.x + POPUP_MARGIN);
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_core::event::DomEvent;
    use lather_core::html::el;
    use std::cell::RefCell;

    #[test]
    fn parse_number_reads_leading_numeric_prefix() {
        assert_eq!(parse_number("300"), 300.0);
        assert_eq!(parse_number("  12.5g"), 12.5);
        assert_eq!(parse_number("-.5"), -0.5);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("1e"), 1.0);
        assert_eq!(parse_number("5."), 5.0);
    }

    #[test]
    fn parse_number_defaults_to_zero() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("."), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("1e999"), 0.0);
    }

    #[test]
    fn format_fixed_rounds_and_normalizes_negative_zero() {
        assert_eq!(format_fixed(60.0, 1), "60.0");
        assert_eq!(format_fixed(500.0, 2), "500.00");
        assert_eq!(format_fixed(-0.0001, 1), "0.0");
        assert_eq!(format_fixed(-1.26, 1), "-1.3");
    }

    #[test]
    fn format_trimmed_drops_trailing_zeros() {
        assert_eq!(format_trimmed(300.0, 2), "300");
        assert_eq!(format_trimmed(12.50, 2), "12.5");
        assert_eq!(format_trimmed(0.126, 2), "0.13");
    }

    #[test]
    fn batch_text_updates_skip_missing() {
        let mut doc = Document::from_html(&Html::fragment([
            el("span").id("a"),
            el("span").id("b"),
        ]));
        let n = set_texts(&mut doc, &[("a", "1"), ("missing", "x"), ("b", "2")]);
        assert_eq!(n, 2);
        let a = doc.get_element_by_id("a").unwrap();
        assert_eq!(doc.text_content(a), "1");
    }

    #[test]
    fn delegate_matches_inside_container_only() {
        let doc = Document::from_html(&Html::fragment([
            el("div")
                .id("list")
                .child(el("button").class("remove").child(el("span").id("icon"))),
            el("button").class("remove").id("outside"),
        ]));
        let list = doc.get_element_by_id("list").unwrap();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = Rc::clone(&hits);
        delegate(
            &doc,
            list,
            EventKind::Click,
            Selector::class("remove"),
            None,
            move |ctx, matched| h.borrow_mut().push((ctx.target(), matched)),
        );
        let icon = doc.get_element_by_id("icon").unwrap();
        doc.dispatch(&DomEvent::click(icon));
        let outside = doc.get_element_by_id("outside").unwrap();
        doc.dispatch(&DomEvent::click(outside));
        let hits = hits.borrow();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, icon);
        assert_eq!(doc.tag(hits[0].1), Some("button"));
    }

    #[test]
    fn popup_sits_below_anchor_when_it_fits() {
        let p = place_popup(
            Rect::new(100, 100, 50, 20),
            Size::new(200, 80),
            Rect::from_size(1024, 768),
        );
        assert_eq!(p, Point::new(100, 126));
    }

    #[test]
    fn popup_flips_above_near_bottom() {
        let p = place_popup(
            Rect::new(100, 700, 50, 20),
            Size::new(200, 80),
            Rect::from_size(1024, 768),
        );
        assert_eq!(p, Point::new(100, 614));
    }

    #[test]
    fn popup_clamps_horizontally() {
        let viewport = Rect::from_size(400, 768);
        let right = place_popup(Rect::new(390, 10, 5, 10), Size::new(200, 50), viewport);
        assert_eq!(right.x, 400 - POPUP_MARGIN - 200);
        let left = place_popup(Rect::new(-20, 10, 5, 10), Size::new(200, 50), viewport);
        assert_eq!(left.x, POPUP_MARGIN);
    }
}
