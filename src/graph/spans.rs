//! Overlap resolution for annotated entity spans.
//!
//! Annotation sources routinely emit spans that nest or straddle each other
//! inside a single sentence. Graph construction needs a non-overlapping set,
//! since a token can only be contracted into one entity node.
use std::collections::{BTreeMap, BTreeSet};

/// Half-open character interval `[start, end)` within a sentence.
pub type Span = (usize, usize);

/// True if some span in `set` fully contains `span`.
fn contained_in(set: &BTreeSet<Span>, span: Span) -> bool {
    set.iter()
        .any(|other| span.0 >= other.0 && span.1 <= other.1)
}

/// True if either endpoint of `span` falls inside a span of `set`.
fn partially_in(set: &BTreeSet<Span>, span: Span) -> bool {
    set.iter().any(|other| {
        (span.0 >= other.0 && span.0 <= other.1) || (span.1 >= other.0 && span.1 <= other.1)
    })
}

/// Removes overlapping spans in place.
///
/// Spans are visited in ascending `(start, end)` order. A span fully
/// contained in another surviving span is dropped (the outer one is kept);
/// otherwise a span that partially overlaps another is dropped. Containment
/// is checked against the currently surviving spans, while the
/// partial-overlap check runs against a snapshot of the input that is
/// pruned only as spans get removed by that same check, so one straddling
/// span does not take its whole neighborhood down with it.
///
/// After resolution no two surviving spans contain or partially overlap
/// each other, and running the resolver again removes nothing.
pub fn remove_overlapping<V>(spans: &mut BTreeMap<Span, V>) {
    let initial: Vec<Span> = spans.keys().copied().collect();
    let mut snapshot: BTreeSet<Span> = initial.iter().copied().collect();

    for span in initial {
        let surviving: BTreeSet<Span> = spans.keys().copied().filter(|s| *s != span).collect();
        let mut snapshot_others = snapshot.clone();
        snapshot_others.remove(&span);

        if contained_in(&surviving, span) {
            spans.remove(&span);
        } else if partially_in(&snapshot_others, span) {
            spans.remove(&span);
            snapshot.remove(&span);
        }
    }
}
