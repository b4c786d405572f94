use std::cmp::Ordering;

use enhancer_logging::enhancer_debug;

use super::{data_rows, header_cells, row_container, virtualize, ATTR_SORT_TYPE};
use crate::{Document, EnhancerState, Effect, NodeId};

const CLASS_SORTABLE: &str = "sortable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn after(previous: Option<SortDirection>) -> Self {
        match previous {
            Some(SortDirection::Ascending) => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    fn class(self) -> &'static str {
        match self {
            SortDirection::Ascending => "sorted-asc",
            SortDirection::Descending => "sorted-desc",
        }
    }

    fn aria(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SortHeader {
    pub table: NodeId,
    pub column: usize,
    pub numeric: bool,
    pub direction: Option<SortDirection>,
}

pub(super) fn arm(state: &mut EnhancerState, table: NodeId) {
    for header in header_cells(&state.doc, table) {
        if state.sort_headers.contains_key(&header) {
            continue;
        }
        let Some(column) = state.doc.element_index(header) else {
            continue;
        };
        let numeric = state
            .doc
            .attr(header, ATTR_SORT_TYPE)
            .map(|kind| {
                let kind = kind.trim();
                kind.eq_ignore_ascii_case("number") || kind.eq_ignore_ascii_case("numeric")
            })
            .unwrap_or(false);
        state.doc.add_class(header, CLASS_SORTABLE);
        state.sort_headers.insert(
            header,
            SortHeader {
                table,
                column,
                numeric,
                direction: None,
            },
        );
    }
}

/// Sorts the header's table by its column. Returns `false` when `header` is not sortable.
pub(crate) fn on_header_click(
    state: &mut EnhancerState,
    header: NodeId,
    effects: &mut Vec<Effect>,
) -> bool {
    let Some(entry) = state.sort_headers.get(&header).cloned() else {
        return false;
    };
    let direction = SortDirection::after(entry.direction);
    enhancer_debug!(
        "sorting table {:?} by column {} ({:?})",
        entry.table,
        entry.column,
        direction
    );

    let windowed = state
        .virtual_tables
        .iter()
        .find(|(_, vt)| vt.shell == entry.table)
        .map(|(container, _)| *container);
    match windowed {
        Some(container) => {
            let rows = state
                .virtual_tables
                .get(&container)
                .map(|vt| vt.rows.clone())
                .unwrap_or_default();
            let ordered = order_rows(&state.doc, rows, entry.column, entry.numeric, direction);
            if let Some(vt) = state.virtual_tables.get_mut(&container) {
                vt.rows = ordered;
            }
            virtualize::render(state, container, effects);
        }
        None => {
            let body = row_container(&state.doc, entry.table);
            let rows = data_rows(&state.doc, entry.table);
            let ordered = order_rows(&state.doc, rows, entry.column, entry.numeric, direction);
            for row in ordered {
                state.doc.append_child(body, row);
            }
        }
    }

    let siblings: Vec<NodeId> = state
        .sort_headers
        .iter()
        .filter(|(_, h)| h.table == entry.table)
        .map(|(id, _)| *id)
        .collect();
    for id in siblings {
        if let Some(h) = state.sort_headers.get_mut(&id) {
            h.direction = (id == header).then_some(direction);
        }
        state.doc.remove_class(id, SortDirection::Ascending.class());
        state.doc.remove_class(id, SortDirection::Descending.class());
        state.doc.remove_attr(id, "aria-sort");
    }
    state.doc.add_class(header, direction.class());
    state.doc.set_attr(header, "aria-sort", direction.aria());
    state.mark_dirty();
    true
}

enum SortKey {
    Number(Option<f64>),
    Text { folded: String, raw: String },
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number(a), SortKey::Number(b)) => match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        (
            SortKey::Text { folded, raw },
            SortKey::Text {
                folded: other_folded,
                raw: other_raw,
            },
        ) => folded.cmp(other_folded).then_with(|| raw.cmp(other_raw)),
        (SortKey::Number(_), SortKey::Text { .. }) => Ordering::Less,
        (SortKey::Text { .. }, SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Stable ascending order by the column's key; descending is the exact reverse of it.
pub(crate) fn order_rows(
    doc: &Document,
    rows: Vec<NodeId>,
    column: usize,
    numeric: bool,
    direction: SortDirection,
) -> Vec<NodeId> {
    let mut keyed: Vec<(SortKey, NodeId)> = rows
        .into_iter()
        .map(|row| {
            let text = cell_text(doc, row, column);
            let key = if numeric {
                SortKey::Number(parse_number(&text))
            } else {
                SortKey::Text {
                    folded: text.to_lowercase(),
                    raw: text,
                }
            };
            (key, row)
        })
        .collect();
    keyed.sort_by(|a, b| compare_keys(&a.0, &b.0));
    let mut ordered: Vec<NodeId> = keyed.into_iter().map(|(_, row)| row).collect();
    if direction == SortDirection::Descending {
        ordered.reverse();
    }
    ordered
}

fn cell_text(doc: &Document, row: NodeId, column: usize) -> String {
    doc.element_children(row)
        .get(column)
        .map(|cell| doc.text_content(*cell).trim().to_string())
        .unwrap_or_default()
}

/// Longest leading number in `text`, ignoring thousands separators.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let end = numeric_prefix_len(cleaned.as_bytes());
    if end == 0 {
        return None;
    }
    cleaned[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Length of the `[+-]digits[.digits][e[+-]digits]` prefix, or 0 without mantissa digits.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if whole + fraction > 0 {
            end += 1 + fraction;
        }
    }
    if whole + fraction == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    end
}
