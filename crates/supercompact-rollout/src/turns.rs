//! Grouping of parsed records into alternating user/system turns.

use crate::record::{Record, RecordKind};
use crate::schema::ResponseItemPayload;
use crate::text::record_text;
use crate::transcript::{Role, Turn};

struct OpenTurn {
    role: Role,
    records: Vec<usize>,
}

/// Walk records in order and group them into turns.
///
/// - A `response_item` with an end-user message role contributes to a user
///   turn; everything else contributes to the next system turn. Consecutive
///   records of the same logical role coalesce.
/// - `turn_context` records attach forward to the turn of the next
///   `response_item`.
/// - Opaque records join the currently open turn, or attach forward when no
///   turn is open.
/// - A `compacted` record terminates any open turn and becomes its own
///   one-record system turn, marked as a compaction marker.
/// - `session_meta` and `event_msg` never join a turn.
pub fn group(records: &[Record]) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();
    let mut open: Option<OpenTurn> = None;
    let mut pending: Vec<usize> = Vec::new();

    let flush = |turns: &mut Vec<Turn>, open: &mut Option<OpenTurn>| {
        if let Some(turn) = open.take() {
            push_turn(turns, turn.role, turn.records, false, records);
        }
    };

    for (idx, record) in records.iter().enumerate() {
        match &record.kind {
            RecordKind::SessionMeta(_) | RecordKind::EventMsg(_) => {}

            RecordKind::TurnContext(_) => pending.push(idx),

            RecordKind::Other => match open.as_mut() {
                Some(turn) => turn.records.push(idx),
                None => pending.push(idx),
            },

            RecordKind::Compacted(_) => {
                flush(&mut turns, &mut open);
                push_turn(&mut turns, Role::System, vec![idx], true, records);
            }

            RecordKind::ResponseItem(item) => {
                let role = match &item.payload {
                    ResponseItemPayload::Message(msg) if msg.role == "user" => Role::User,
                    _ => Role::System,
                };

                let continues_open = matches!(&open, Some(turn) if turn.role == role);
                if continues_open {
                    let turn = open.as_mut().expect("checked above");
                    turn.records.append(&mut pending);
                    turn.records.push(idx);
                } else {
                    flush(&mut turns, &mut open);
                    let mut span = std::mem::take(&mut pending);
                    span.push(idx);
                    open = Some(OpenTurn {
                        role,
                        records: span,
                    });
                }
            }
        }
    }

    flush(&mut turns, &mut open);
    turns
}

fn push_turn(
    turns: &mut Vec<Turn>,
    role: Role,
    record_indices: Vec<usize>,
    is_compaction_marker: bool,
    records: &[Record],
) {
    let text = record_indices
        .iter()
        .filter_map(|&i| record_text(&records[i].kind))
        .collect::<Vec<_>>()
        .join("\n");

    turns.push(Turn {
        index: turns.len(),
        role,
        records: record_indices,
        text,
        tokens: 0,
        is_compaction_marker,
    });
}
