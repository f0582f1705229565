//!
//! Edit operations.
//!
//! Everything here is a pure function over (mask, buffer, selection).
//! The buffer is cloned, modified and handed back in an [Edit] together
//! with the new caret, the caller commits the result. [crate::MaskSession]
//! does exactly that.
//!

use crate::buffer::{Cell, MaskBuffer};
use crate::mask::{InputMask, Slot};
use crate::{upos_type, Selection};
#[allow(unused_imports)]
use log::debug;
use std::iter::once;
use unicode_segmentation::UnicodeSegmentation;

/// Buffer and caret after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub buffer: MaskBuffer,
    pub caret: upos_type,
}

/// Insert one typed char at the selection.
///
/// A range selection is cleared first, and stays cleared even if the
/// char then fails validation. The char goes to the nearest editable
/// position at or after the caret, on success the caret advances to the
/// next editable position after it, or to the buffer end.
pub fn insert_char(mask: &InputMask, buf: &MaskBuffer, sel: Selection, c: char) -> Edit {
    check_len(mask, buf);
    let sel = sel.clamp(buf.len());

    let mut buf = buf.clone();
    if !sel.is_empty() {
        clear_range(mask, &mut buf, sel);
    }
    let caret = insert_one(mask, &mut buf, sel.start, c).unwrap_or(sel.start);
    Edit { buffer: buf, caret }
}

/// Insert typed text char by char.
///
/// Follows the insert_char rule per char and stops at the first char
/// that fails validation at its target slot. The rest of the text is
/// discarded. For tolerant placement use [paste].
pub fn insert_str(mask: &InputMask, buf: &MaskBuffer, sel: Selection, text: &str) -> Edit {
    check_len(mask, buf);
    let sel = sel.clamp(buf.len());

    let mut buf = buf.clone();
    if !sel.is_empty() {
        clear_range(mask, &mut buf, sel);
    }
    let mut caret = sel.start;
    for c in input_chars(text) {
        let Some(c) = c else {
            break;
        };
        match insert_one(mask, &mut buf, caret, c) {
            Some(p) => caret = p,
            None => break,
        }
    }
    Edit { buffer: buf, caret }
}

/// Backspace. A range selection collapses like [remove_range].
///
/// For a caret: clears the nearest editable position before it, the
/// caret lands on the cleared position. No editable position before the
/// caret is a no-op.
pub fn remove_prev(mask: &InputMask, buf: &MaskBuffer, sel: Selection) -> Edit {
    check_len(mask, buf);
    let sel = sel.clamp(buf.len());

    let mut buf = buf.clone();
    if !sel.is_empty() {
        clear_range(mask, &mut buf, sel);
        return Edit {
            buffer: buf,
            caret: sel.start,
        };
    }

    let Some(pos) = mask.prev_editable(sel.start) else {
        return Edit {
            buffer: buf,
            caret: sel.start,
        };
    };
    delete_at(mask, &mut buf, pos);
    Edit { buffer: buf, caret: pos }
}

/// Forward delete. A range selection collapses like [remove_range].
///
/// A caret inside the literal prefix only moves to the first editable
/// position, nothing is cleared. Otherwise the nearest editable
/// position at or after the caret is cleared and the caret lands there.
pub fn remove_next(mask: &InputMask, buf: &MaskBuffer, sel: Selection) -> Edit {
    check_len(mask, buf);
    let sel = sel.clamp(buf.len());

    let mut buf = buf.clone();
    if !sel.is_empty() {
        clear_range(mask, &mut buf, sel);
        return Edit {
            buffer: buf,
            caret: sel.start,
        };
    }

    if let Some(first) = mask.first_editable() {
        if sel.start < first {
            return Edit {
                buffer: buf,
                caret: first,
            };
        }
    }
    let Some(pos) = mask.next_editable(sel.start) else {
        return Edit {
            buffer: buf,
            caret: sel.start,
        };
    };
    delete_at(mask, &mut buf, pos);
    Edit { buffer: buf, caret: pos }
}

/// Clear a range. The caret lands on the range start.
pub fn remove_range(mask: &InputMask, buf: &MaskBuffer, range: Selection) -> Edit {
    check_len(mask, buf);
    let range = range.clamp(buf.len());

    let mut buf = buf.clone();
    if !range.is_empty() {
        clear_range(mask, &mut buf, range);
    }
    Edit {
        buffer: buf,
        caret: range.start,
    }
}

/// Paste text over the selection.
///
/// Tolerant placement: a char that fails validation at its slot is
/// dropped and the slot tries the next char, a char equal to the
/// placeholder clears its slot, a char equal to a literal is consumed
/// with it. The caret lands after the last consumed char, moved to the
/// next editable position when that is a literal.
pub fn paste(mask: &InputMask, buf: &MaskBuffer, sel: Selection, text: &str) -> Edit {
    check_len(mask, buf);
    let sel = sel.clamp(buf.len());

    let mut buf = buf.clone();
    if !sel.is_empty() {
        clear_range(mask, &mut buf, sel);
    }
    let caret = paste_at(mask, &mut buf, sel.start, text);
    Edit { buffer: buf, caret }
}

/// Replace the whole content. Same as pasting over everything.
pub fn set_value(mask: &InputMask, buf: &MaskBuffer, text: &str) -> Edit {
    paste(mask, buf, Selection::new(0, buf.len()), text)
}

/// Re-apply content to a new mask.
///
/// Walks the old cells in order, literals and filled chars as text,
/// empty cells as the new placeholder, and runs tolerant placement into
/// a blank buffer of the new mask. Content that no longer fits is
/// dropped, the unfilled tail stays empty. Re-applying the same mask to
/// its own buffer reproduces it.
pub fn reapply(new_mask: &InputMask, old: &MaskBuffer) -> MaskBuffer {
    let walk: String = old
        .cells()
        .iter()
        .filter_map(|cell| match cell {
            Cell::Literal(c) | Cell::Filled(c) => Some(*c),
            Cell::Empty => new_mask.mask_char(),
        })
        .collect();

    let mut buf = MaskBuffer::new(new_mask);
    place_str(new_mask, &mut buf, 0, &walk, true);
    buf
}

/// Caret position when the field gains focus.
///
/// Blank buffer: the first editable position. Content that does not
/// reach the buffer end: the next editable position after the filled
/// part. Content up to the end: the caret keeps its position.
pub fn focus_caret(mask: &InputMask, buf: &MaskBuffer, caret: upos_type) -> upos_type {
    check_len(mask, buf);

    if buf.is_blank() {
        mask.first_editable().unwrap_or_else(|| caret.min(mask.len()))
    } else if buf.filled_end() < mask.len() {
        mask.next_editable(buf.filled_end()).unwrap_or(mask.len())
    } else {
        caret.min(mask.len())
    }
}

/// Rendered value under the placeholder policy.
///
/// With a placeholder char the value renders full length, except for a
/// blank unfocused field without always_show, which renders empty.
/// Without one the value truncates after the last filled cell, a blank
/// field shows the literal prefix while focused.
pub fn render(mask: &InputMask, buf: &MaskBuffer, focused: bool) -> String {
    check_len(mask, buf);

    match mask.mask_char() {
        Some(mask_char) => {
            if buf.is_blank() && !focused && !mask.always_show() {
                String::new()
            } else {
                buf.render_full(mask_char)
            }
        }
        None => {
            if !buf.is_blank() {
                buf.render_truncated()
            } else if focused || mask.always_show() {
                buf.literal_prefix()
            } else {
                String::new()
            }
        }
    }
}

// mask/buffer length mismatch is a caller contract violation.
fn check_len(mask: &InputMask, buf: &MaskBuffer) {
    assert_eq!(mask.len(), buf.len());
}

// Graphemes of incoming text as chars. A multi-char grapheme can not
// fill a single-char slot and maps to None.
fn input_chars(text: &str) -> impl Iterator<Item = Option<char>> + '_ {
    text.graphemes(true).map(|g| {
        let mut it = g.chars();
        match (it.next(), it.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    })
}

// Single char insert at the caret. Returns the advanced caret, or None
// if the char fails validation at its target slot.
//
// Placeholder mode overwrites the target slot. Shift mode inserts while
// the buffer is not complete: the filled tail from the target position
// is re-placed behind the char, whatever runs over the end is dropped.
fn insert_one(
    mask: &InputMask,
    buf: &mut MaskBuffer,
    caret: upos_type,
    c: char,
) -> Option<upos_type> {
    let mut pos = mask.next_editable(caret)?;

    if mask.mask_char().is_none() && !buf.is_complete() {
        // can't start typing past the visible end
        if let Some(append) = mask.next_editable(buf.filled_end()) {
            pos = pos.min(append);
        }
        if !mask.accepts(pos, c) {
            return None;
        }
        let tail: String = once(c).chain(buf.filled_chars_from(pos).chars()).collect();
        buf.clear_from(pos);
        place_str(mask, buf, pos, &tail, false);
    } else {
        if !mask.accepts(pos, c) {
            return None;
        }
        buf.fill(pos, c);
    }

    Some(mask.next_editable(pos + 1).unwrap_or(mask.len()))
}

// Clear one editable cell. Shift mode pulls the filled tail into the gap.
fn delete_at(mask: &InputMask, buf: &mut MaskBuffer, pos: upos_type) {
    if mask.mask_char().is_none() {
        let tail = buf.filled_chars_from(pos + 1);
        buf.clear_from(pos);
        place_str(mask, buf, pos, &tail, false);
    } else {
        buf.clear(pos);
    }
}

// remove_range core. Shift mode re-places the filled tail into the gap,
// leftover tail cells end up cleared.
fn clear_range(mask: &InputMask, buf: &mut MaskBuffer, range: Selection) {
    if mask.mask_char().is_none() {
        let tail = buf.filled_chars_from(range.end);
        buf.clear_from(range.start);
        place_str(mask, buf, range.start, &tail, false);
    } else {
        for pos in range.start..range.end {
            buf.clear(pos);
        }
    }
}

// Paste placement. Shift mode inserts while the buffer is not complete,
// otherwise the text overwrites with placeholder semantics enabled.
// Returns the caret.
fn paste_at(mask: &InputMask, buf: &mut MaskBuffer, start: upos_type, text: &str) -> upos_type {
    let placed = if mask.mask_char().is_none() && !buf.is_complete() {
        let start = start.min(buf.filled_end());
        let tail = buf.filled_chars_from(start);
        buf.clear_from(start);
        let placed = place_str(mask, buf, start, text, false);
        place_str(mask, buf, placed.next, &tail, false);
        placed
    } else {
        place_str(mask, buf, start, text, true)
    };

    match placed.end {
        Some(end) if end < mask.len() && !mask.is_editable(end) => {
            mask.next_editable(end).unwrap_or(mask.len())
        }
        Some(end) => end,
        None => start,
    }
}

struct Placement {
    // where the scan stopped, the next placement continues here.
    next: upos_type,
    // position after the last consumed char.
    end: Option<upos_type>,
}

// Tolerant left-to-right placement.
//
// At an editable slot the next input char is taken: placed if the class
// accepts it, dropped otherwise with the slot staying for the following
// char. With allow_mask, a char equal to the placeholder clears the
// slot instead. At a literal slot an input char equal to the literal is
// consumed with it, any other char skips the slot.
fn place_str(
    mask: &InputMask,
    buf: &mut MaskBuffer,
    from: upos_type,
    text: &str,
    allow_mask: bool,
) -> Placement {
    let mut input = input_chars(text).peekable();
    let mut pos = from;
    let mut end = None;
    let mut dropped = 0usize;

    while pos < mask.len() {
        let Some(&c) = input.peek() else {
            break;
        };
        match mask.slot(pos) {
            Slot::Literal(l) => {
                if c == Some(*l) {
                    input.next();
                    end = Some(pos + 1);
                }
                pos += 1;
            }
            Slot::Editable(class) => {
                input.next();
                match c {
                    Some(c) if allow_mask && mask.mask_char() == Some(c) => {
                        buf.clear(pos);
                        end = Some(pos + 1);
                        pos += 1;
                    }
                    Some(c) if class.is_valid(c) => {
                        buf.fill(pos, c);
                        end = Some(pos + 1);
                        pos += 1;
                    }
                    _ => {
                        dropped += 1;
                    }
                }
            }
        }
    }

    if dropped > 0 {
        debug!("placement dropped {} chars", dropped);
    }

    Placement { next: pos, end }
}
