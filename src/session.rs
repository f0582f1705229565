//!
//! Editing session.
//!

use crate::buffer::MaskBuffer;
use crate::mask::InputMask;
use crate::mask_op;
use crate::{upos_type, Selection};

/// Rendered value and caret after a session operation. The host writes
/// both back to whatever displays the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub value: String,
    pub caret: upos_type,
}

/// One editing session over a masked value.
///
/// Owns the compiled mask, the buffer, the selection and the focus
/// flag. Every operation runs a pure function from [mask_op] and
/// commits the result, then reports the rendered value and the caret.
///
/// Without a mask the session is pass-through: [MaskSession::set_value]
/// and [MaskSession::value] work on the raw string, the edit operations
/// leave it alone and the host edits natively.
///
/// The session is single-writer. Embedded in a threaded host, the
/// caller serializes access, there is no interior locking.
#[derive(Debug, Clone)]
pub struct MaskSession {
    mask: Option<InputMask>,
    buffer: MaskBuffer,
    selection: Selection,
    focused: bool,
    // pass-through value while no mask is set.
    raw: String,
}

impl MaskSession {
    /// New session with a blank buffer for the mask.
    pub fn new(mask: InputMask) -> Self {
        let buffer = MaskBuffer::new(&mask);
        Self {
            mask: Some(mask),
            buffer,
            selection: Selection::caret(0),
            focused: false,
            raw: String::new(),
        }
    }

    /// The active mask.
    pub fn mask(&self) -> Option<&InputMask> {
        self.mask.as_ref()
    }

    /// The buffer.
    pub fn buffer(&self) -> &MaskBuffer {
        &self.buffer
    }

    /// Rendered value under the current focus/placeholder policy.
    pub fn value(&self) -> String {
        match &self.mask {
            Some(mask) => mask_op::render(mask, &self.buffer, self.focused),
            None => self.raw.clone(),
        }
    }

    /// The filled chars only, without literals and placeholders.
    pub fn raw_value(&self) -> String {
        match &self.mask {
            Some(_) => self.buffer.filled_chars(),
            None => self.raw.clone(),
        }
    }

    /// Caret position, the start of the selection.
    pub fn caret(&self) -> upos_type {
        self.selection.start
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection. Out of range positions are clamped, a
    /// reversed range is swapped.
    pub fn set_selection(&mut self, start: upos_type, end: upos_type) {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        self.selection = Selection::new(start, end).clamp(self.max_pos());
    }

    /// Set the caret, extending the selection from its current start
    /// when extend is set.
    pub fn set_cursor(&mut self, pos: upos_type, extend: bool) {
        if extend {
            self.set_selection(self.selection.start, pos);
        } else {
            self.set_selection(pos, pos);
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The field gained focus. Snaps the caret: first editable position
    /// for a blank value, after the filled part otherwise, untouched
    /// when the content reaches the buffer end.
    pub fn focus_gained(&mut self) -> EditOutcome {
        self.focused = true;
        if let Some(mask) = &self.mask {
            let caret = mask_op::focus_caret(mask, &self.buffer, self.selection.start);
            self.selection = Selection::caret(caret);
        }
        self.outcome()
    }

    /// The field lost focus. Only switches the rendering policy, the
    /// caret stays.
    pub fn focus_lost(&mut self) -> EditOutcome {
        self.focused = false;
        self.outcome()
    }

    /// Insert one typed char at the selection.
    pub fn insert_char(&mut self, c: char) -> EditOutcome {
        let Some(mask) = &self.mask else {
            return self.outcome();
        };
        let edit = mask_op::insert_char(mask, &self.buffer, self.selection, c);
        self.commit(edit)
    }

    /// Insert typed text, stopping at the first char that doesn't fit.
    pub fn insert_str(&mut self, text: &str) -> EditOutcome {
        let Some(mask) = &self.mask else {
            return self.outcome();
        };
        let edit = mask_op::insert_str(mask, &self.buffer, self.selection, text);
        self.commit(edit)
    }

    /// Backspace at the selection.
    pub fn remove_prev(&mut self) -> EditOutcome {
        let Some(mask) = &self.mask else {
            return self.outcome();
        };
        let edit = mask_op::remove_prev(mask, &self.buffer, self.selection);
        self.commit(edit)
    }

    /// Forward delete at the selection.
    pub fn remove_next(&mut self) -> EditOutcome {
        let Some(mask) = &self.mask else {
            return self.outcome();
        };
        let edit = mask_op::remove_next(mask, &self.buffer, self.selection);
        self.commit(edit)
    }

    /// Clear a range. Out of range positions are clamped.
    pub fn remove_range(&mut self, start: upos_type, end: upos_type) -> EditOutcome {
        let Some(mask) = &self.mask else {
            return self.outcome();
        };
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let edit = mask_op::remove_range(mask, &self.buffer, Selection::new(start, end));
        self.commit(edit)
    }

    /// Paste text over the selection. Tolerant of chars that don't fit.
    pub fn paste(&mut self, text: &str) -> EditOutcome {
        let Some(mask) = &self.mask else {
            return self.outcome();
        };
        let edit = mask_op::paste(mask, &self.buffer, self.selection, text);
        self.commit(edit)
    }

    /// Replace the whole content. Accepts raw strings as well as
    /// previously rendered values.
    pub fn set_value(&mut self, text: &str) -> EditOutcome {
        match &self.mask {
            Some(mask) => {
                let edit = mask_op::set_value(mask, &self.buffer, text);
                self.commit(edit)
            }
            None => {
                self.raw = text.to_string();
                let caret = self.raw.chars().count() as upos_type;
                self.selection = Selection::caret(caret);
                self.outcome()
            }
        }
    }

    /// Change or disable the mask.
    ///
    /// A new mask takes over as much of the current content as still
    /// validates, the caret keeps its position clamped to the new
    /// length. None disables masking: the value becomes the raw filled
    /// content and passes through unmodified from then on.
    pub fn set_mask(&mut self, mask: Option<InputMask>) -> EditOutcome {
        match mask {
            Some(mask) => {
                let buffer = match &self.mask {
                    Some(_) => mask_op::reapply(&mask, &self.buffer),
                    None => {
                        let blank = MaskBuffer::new(&mask);
                        mask_op::set_value(&mask, &blank, &self.raw).buffer
                    }
                };
                let caret = self.selection.start;
                self.mask = Some(mask);
                self.raw.clear();
                self.commit(mask_op::Edit { buffer, caret })
            }
            None => {
                if self.mask.is_some() {
                    self.raw = self.buffer.filled_chars();
                }
                self.mask = None;
                self.buffer = MaskBuffer::empty();
                let caret = self.selection.start.min(self.max_pos());
                self.selection = Selection::caret(caret);
                self.outcome()
            }
        }
    }

    // Largest valid position.
    fn max_pos(&self) -> upos_type {
        match &self.mask {
            Some(_) => self.buffer.len(),
            None => self.raw.chars().count() as upos_type,
        }
    }

    // Take over an edit result. Clamps the caret into the buffer, and
    // into the rendered value in shift mode, where the truncated value
    // can't host a caret beyond its end.
    fn commit(&mut self, edit: mask_op::Edit) -> EditOutcome {
        self.buffer = edit.buffer;
        let mut caret = edit.caret.min(self.buffer.len());
        if let Some(mask) = &self.mask {
            if mask.mask_char().is_none() {
                let shown = mask_op::render(mask, &self.buffer, self.focused)
                    .chars()
                    .count() as upos_type;
                caret = caret.min(shown);
            }
        }
        self.selection = Selection::caret(caret);
        self.outcome()
    }

    fn outcome(&self) -> EditOutcome {
        EditOutcome {
            value: self.value(),
            caret: self.selection.start,
        }
    }
}
