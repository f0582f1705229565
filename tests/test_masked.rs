use textmask::mask::InputMask;
use textmask::MaskSession;

fn mask(pattern: &str) -> InputMask {
    InputMask::parse(pattern).expect("mask")
}

#[test]
fn test_format_value() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");
    assert_eq!(m.value(), "+7 (495) 315 64 54");
}

#[test]
fn test_format_unacceptable() {
    let mut m = MaskSession::new(mask("+7 (9a9) 999 99 99"));
    m.set_value("749531b6454");
    assert_eq!(m.value(), "+7 (4b6) 454 __ __");
}

#[test]
fn test_insert_char() {
    let mut m = MaskSession::new(mask("+7 (*a9) 999 99 99"));
    m.focus_gained();
    m.set_selection(0, 0);

    let out = m.insert_char('E');
    assert_eq!(out.value, "+7 (E__) ___ __ __");
    assert_eq!(out.caret, 5);

    // letter slot, stops here
    let out = m.insert_char('6');
    assert_eq!(out.value, "+7 (E__) ___ __ __");
    assert_eq!(out.caret, 5);

    let out = m.insert_char('x');
    assert_eq!(out.value, "+7 (Ex_) ___ __ __");
    assert_eq!(out.caret, 6);
}

#[test]
fn test_insert_first_editable() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    let out = m.focus_gained();
    assert_eq!(out.caret, 4);

    let out = m.insert_char('1');
    assert_eq!(out.value, "+7 (1__) ___ __ __");
    assert_eq!(out.caret, 5);
}

#[test]
fn test_insert_overwrite() {
    let mut m = MaskSession::new(mask("99"));
    m.set_value("12");
    m.set_selection(0, 0);
    let out = m.insert_char('9');
    assert_eq!(out.value, "92");
    assert_eq!(out.caret, 1);
}

#[test]
fn test_insert_selection() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");

    m.set_selection(4, 9);
    let out = m.insert_char('1');
    assert_eq!(out.value, "+7 (1__) 315 64 54");
    assert_eq!(out.caret, 5);

    // the range clear sticks even if the char doesn't fit
    m.set_selection(4, 9);
    let out = m.insert_char('x');
    assert_eq!(out.value, "+7 (___) 315 64 54");
    assert_eq!(out.caret, 4);
}

#[test]
fn test_insert_shift() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99").with_mask_char(None));
    m.focus_gained();
    m.set_value("+7 (111) 123 45 6");
    assert_eq!(m.value(), "+7 (111) 123 45 6");

    m.set_selection(4, 4);
    let out = m.insert_char('E');
    assert_eq!(out.value, "+7 (111) 123 45 6");

    let out = m.insert_char('6');
    assert_eq!(out.value, "+7 (611) 112 34 56");
    assert_eq!(out.caret, 5);
}

#[test]
fn test_insert_str() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.focus_gained();

    let out = m.insert_str("495");
    assert_eq!(out.value, "+7 (495) ___ __ __");
    assert_eq!(out.caret, 9);

    // typed input stops at the first char that doesn't fit
    let out = m.insert_str("31x64");
    assert_eq!(out.value, "+7 (495) 31_ __ __");
    assert_eq!(out.caret, 11);
}

#[test]
fn test_backspace() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");

    m.set_selection(10, 10);
    let out = m.remove_prev();
    assert_eq!(out.value, "+7 (495) _15 64 54");
    assert_eq!(out.caret, 9);

    let out = m.remove_prev();
    assert_eq!(out.value, "+7 (49_) _15 64 54");
    assert_eq!(out.caret, 6);

    // nothing editable before the first slot
    m.set_selection(4, 4);
    let out = m.remove_prev();
    assert_eq!(out.value, "+7 (49_) _15 64 54");
    assert_eq!(out.caret, 4);
}

#[test]
fn test_backspace_shift() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99").with_mask_char(None));
    m.set_value("74953156454");

    m.set_selection(10, 10);
    let out = m.remove_prev();
    assert_eq!(out.value, "+7 (495) 156 45 4");
    assert_eq!(out.caret, 9);
}

#[test]
fn test_backspace_range() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");

    m.set_selection(1, 10);
    let out = m.remove_prev();
    assert_eq!(out.value, "+7 (___) _15 64 54");
    assert_eq!(out.caret, 1);
}

#[test]
fn test_delete() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");

    // in the literal prefix: only the caret moves
    m.set_selection(0, 0);
    let out = m.remove_next();
    assert_eq!(out.value, "+7 (495) 315 64 54");
    assert_eq!(out.caret, 4);

    m.set_selection(7, 7);
    let out = m.remove_next();
    assert_eq!(out.value, "+7 (495) _15 64 54");
    assert_eq!(out.caret, 9);

    m.set_selection(11, 11);
    let out = m.remove_next();
    assert_eq!(out.value, "+7 (495) _1_ 64 54");
    assert_eq!(out.caret, 11);
}

#[test]
fn test_delete_shift() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99").with_mask_char(None));
    m.set_value("74953156454");

    m.set_selection(9, 9);
    let out = m.remove_next();
    assert_eq!(out.value, "+7 (495) 156 45 4");
    assert_eq!(out.caret, 9);
}

#[test]
fn test_delete_range() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");

    m.set_selection(1, 10);
    let out = m.remove_next();
    assert_eq!(out.value, "+7 (___) _15 64 54");
    assert_eq!(out.caret, 1);
}

#[test]
fn test_remove_range() {
    let mut m = MaskSession::new(mask("9999-9999-9999-9999"));
    m.set_value("34781226917");
    assert_eq!(m.value(), "3478-1226-917_-____");

    let out = m.remove_range(5, 9);
    assert_eq!(out.value, "3478-____-917_-____");
    assert_eq!(out.caret, 5);

    // clamped and swapped instead of rejected
    let out = m.remove_range(99, 15);
    assert_eq!(out.value, "3478-____-917_-____");
    assert_eq!(out.caret, 15);
}

#[test]
fn test_paste() {
    let mut m = MaskSession::new(mask("9999-9999-9999-9999"));
    m.set_value("____-____-____-6543");
    assert_eq!(m.value(), "____-____-____-6543");

    m.set_selection(3, 18);
    let out = m.paste("34781226917");
    assert_eq!(out.value, "___3-4781-2269-17_3");
    assert_eq!(out.caret, 17);

    // placeholders clear their slot, literals align
    m.set_selection(3, 3);
    let out = m.paste("3-__81-2_6917");
    assert_eq!(out.value, "___3-__81-2_69-17_3");
    assert_eq!(out.caret, 17);
}

#[test]
fn test_paste_shift() {
    let mut m = MaskSession::new(mask("9999-9999-9999-9999").with_mask_char(None));
    m.set_value("9999-9999-9999-9999");
    assert_eq!(m.value(), "9999-9999-9999-9999");

    m.set_selection(0, 19);
    let out = m.paste("34781226917");
    assert_eq!(out.value, "3478-1226-917");
    assert_eq!(out.caret, 13);

    // not complete: paste inserts and shifts the tail right
    m.set_selection(1, 1);
    let out = m.paste("12345");
    assert_eq!(out.value, "3123-4547-8122-6917");
    assert_eq!(out.caret, 7);

    // complete: paste overwrites
    m.set_selection(1, 1);
    let out = m.paste("4321");
    assert_eq!(out.value, "3432-1547-8122-6917");
    assert_eq!(out.caret, 6);
}

#[test]
fn test_paste_invalid() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_selection(4, 4);
    let out = m.paste("4x9y5z31");
    assert_eq!(out.value, "+7 (495) 31_ __ __");
    assert_eq!(out.caret, 11);
}

#[test]
fn test_delete_paste_roundtrip() {
    let mut m = MaskSession::new(mask("+7 (999) 999 99 99"));
    m.set_value("74953156454");

    m.remove_range(9, 15);
    assert_eq!(m.value(), "+7 (495) ___ __ 54");

    m.set_selection(9, 9);
    let out = m.paste("315 64");
    assert_eq!(out.value, "+7 (495) 315 64 54");
}

#[test]
fn test_mask_change() {
    let mut m = MaskSession::new(mask("9999-9999-9999-9999"));
    m.set_value("34781226917");

    m.set_mask(Some(mask("9999-999999-99999")));
    assert_eq!(m.value(), "3478-122691-7____");

    m.set_mask(Some(mask("9-9-9-9")));
    assert_eq!(m.value(), "3-4-7-8");

    let out = m.set_mask(None);
    assert_eq!(out.value, "3478");
    assert_eq!(m.raw_value(), "3478");

    // pass-through from here on
    let out = m.set_value("whatever");
    assert_eq!(out.value, "whatever");
    let out = m.insert_char('x');
    assert_eq!(out.value, "whatever");
}

#[test]
fn test_reapply_same_mask() {
    let m = mask("+7 (9a9) 999 99 99");
    let mut s = MaskSession::new(m.clone());
    s.set_value("749531b6454");
    assert_eq!(s.value(), "+7 (4b6) 454 __ __");

    let before = s.buffer().clone();
    let out = s.set_mask(Some(m));
    assert_eq!(s.buffer(), &before);
    assert_eq!(out.value, "+7 (4b6) 454 __ __");
}

#[test]
fn test_reapply_same_mask_shift() {
    let m = mask("+7 (999) 999 99 99").with_mask_char(None);
    let mut s = MaskSession::new(m.clone());
    s.set_value("7495315");
    assert_eq!(s.value(), "+7 (495) 315");

    let before = s.buffer().clone();
    s.set_mask(Some(m));
    assert_eq!(s.buffer(), &before);
}

#[test]
fn test_combining_grapheme() {
    let mut m = MaskSession::new(mask("aa"));
    m.focus_gained();
    // 'e' + combining acute is one grapheme and fits no single-char slot
    let out = m.paste("e\u{301}x");
    assert_eq!(out.value, "x_");
    assert_eq!(out.caret, 1);
}
