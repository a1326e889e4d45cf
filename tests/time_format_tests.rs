use timetable_tool::{TimeFormatError, TimeSlot, format_display_label, format_time_label, generate_time_slots};

fn t(s: &str) -> TimeSlot {
    TimeSlot::parse(s).unwrap()
}

#[test]
fn default_range_produces_twenty_one_half_hour_slots() {
    let slots = generate_time_slots(&t("12:00"), &t("22:00"), 30).unwrap();
    assert_eq!(slots.len(), 21);
    assert_eq!(slots.first().unwrap().as_str(), "12:00");
    assert_eq!(slots[1].as_str(), "12:30");
    assert_eq!(slots.last().unwrap().as_str(), "22:00");
}

#[test]
fn generated_slots_are_strictly_increasing() {
    for (start, end, step) in [("00:00", "23:59", 7), ("08:15", "17:45", 45), ("09:00", "09:00", 60)] {
        let slots = generate_time_slots(&t(start), &t(end), step).unwrap();
        assert!(!slots.is_empty());
        assert!(
            slots.windows(2).all(|w| w[0] < w[1]),
            "slots for {start}-{end}/{step} not strictly increasing: {slots:?}"
        );
    }
}

#[test]
fn stops_before_passing_the_end() {
    let slots = generate_time_slots(&t("10:00"), &t("11:00"), 25).unwrap();
    let tokens: Vec<&str> = slots.iter().map(TimeSlot::as_str).collect();
    assert_eq!(tokens, vec!["10:00", "10:25", "10:50"]);
}

#[test]
fn end_before_start_yields_nothing() {
    let slots = generate_time_slots(&t("18:00"), &t("09:00"), 30).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn zero_step_is_rejected() {
    let err = generate_time_slots(&t("09:00"), &t("10:00"), 0).unwrap_err();
    assert_eq!(err, TimeFormatError::InvalidStep(0));
}

#[test]
fn noon_has_its_own_label() {
    assert_eq!(format_display_label(&t("12:00")), "12:00 ظهرًا");
}

#[test]
fn midnight_reads_as_twelve_am() {
    assert_eq!(format_display_label(&t("00:00")), "12:00 صباحًا");
}

#[test]
fn afternoon_is_converted_to_twelve_hour_clock() {
    assert_eq!(format_display_label(&t("14:30")), "02:30 مساءً");
    assert_eq!(format_display_label(&t("12:30")), "12:30 مساءً");
    assert_eq!(format_display_label(&t("09:05")), "09:05 صباحًا");
}

#[test]
fn twenty_four_hour_mode_keeps_the_token() {
    assert_eq!(format_time_label(&t("21:30"), false), "21:30");
    assert_eq!(format_time_label(&t("21:30"), true), "09:30 مساءً");
}

#[test]
fn generation_stays_within_two_digit_hours() {
    for (start, end, step) in [("98:00", "99:99", 25), ("99:00", "99:99", 30), ("99:59", "99:99", 1)] {
        let slots = generate_time_slots(&t(start), &t(end), step).unwrap();
        assert!(!slots.is_empty());
        assert!(slots.windows(2).all(|w| w[0] < w[1]), "{slots:?}");
        for slot in &slots {
            assert_eq!(TimeSlot::parse(slot.as_str()).as_ref(), Ok(slot));
            assert!(slot.as_str() <= "99:59", "{slot} is past the last slot");
        }
    }
    let slots = generate_time_slots(&t("99:00"), &t("99:99"), 30).unwrap();
    let tokens: Vec<&str> = slots.iter().map(TimeSlot::as_str).collect();
    assert_eq!(tokens, ["99:00", "99:30"]);
}
