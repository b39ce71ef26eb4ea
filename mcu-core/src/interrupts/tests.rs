use super::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case(InterruptSource::FrtCompareA(0), 4)]
#[test_case(InterruptSource::FrtCompareB(0), 5)]
#[test_case(InterruptSource::FrtOverflow(0), 6)]
#[test_case(InterruptSource::FrtCompareA(1), 8)]
#[test_case(InterruptSource::FrtOverflow(2), 14)]
#[test_case(InterruptSource::TimerCompareA, 15)]
#[test_case(InterruptSource::TimerCompareB, 16)]
#[test_case(InterruptSource::TimerOverflow, 17)]
fn test_line_numbers(source: InterruptSource, line: u8) {
    assert_eq!(source.line(), line);
}

#[test]
fn test_reassert_counts_one_edge() {
    let mut lines = InterruptLines::new();

    lines.set(InterruptSource::FrtOverflow(1), true);
    lines.set(InterruptSource::FrtOverflow(1), true);
    lines.set(InterruptSource::FrtOverflow(1), true);

    assert!(lines.is_asserted(InterruptSource::FrtOverflow(1)));
    assert_eq!(lines.rising_edges(InterruptSource::FrtOverflow(1)), 1);
    assert_eq!(lines.pending(), 1 << 10);
}

#[test]
fn test_deassert_then_assert_counts_again() {
    let mut lines = InterruptLines::new();

    lines.set_request(InterruptSource::TimerCompareA, true);
    lines.set_request(InterruptSource::TimerCompareA, false);
    assert!(!lines.is_asserted(InterruptSource::TimerCompareA));

    lines.set_request(InterruptSource::TimerCompareA, true);
    assert_eq!(lines.rising_edges(InterruptSource::TimerCompareA), 2);
}

#[test]
fn test_lines_are_independent() {
    let mut lines = InterruptLines::new();

    lines.set(InterruptSource::FrtCompareA(0), true);
    lines.set(InterruptSource::FrtCompareB(0), false);

    assert!(lines.is_asserted(InterruptSource::FrtCompareA(0)));
    assert!(!lines.is_asserted(InterruptSource::FrtCompareB(0)));
    assert_eq!(lines.rising_edges(InterruptSource::FrtCompareB(0)), 0);
}
