use super::*;
use crate::config::McuConfig;
use crate::interrupts::InterruptSource;
use crate::test_harness::{init_tracing, TestBus};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn timer_for(revision: Revision) -> Timer {
    init_tracing();
    let mut timer = Timer::new();
    timer.init(&Mcu::new(McuConfig::new(revision)));
    timer
}

/// Timer with every compare register parked out of the way.
fn quiet_timer(revision: Revision) -> (Timer, TestBus) {
    let mut timer = timer_for(revision);
    let mut bus = TestBus::new();
    for base in [0x10, 0x20, 0x30] {
        for reg in [0x04, 0x06] {
            timer.write(base + reg, 0x7F, &mut bus);
            timer.write(base + reg + 1, 0xFF, &mut bus);
        }
    }
    timer.write_tmr(TMR_TCORA, 0xFF, &mut bus);
    timer.write_tmr(TMR_TCORB, 0xFF, &mut bus);
    (timer, bus)
}

// --- Register access ---

#[test]
fn test_frc_write_goes_through_latch() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x12, 0x12, &mut bus);
    assert_eq!(timer.frt[0].frc, 0x0000);
    timer.write(0x13, 0x34, &mut bus);
    assert_eq!(timer.frt[0].frc, 0x1234);
    assert_eq!(timer.read(0x12), 0x12);
    assert_eq!(timer.read(0x13), 0x34);
}

#[test]
fn test_high_byte_read_latches_low_byte() {
    let (mut timer, _bus) = quiet_timer(Revision::Generic);
    timer.frt[2].icr = 0xBEEF;
    assert_eq!(timer.read(0x38), 0xBE);
    timer.frt[2].icr = 0x0000;
    assert_eq!(timer.read(0x39), 0xEF);
}

#[test]
fn test_latch_is_shared_between_channels() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x14, 0xAB, &mut bus); // OCRA high, channel 0
    timer.write(0x25, 0xCD, &mut bus); // OCRA low, channel 1
    assert_eq!(timer.frt[1].ocra, 0xABCD);
    assert_eq!(timer.frt[0].ocra, 0x7FFF);
}

#[test]
fn test_control_register_round_trip() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x20, 0x72, &mut bus);
    assert_eq!(timer.read(0x20), 0x72);
    assert_eq!(
        timer.frt[1].tcr,
        FrtControl::OVIE | FrtControl::OCIEA | FrtControl::OCIEB | FrtControl::from_bits_retain(2)
    );
}

#[test_case(0x00; "below the first channel")]
#[test_case(0x0F; "top of the reserved window")]
#[test_case(0x1A; "past ICR")]
#[test_case(0x40; "fourth channel")]
fn test_unmapped_frt_reads_ff(addr: u32) {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(addr, 0x00, &mut bus);
    assert_eq!(timer.read(addr), 0xFF);
}

#[test]
fn test_tcsr_write_keeps_flags_until_read() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.frt[0].tcsr = FrtStatus::OVF;
    timer.write(0x11, 0x01, &mut bus);
    // Never read as set, so writing 0 leaves OVF alone.
    assert_eq!(timer.frt[0].tcsr, FrtStatus::OVF | FrtStatus::CCLRA);
    assert!(bus.requests.is_empty());
}

#[test]
fn test_tcsr_clear_after_read_deasserts() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x10, FrtControl::OVIE.bits(), &mut bus);
    timer.frt[0].frc = 0xFFFF;
    timer.clock(2, &mut bus);
    assert!(bus.lines.is_asserted(InterruptSource::FrtOverflow(0)));

    assert_eq!(timer.read(0x11), FrtStatus::OVF.bits());
    // Writing 1 to a flag that was read keeps it.
    timer.write(0x11, FrtStatus::OVF.bits(), &mut bus);
    assert!(timer.frt[0].tcsr.contains(FrtStatus::OVF));
    timer.write(0x11, 0x00, &mut bus);
    assert!(!timer.frt[0].tcsr.contains(FrtStatus::OVF));
    assert!(!bus.lines.is_asserted(InterruptSource::FrtOverflow(0)));
    assert_eq!(
        bus.requests.last(),
        Some(&(InterruptSource::FrtOverflow(0), false))
    );
}

#[test]
fn test_tmr_registers() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write_tmr(TMR_TCR, 0x48, &mut bus);
    timer.write_tmr(TMR_TCNT, 0x10, &mut bus);
    assert_eq!(timer.read_tmr(TMR_TCR), 0x48);
    assert_eq!(timer.read_tmr(TMR_TCNT), 0x10);
    assert_eq!(timer.read_tmr(TMR_TCORA), 0xFF);
    assert_eq!(timer.read_tmr(0x55), 0xFF);
    assert_eq!(timer.tmr.tcr, TmrControl::CMIEA | TmrControl::from_bits_retain(0x08));
}

// --- Counting ---

#[test]
fn test_clock_runs_at_half_processor_rate() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.clock(10, &mut bus);
    assert_eq!(timer.cycles(), 5);
    timer.clock(4, &mut bus);
    assert_eq!(timer.cycles(), 5);
    timer.clock(13, &mut bus);
    assert_eq!(timer.cycles(), 7);
}

#[test]
fn test_frt_overflow_asserts_once_while_pending() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x30, FrtControl::OVIE.bits(), &mut bus);
    timer.frt[2].frc = 0xFFFF;
    timer.clock(2, &mut bus);
    assert_eq!(timer.frt[2].frc, 0x0000);
    assert!(timer.frt[2].tcsr.contains(FrtStatus::OVF));

    timer.clock(2 * 40, &mut bus);
    let asserts = bus
        .requests
        .iter()
        .filter(|&&r| r == (InterruptSource::FrtOverflow(2), true))
        .count();
    assert_eq!(asserts, 10);
    assert_eq!(bus.lines.rising_edges(InterruptSource::FrtOverflow(2)), 1);
    assert!(!bus.lines.is_asserted(InterruptSource::FrtOverflow(0)));
}

#[test]
fn test_disabled_flags_do_not_request() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.frt[1].frc = 0xFFFF;
    timer.clock(2, &mut bus);
    assert!(timer.frt[1].tcsr.contains(FrtStatus::OVF));
    assert!(bus.requests.is_empty());
}

#[test]
fn test_compare_a_clears_counter() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x10, FrtControl::OCIEA.bits(), &mut bus);
    timer.write(0x11, FrtStatus::CCLRA.bits(), &mut bus);
    timer.write(0x14, 0x00, &mut bus);
    timer.write(0x15, 0x02, &mut bus);

    // Steps at internal cycles 0, 4, 8 and 12: 0->1, 1->2, 2->0, 0->1.
    timer.clock(2 * 13, &mut bus);
    assert_eq!(timer.frt[0].frc, 1);
    assert!(timer.frt[0].tcsr.contains(FrtStatus::OCFA));
    assert!(!timer.frt[0].tcsr.contains(FrtStatus::OVF));
    assert!(bus.lines.is_asserted(InterruptSource::FrtCompareA(0)));
}

#[test]
fn test_compare_b_flags_without_clearing() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write(0x20, FrtControl::OCIEB.bits(), &mut bus);
    timer.write(0x26, 0x00, &mut bus);
    timer.write(0x27, 0x01, &mut bus);
    timer.clock(2 * 9, &mut bus);
    assert_eq!(timer.frt[1].frc, 3);
    assert!(timer.frt[1].tcsr.contains(FrtStatus::OCFB));
    assert!(bus.lines.is_asserted(InterruptSource::FrtCompareB(1)));
}

#[test_case(Revision::Generic, 0, 16; "generic clock 0")]
#[test_case(Revision::Generic, 1, 8; "generic clock 1")]
#[test_case(Revision::Generic, 2, 2; "generic clock 2")]
#[test_case(Revision::Generic, 3, 32; "generic clock 3")]
#[test_case(Revision::Mk1, 0, 16; "mk1 clock 0")]
#[test_case(Revision::Mk1, 3, 16; "mk1 clock 3")]
fn test_frt_prescaler(revision: Revision, cks: u8, steps: u16) {
    let (mut timer, mut bus) = quiet_timer(revision);
    timer.write(0x10, cks, &mut bus);
    timer.clock(2 * 64, &mut bus);
    assert_eq!(timer.frt[0].frc, steps);
}

#[test_case(Revision::Generic, 0, 64; "generic clock 0")]
#[test_case(Revision::Generic, 1, 8; "generic clock 1")]
#[test_case(Revision::Generic, 2, 1; "generic clock 2")]
#[test_case(Revision::Generic, 4, 64; "generic clock 4")]
#[test_case(Revision::Generic, 5, 32; "generic clock 5")]
#[test_case(Revision::Mk1, 5, 16; "mk1 clock 5")]
#[test_case(Revision::Mk1, 7, 16; "mk1 clock 7")]
fn test_tmr_prescaler(revision: Revision, cks: u8, steps: u8) {
    let (mut timer, mut bus) = quiet_timer(revision);
    timer.write_tmr(TMR_TCR, cks, &mut bus);
    timer.clock(2 * 64, &mut bus);
    assert_eq!(timer.tmr.tcnt, steps);
}

#[test]
fn test_tmr_clear_on_compare_a() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write_tmr(TMR_TCR, 0x08 | TmrControl::CMIEA.bits(), &mut bus);
    timer.write_tmr(TMR_TCORA, 3, &mut bus);
    timer.clock(2 * 4, &mut bus);
    assert_eq!(timer.tmr.tcnt, 0);
    assert!(timer.tmr.tcsr.contains(TmrStatus::CMFA));
    assert!(bus.lines.is_asserted(InterruptSource::TimerCompareA));
}

#[test]
fn test_tmr_clear_on_compare_b() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write_tmr(TMR_TCR, 0x10, &mut bus);
    timer.write_tmr(TMR_TCORA, 1, &mut bus);
    timer.write_tmr(TMR_TCORB, 2, &mut bus);
    timer.clock(2 * 3, &mut bus);
    assert_eq!(timer.tmr.tcnt, 0);
    assert!(timer.tmr.tcsr.contains(TmrStatus::CMFA | TmrStatus::CMFB));
    assert!(bus.requests.is_empty());
}

#[test]
fn test_tmr_overflow_and_clear() {
    let (mut timer, mut bus) = quiet_timer(Revision::Generic);
    timer.write_tmr(TMR_TCR, TmrControl::OVIE.bits(), &mut bus);
    timer.write_tmr(TMR_TCNT, 0xFE, &mut bus);
    timer.clock(2, &mut bus);
    assert!(!timer.tmr.tcsr.contains(TmrStatus::OVF));
    timer.clock(4, &mut bus);
    assert_eq!(timer.tmr.tcnt, 0x00);
    assert!(timer.tmr.tcsr.contains(TmrStatus::OVF | TmrStatus::CMFA | TmrStatus::CMFB));
    assert!(bus.lines.is_asserted(InterruptSource::TimerOverflow));

    let status = timer.read_tmr(TMR_TCSR);
    assert_eq!(status, 0xE0);
    timer.write_tmr(TMR_TCSR, 0x0F, &mut bus);
    assert_eq!(timer.tmr.tcsr, TmrStatus::WRITABLE);
    assert!(!bus.lines.is_asserted(InterruptSource::TimerOverflow));
}
