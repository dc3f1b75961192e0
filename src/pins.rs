//! GPIO / peripheral pin assignments for the tankfill relay board.
//!
//! Single source of truth — every driver references this module rather
//! than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere.
//!
//! Each valve group is switched through a pair of relays on the 4-channel
//! relay board, matching the original field wiring.

// ---------------------------------------------------------------------------
// Relay board (active HIGH)
// ---------------------------------------------------------------------------

/// Tank-feed valve relay, channel 1.
pub const TANK_VALVE_1_GPIO: i32 = 7;
/// Tank-feed valve relay, channel 2.
pub const TANK_VALVE_2_GPIO: i32 = 6;
/// Sprinkler (output) valve relay, channel 3.
pub const SPRINKLER_VALVE_1_GPIO: i32 = 5;
/// Sprinkler (output) valve relay, channel 4.
pub const SPRINKLER_VALVE_2_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Level sensing — analog (ADC1)
// ---------------------------------------------------------------------------

/// Submerged pressure transducer — analog voltage via resistive divider.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const LEVEL_ADC_GPIO: i32 = 9;
/// ADC1 channel number for the pressure transducer.
pub const LEVEL_ADC_CHANNEL: u32 = 8;

// ---------------------------------------------------------------------------
// Level sensing — IR beam variant
// ---------------------------------------------------------------------------
//
// A floating pipe inside an outer pipe sinks to unblock the lower beam
// when the tank needs water; the upper beam is blocked when the float
// rides high enough to call the tank full.

/// Lower IR beam receiver. HIGH = beam blocked = water above the low mark.
pub const IR_LOW_DETECT_GPIO: i32 = 12;
/// Upper IR beam receiver. HIGH = beam blocked = water at the full mark.
pub const IR_HIGH_DETECT_GPIO: i32 = 8;
