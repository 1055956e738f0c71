//! Centralized balance and tuning constants for the Category of One engine.
//!
//! These values define the deterministic math for every decision. Keeping
//! them together means balance can only move through reviewed code changes,
//! never through external data files.

// Starting position ---------------------------------------------------------
pub const STARTING_CASH: i64 = 10_000;
pub const STARTING_BRAND: i64 = 0;

// Terminal thresholds -------------------------------------------------------
/// Cash at or below this value bankrupts the venture.
pub const CASH_LOSS_CEILING: i64 = 0;
/// Brand at or below this value turns the venture into a commodity.
pub const BRAND_LOSS_CEILING: i64 = -50;
pub const WIN_CASH_FLOOR: i64 = 100_000;
pub const WIN_BRAND_FLOOR: i64 = 50;

// Log book ------------------------------------------------------------------
pub const LOG_CAPACITY: usize = 50;
pub const LOG_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

// Offer (value equation) ----------------------------------------------------
pub const VALUE_INPUT_MIN: u8 = 1;
pub const VALUE_INPUT_MAX: u8 = 10;
pub const VALUE_INPUT_DEFAULT: u8 = 5;
pub const OFFER_SCORE_THRESHOLD: f64 = 5.0;
pub const OFFER_HIT_CASH: i64 = 7_000;
pub const OFFER_HIT_BRAND: i64 = 15;
pub const OFFER_MISS_CASH: i64 = -3_000;
pub const OFFER_MISS_BRAND: i64 = -5;

// Hunt (energy allocation) --------------------------------------------------
pub const ENERGY_POOL_DEFAULT: i64 = 25;
pub const ENERGY_BUDGET: i64 = 100;
pub const ENERGY_CASH_PER_POINT: i64 = 100;
pub const ADS_CASH_DRAG_PER_POINT: i64 = 200;
pub const HUNT_BRAND_GAIN: i64 = 10;

// Consultant copy -----------------------------------------------------------
pub const CONSULTANT_BOOT_MESSAGE: &str = "STANDBY. BOOTING STRATEGY ENGINE...";
pub const CONSULTANT_GREETING: &str =
    "Welcome. You are a commodity. Let's fix that. Sector 1: Positioning.";

// Log messages --------------------------------------------------------------
pub(crate) const LOG_SESSION_STARTED: &str = "SIMULATION STARTED: INITIALIZING RUNWAY $10,000";
pub(crate) const LOG_ADVANCE_PREFIX: &str = "SYSTEM UPDATE: Advancing to Sector";
pub(crate) const LOG_BANKRUPT: &str = "RUNWAY EXHAUSTED: The market shows no mercy to commodities.";
pub(crate) const LOG_COMMODITIZED: &str =
    "BRAND COLLAPSED: The market can no longer tell you from the rest.";
pub(crate) const LOG_CATEGORY_KING: &str = "CATEGORY CLAIMED: You are the only choice.";
pub(crate) const LOG_GAME_COMPLETE: &str = "SIMULATION COMPLETE: No category claimed.";
