//! Offer stage: the value equation scratch pad.
use serde::{Deserialize, Serialize};

use crate::constants::{
    OFFER_HIT_BRAND, OFFER_HIT_CASH, OFFER_MISS_BRAND, OFFER_MISS_CASH, OFFER_SCORE_THRESHOLD,
    VALUE_INPUT_DEFAULT, VALUE_INPUT_MAX, VALUE_INPUT_MIN,
};
use crate::decision::Effects;

/// Slider inputs for the Offer stage. Every field stays within `[1, 10]`;
/// the setters clamp rather than reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueEquation {
    dream: u8,
    likelihood: u8,
    time_delay: u8,
    effort: u8,
}

impl Default for ValueEquation {
    fn default() -> Self {
        Self {
            dream: VALUE_INPUT_DEFAULT,
            likelihood: VALUE_INPUT_DEFAULT,
            time_delay: VALUE_INPUT_DEFAULT,
            effort: VALUE_INPUT_DEFAULT,
        }
    }
}

const fn clamp_input(value: u8) -> u8 {
    if value < VALUE_INPUT_MIN {
        VALUE_INPUT_MIN
    } else if value > VALUE_INPUT_MAX {
        VALUE_INPUT_MAX
    } else {
        value
    }
}

impl ValueEquation {
    #[must_use]
    pub const fn new(dream: u8, likelihood: u8, time_delay: u8, effort: u8) -> Self {
        Self {
            dream: clamp_input(dream),
            likelihood: clamp_input(likelihood),
            time_delay: clamp_input(time_delay),
            effort: clamp_input(effort),
        }
    }

    #[must_use]
    pub const fn dream(&self) -> u8 {
        self.dream
    }

    #[must_use]
    pub const fn likelihood(&self) -> u8 {
        self.likelihood
    }

    #[must_use]
    pub const fn time_delay(&self) -> u8 {
        self.time_delay
    }

    #[must_use]
    pub const fn effort(&self) -> u8 {
        self.effort
    }

    pub const fn set_dream(&mut self, value: u8) {
        self.dream = clamp_input(value);
    }

    pub const fn set_likelihood(&mut self, value: u8) {
        self.likelihood = clamp_input(value);
    }

    pub const fn set_time_delay(&mut self, value: u8) {
        self.time_delay = clamp_input(value);
    }

    pub const fn set_effort(&mut self, value: u8) {
        self.effort = clamp_input(value);
    }

    /// `(dream * likelihood) / (time_delay * effort)`, denominators floored at 1.
    #[must_use]
    pub fn score(&self) -> f64 {
        let numerator = f64::from(self.dream) * f64::from(self.likelihood);
        let denominator = f64::from(self.time_delay.max(1)) * f64::from(self.effort.max(1));
        numerator / denominator
    }

    #[must_use]
    pub fn is_irresistible(&self) -> bool {
        self.score() >= OFFER_SCORE_THRESHOLD
    }

    #[must_use]
    pub fn effects(&self) -> Effects {
        if self.is_irresistible() {
            Effects::new(OFFER_HIT_CASH, OFFER_HIT_BRAND)
        } else {
            Effects::new(OFFER_MISS_CASH, OFFER_MISS_BRAND)
        }
    }
}
