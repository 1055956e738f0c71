//! Hunt stage: splitting effort across lead-generation channels.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ADS_CASH_DRAG_PER_POINT, ENERGY_BUDGET, ENERGY_CASH_PER_POINT, ENERGY_POOL_DEFAULT,
    HUNT_BRAND_GAIN,
};
use crate::decision::Effects;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyChannel {
    Warm,
    Cold,
    Content,
    Ads,
}

impl EnergyChannel {
    pub const ALL: [Self; 4] = [Self::Warm, Self::Cold, Self::Content, Self::Ads];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Content => "content",
            Self::Ads => "ads",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntBlockReason {
    OverBudget { total: i64 },
}

/// Energy points per channel. Individual pools are not bounded; only the sum
/// gates the hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyAllocation {
    pub warm: i64,
    pub cold: i64,
    pub content: i64,
    pub ads: i64,
}

impl Default for EnergyAllocation {
    fn default() -> Self {
        Self {
            warm: ENERGY_POOL_DEFAULT,
            cold: ENERGY_POOL_DEFAULT,
            content: ENERGY_POOL_DEFAULT,
            ads: ENERGY_POOL_DEFAULT,
        }
    }
}

impl EnergyAllocation {
    #[must_use]
    pub const fn new(warm: i64, cold: i64, content: i64, ads: i64) -> Self {
        Self {
            warm,
            cold,
            content,
            ads,
        }
    }

    #[must_use]
    pub const fn get(&self, channel: EnergyChannel) -> i64 {
        match channel {
            EnergyChannel::Warm => self.warm,
            EnergyChannel::Cold => self.cold,
            EnergyChannel::Content => self.content,
            EnergyChannel::Ads => self.ads,
        }
    }

    pub const fn set(&mut self, channel: EnergyChannel, points: i64) {
        match channel {
            EnergyChannel::Warm => self.warm = points,
            EnergyChannel::Cold => self.cold = points,
            EnergyChannel::Content => self.content = points,
            EnergyChannel::Ads => self.ads = points,
        }
    }

    /// Exact sum of the four pools. Four `i64` values always fit in `i128`.
    const fn exact_total(&self) -> i128 {
        self.warm as i128 + self.cold as i128 + self.content as i128 + self.ads as i128
    }

    /// Sum of the pools, saturating at the `i64` bounds.
    #[must_use]
    pub const fn total(&self) -> i64 {
        saturate(self.exact_total())
    }

    #[must_use]
    pub const fn block_reason(&self) -> Option<HuntBlockReason> {
        if self.exact_total() > ENERGY_BUDGET as i128 {
            Some(HuntBlockReason::OverBudget {
                total: self.total(),
            })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn can_hunt(&self) -> bool {
        self.block_reason().is_none()
    }

    /// Cash produced by the hunt: every point of energy earns, ad spend drags.
    /// Saturates at the `i64` bounds.
    #[must_use]
    pub const fn cash_delta(&self) -> i64 {
        let earned = self.exact_total() * ENERGY_CASH_PER_POINT as i128;
        let drag = self.ads as i128 * ADS_CASH_DRAG_PER_POINT as i128;
        saturate(earned - drag)
    }

    /// Effects of running the hunt, or the reason it is blocked.
    ///
    /// # Errors
    ///
    /// Returns [`HuntBlockReason::OverBudget`] when the pools sum past 100.
    pub const fn effects(&self) -> Result<Effects, HuntBlockReason> {
        match self.block_reason() {
            Some(reason) => Err(reason),
            None => Ok(Effects::new(self.cash_delta(), HUNT_BRAND_GAIN)),
        }
    }
}

const fn saturate(value: i128) -> i64 {
    if value > i64::MAX as i128 {
        i64::MAX
    } else if value < i64::MIN as i128 {
        i64::MIN
    } else {
        value as i64
    }
}
