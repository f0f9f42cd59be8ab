use serde::{Deserialize, Serialize};

use crate::errors::{MirrorError, Result};

/// Rational sampling rate, `numerator` frames every `denominator` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub const FPS_30: Self = Self {
        numerator: 30,
        denominator: 1,
    };

    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        let rate = Self {
            numerator,
            denominator,
        };
        rate.validate()?;
        Ok(rate)
    }

    pub fn from_fps(fps: u32) -> Result<Self> {
        Self::new(fps, 1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.numerator == 0 || self.denominator == 0 {
            return Err(MirrorError::InvalidFrameRate {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    /// Frames per second.
    #[inline]
    #[must_use]
    pub fn as_decimal(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// Seconds per frame.
    #[inline]
    #[must_use]
    pub fn as_interval(&self) -> f64 {
        f64::from(self.denominator) / f64::from(self.numerator)
    }

    /// Time of the start of `frame`, in seconds.
    #[inline]
    #[must_use]
    pub fn as_seconds(&self, frame: usize) -> f64 {
        frame as f64 * self.as_interval()
    }

    /// Fractional frame position of `seconds`.
    #[inline]
    #[must_use]
    pub fn as_frame_time(&self, seconds: f64) -> f64 {
        seconds * self.as_decimal()
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}
