use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::page::ScalableElement;

/// Width every scaled element is normalized to, in px
pub const DEFAULT_TARGET_WIDTH: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleError {
    ZeroFontSize,
    InvalidMeasurement { width: f64, font_size: f64 },
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleError::ZeroFontSize => write!(f, "font size is zero"),
            ScaleError::InvalidMeasurement { width, font_size } => {
                write!(f, "invalid measurement: width {} px, font size {} px", width, font_size)
            }
        }
    }
}

impl std::error::Error for ScaleError {}

/// Width per px of font size
pub fn scale_factor(width: f64, font_size: f64) -> Result<f64, ScaleError> {
    if font_size == 0.0 {
        return Err(ScaleError::ZeroFontSize);
    }
    if !(width.is_finite() && font_size.is_finite()) || width <= 0.0 || font_size < 0.0 {
        return Err(ScaleError::InvalidMeasurement { width, font_size });
    }
    let factor = width / font_size;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ScaleError::InvalidMeasurement { width, font_size });
    }
    Ok(factor)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScaleReport {
    pub scaled: usize,
    pub skipped: usize,
}

/// Rewrites font sizes so each element renders at `target_width`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScaler {
    target_width: f64,
}

impl AutoScaler {
    pub fn new(target_width: f64) -> Self {
        Self { target_width }
    }

    pub fn target_width(&self) -> f64 {
        self.target_width
    }

    /// Font size at which an element currently `width` px wide at
    /// `font_size` px would be exactly `target_width` px wide.
    pub fn target_font_size(&self, width: f64, font_size: f64) -> Result<f64, ScaleError> {
        let factor = scale_factor(width, font_size)?;
        let new_size = self.target_width / factor;
        // extreme ratios overflow to inf or underflow to 0
        if !new_size.is_finite() || new_size <= 0.0 {
            return Err(ScaleError::InvalidMeasurement { width, font_size });
        }
        Ok(new_size)
    }

    /// Scale a single element in place
    pub fn scale<E: ScalableElement + ?Sized>(&self, element: &mut E) -> Result<f64, ScaleError> {
        let new_size = self.target_font_size(element.rendered_width(), element.font_size())?;
        element.set_font_size(new_size);
        Ok(new_size)
    }

    /// One pass over `elements`. Elements that cannot be measured are left
    /// untouched and counted as skipped.
    pub fn apply<'a, E, I>(&self, elements: I) -> ScaleReport
    where
        E: ScalableElement + 'a,
        I: IntoIterator<Item = &'a mut E>,
    {
        let mut report = ScaleReport::default();
        for (index, element) in elements.into_iter().enumerate() {
            match self.scale(element) {
                Ok(px) => {
                    debug!(index, font_size = px, "Element scaled");
                    report.scaled += 1;
                }
                Err(e) => {
                    warn!(index, error = %e, "Skipping element auto-scale");
                    report.skipped += 1;
                }
            }
        }
        report
    }
}

impl Default for AutoScaler {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_WIDTH)
    }
}

/// Element geometry as measured by a browser.
///
/// Unlike [`crate::TextElement`] the width does not follow the font size,
/// it stays at the value that was measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: String,
    pub width: f64,
    pub font_size: f64,
}

impl ScalableElement for Measurement {
    fn rendered_width(&self) -> f64 {
        self.width
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn set_font_size(&mut self, px: f64) {
        self.font_size = px;
    }
}
