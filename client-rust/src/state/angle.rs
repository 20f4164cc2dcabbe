#[cfg(test)]
#[path = "angle_test.rs"]
mod angle_test;

/// Longest angle text the field accepts, in characters.
pub const MAX_ANGLE_CHARS: usize = 4;

/// Why a candidate angle string was not stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AngleRejection {
    #[error("angle text has {len} characters (max {MAX_ANGLE_CHARS})")]
    TooLong { len: usize },
    #[error("angle text is not a finite number")]
    NotFinite,
}

/// Text of the angle field.
///
/// The stored value is always empty or a finite number of at most
/// [`MAX_ANGLE_CHARS`] characters. Validation gates the write: a rejected
/// candidate leaves the previous value in place. Surrounding whitespace is
/// tolerated for parsing but kept in the stored text as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatedAngleInput {
    value: String,
}

impl ValidatedAngleInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The parsed angle, or `None` when the field is empty.
    #[must_use]
    pub fn angle(&self) -> Option<f64> {
        parse_finite(&self.value)
    }

    /// Store `raw` if it validates.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason; the stored value is unchanged.
    pub fn try_set(&mut self, raw: &str) -> Result<(), AngleRejection> {
        validate(raw)?;
        raw.clone_into(&mut self.value);
        Ok(())
    }

    /// Store `raw` if it validates and report whether it was accepted.
    pub fn set_candidate(&mut self, raw: &str) -> bool {
        match self.try_set(raw) {
            Ok(()) => true,
            Err(reason) => {
                tracing::trace!(candidate = raw, %reason, "angle input rejected");
                false
            }
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Check a candidate without storing it.
///
/// # Errors
///
/// [`AngleRejection::TooLong`] past [`MAX_ANGLE_CHARS`] characters, otherwise
/// [`AngleRejection::NotFinite`] for non-empty text that does not parse to a
/// finite number (`"-"`, `"."`, `"inf"`, `"NaN"`, blanks).
pub fn validate(raw: &str) -> Result<(), AngleRejection> {
    let len = raw.chars().count();
    if len > MAX_ANGLE_CHARS {
        return Err(AngleRejection::TooLong { len });
    }
    if raw.is_empty() || parse_finite(raw).is_some() {
        Ok(())
    } else {
        Err(AngleRejection::NotFinite)
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
