/*!
 * Schedule Validation
 * Fail-fast checks for fixed-phase schedules at registration
 */

use crate::core::errors::ScheduleValidationError;

/// Validated fixed-phase schedule; `modulo == 0` disables it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSchedule {
    pub modulo: u64,
    pub offset: u64,
}

impl TickSchedule {
    #[inline]
    pub const fn is_fixed_phase(&self) -> bool {
        self.modulo > 0
    }

    /// Whether `cycle` falls on this schedule's phase
    ///
    /// Reduces before adding so the phase holds up to `u64::MAX`; the sum
    /// stays below `2 * modulo`, which fits because `modulo` came from an `i64`.
    #[inline]
    pub fn matches(&self, cycle: u64) -> bool {
        self.modulo > 0 && (cycle % self.modulo + self.offset) % self.modulo == 0
    }
}

/// Validate tick modulo/offset
///
/// With `modulo == 0` the offset is ignored, whatever its value.
pub(crate) fn validate_schedule(
    modulo: Option<i64>,
    offset: Option<i64>,
) -> Result<TickSchedule, ScheduleValidationError> {
    let modulo = modulo.unwrap_or(0);
    let offset = offset.unwrap_or(0);

    if modulo < 0 {
        return Err(ScheduleValidationError::NegativeModulo(modulo));
    }

    if modulo == 0 {
        return Ok(TickSchedule::default());
    }

    if offset < 0 {
        return Err(ScheduleValidationError::NegativeOffset(offset));
    }

    if offset >= modulo {
        return Err(ScheduleValidationError::OffsetOutOfRange { offset, modulo });
    }

    Ok(TickSchedule {
        modulo: modulo as u64,
        offset: offset as u64,
    })
}
