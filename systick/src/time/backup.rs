#![forbid(unsafe_code)]

use super::MSECS_PER_SEC;

// Used in docs.
#[allow(unused)]
use crate::platform::BackupClock;

/// Время, которое прошло по резервным часам [`BackupClock`],
/// разложенное на целые миллисекунды и такты таймера тиков.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BackupDelta {
    /// Целое количество миллисекунд.
    whole_millis: u64,

    /// Остаток меньше миллисекунды, переведённый в такты таймера тиков.
    remainder_counts: u32,
}

impl BackupDelta {
    /// Раскладывает `delta` тиков резервных часов с частотой `2^frequency_shift` Гц
    /// на целые миллисекунды и остаток в тактах таймера тиков,
    /// у которого в миллисекунде `cycle` тактов.
    ///
    /// Обходится без 64-битного деления.
    /// Остаток миллисекунды в тиках резервных часов равен
    ///
    /// `((delta * 1000) & (2^frequency_shift - 1)) / 1000`.
    ///
    /// В тактах таймера тиков, то есть при частоте `cycle * 1000` Гц, это
    ///
    /// `((delta * 1000) & (2^frequency_shift - 1)) * cycle / 2^frequency_shift`.
    pub fn new(
        delta: u64,
        frequency_shift: u32,
        cycle: u32,
    ) -> Self {
        debug_assert!(frequency_shift < u32::BITS);

        let scaled = delta.wrapping_mul(MSECS_PER_SEC.into());
        let mask = (1 << frequency_shift) - 1;
        let remainder = scaled & mask;

        // `remainder < 2^frequency_shift`, so the quotient is below `cycle`.
        let remainder_counts = (remainder * u64::from(cycle)) >> frequency_shift;

        Self {
            whole_millis: scaled >> frequency_shift,
            remainder_counts: remainder_counts as u32,
        }
    }

    /// Целое количество миллисекунд.
    pub fn whole_millis(&self) -> u64 {
        self.whole_millis
    }

    /// Остаток меньше миллисекунды в тактах таймера тиков.
    pub fn remainder_counts(&self) -> u32 {
        self.remainder_counts
    }
}
