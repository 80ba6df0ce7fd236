/// Вспомогательная структура [`BackupDelta`] для пересчёта времени,
/// прошедшего по резервным часам, в миллисекунды и такты таймера тиков.
mod backup;

/// Часы [`SysTick`] --- разделяемое между основным контекстом и прерыванием таймера
/// состояние и операции над ним.
mod clock;

/// Вспомогательная структура [`Hz`] для форматирования
/// [частоты](https://en.wikipedia.org/wiki/Hertz) при журналировании.
mod hz;

/// Структура [`Instant`] для хранения момента времени по часам [`SysTick`].
mod instant;

/// Вспомогательные структуры [`TickScale`] и [`AtomicTickScale`]
/// с константами пересчёта тактов таймера во время.
mod scale;

use static_assertions::{
    const_assert,
    const_assert_eq,
};

pub use backup::BackupDelta;
pub use clock::SysTick;
pub use hz::Hz;
pub use instant::Instant;
pub use scale::TickScale;

// Used in docs.
#[allow(unused)]
use scale::AtomicTickScale;

/// Количество миллисекунд в одной секунде.
pub const MSECS_PER_SEC: u32 = 1_000;

/// Количество микросекунд в одной миллисекунде.
pub const USECS_PER_MSEC: u64 = 1_000;

/// Количество микросекунд в одной секунде.
pub const USECS_PER_SEC: u64 = 1_000_000;

/// Количество дробных битов в [`TickScale::micros_scale()`].
///
/// Выбрано так, чтобы микросекунды внутри миллисекунды
/// занимали старшие 10 битов 32-битного произведения.
pub const MICROS_SCALE_SHIFT: u32 = 22;

const_assert_eq!(USECS_PER_MSEC * MSECS_PER_SEC as u64, USECS_PER_SEC);
const_assert!((1 << (u32::BITS - MICROS_SCALE_SHIFT)) >= USECS_PER_MSEC);
const_assert!(USECS_PER_SEC << MICROS_SCALE_SHIFT <= (u32::MAX as u64) * (MSECS_PER_SEC as u64 + 1));
