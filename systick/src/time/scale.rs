#![forbid(unsafe_code)]

use core::sync::atomic::{
    AtomicU32,
    Ordering,
};

use crate::error::{
    Error::InvalidArgument,
    Result,
};

use super::{
    Hz,
    MICROS_SCALE_SHIFT,
    MSECS_PER_SEC,
    USECS_PER_SEC,
};

/// Константы пересчёта тактов таймера в миллисекунды и микросекунды
/// для одной конкретной тактовой частоты.
///
/// Частота `frequency` в общем случае не кратна тысяче.
/// Поэтому миллисекунда длится `cycle` тактов,
/// а оставшиеся `fraction` тактов на каждую тысячу миллисекунд
/// распределяются по одному такту на отдельные, "длинные", миллисекунды.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TickScale {
    /// Количество тактов таймера в номинальной миллисекунде, `frequency / 1000`.
    cycle: u32,

    /// Остаток `frequency - cycle * 1000`.
    fraction: u32,

    /// Число с фиксированной точкой `floor(2^22 * 1_000_000 / frequency)`.
    /// Позволяет перевести такты в микросекунды умножением и сдвигом вместо деления.
    micros_scale: u32,
}

impl TickScale {
    /// Вычисляет константы пересчёта для частоты `frequency` Гц.
    ///
    /// Возвращает ошибку [`Error::InvalidArgument`](crate::Error::InvalidArgument),
    /// если частота не превышает `1000` Гц ---
    /// тогда в миллисекунде окажется меньше двух тактов таймера.
    pub fn new(frequency: u32) -> Result<Self> {
        if frequency <= MSECS_PER_SEC {
            return Err(InvalidArgument);
        }

        let cycle = frequency / MSECS_PER_SEC;
        let fraction = frequency - cycle * MSECS_PER_SEC;
        let micros_scale = u32::try_from((USECS_PER_SEC << MICROS_SCALE_SHIFT) / u64::from(frequency))?;

        Ok(Self {
            cycle,
            fraction,
            micros_scale,
        })
    }

    /// Количество тактов таймера в номинальной миллисекунде.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Количество тактов на тысячу миллисекунд, не учтённое в [`TickScale::cycle()`].
    pub fn fraction(&self) -> u32 {
        self.fraction
    }

    /// Множитель перевода тактов в микросекунды с фиксированной точкой,
    /// дробная часть занимает [`MICROS_SCALE_SHIFT`] младших битов.
    pub fn micros_scale(&self) -> u32 {
        self.micros_scale
    }

    /// Тактовая частота, для которой вычислены константы.
    pub fn frequency(&self) -> Hz {
        Hz::new(self.cycle * MSECS_PER_SEC + self.fraction)
    }

    /// Значение перезагрузки таймера для номинальной миллисекунды.
    pub fn reload(&self) -> u32 {
        self.cycle.saturating_sub(1)
    }

    /// Количество тактов, прошедших с начала текущей миллисекунды,
    /// если счётчик таймера равен `counter`.
    pub fn offset(
        &self,
        counter: u32,
    ) -> u32 {
        self.reload().saturating_sub(counter)
    }

    /// Переводит `offset` тактов, прошедших с начала миллисекунды, в микросекунды.
    ///
    /// Так как `offset < cycle`, произведение не превосходит `2^22 * 1000` и
    /// помещается в [`u32`] --- результат занимает его старшие 10 битов.
    pub fn offset_to_micros(
        &self,
        offset: u32,
    ) -> u32 {
        (offset * self.micros_scale) >> MICROS_SCALE_SHIFT
    }

    /// Пропорционально переносит смещение `offset` внутри миллисекунды,
    /// отсчитанное в тактах частоты `old`, в такты частоты `self`.
    pub fn rescale(
        &self,
        offset: u32,
        old: &TickScale,
    ) -> u32 {
        if old.cycle == 0 {
            return 0;
        }

        let offset = u64::from(offset) * u64::from(self.cycle) / u64::from(old.cycle);

        // The quotient is below `self.cycle` as long as `offset < old.cycle`.
        u32::try_from(offset).unwrap_or(self.reload())
    }
}

/// Предназначена для разделения значения [`TickScale`]
/// между основным контекстом и обработчиком прерывания таймера.
///
/// То есть [`TickScale`] и [`AtomicTickScale`] соотносятся также как
/// примитивный тип [`u32`] и атомарный [`AtomicU32`].
///
/// Пишется только в [`SysTick::initialize()`](super::SysTick::initialize) и
/// [`SysTick::enable()`](super::SysTick::enable), когда прерывания таймера не происходят.
/// Поэтому для согласованности полей достаточно атомарности каждого из них по отдельности.
#[derive(Debug, Default)]
pub(crate) struct AtomicTickScale {
    /// Количество тактов таймера в номинальной миллисекунде.
    cycle: AtomicU32,

    /// Остаток тактов на каждую тысячу миллисекунд.
    fraction: AtomicU32,

    /// Множитель перевода тактов в микросекунды.
    micros_scale: AtomicU32,
}

impl AtomicTickScale {
    /// Возвращает [`AtomicTickScale`], заполненную нулями.
    /// Аналогична [`AtomicTickScale::default()`], но доступна в константном контексте.
    pub(crate) const fn new() -> Self {
        Self {
            cycle: AtomicU32::new(0),
            fraction: AtomicU32::new(0),
            micros_scale: AtomicU32::new(0),
        }
    }

    /// Записывает `scale`.
    pub(crate) fn store(
        &self,
        scale: TickScale,
    ) {
        self.fraction.store(scale.fraction, Ordering::Relaxed);
        self.micros_scale.store(scale.micros_scale, Ordering::Relaxed);
        self.cycle.store(scale.cycle, Ordering::Release);
    }

    /// Читает сохранённое значение [`TickScale`].
    pub(crate) fn load(&self) -> TickScale {
        let cycle = self.cycle.load(Ordering::Acquire);

        TickScale {
            cycle,
            fraction: self.fraction.load(Ordering::Relaxed),
            micros_scale: self.micros_scale.load(Ordering::Relaxed),
        }
    }
}
