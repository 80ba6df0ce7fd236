use crate::notify::Callback;

// Used in docs.
#[allow(unused)]
use crate::time::SysTick;

/// Аппаратный периодический таймер--вычитатель, например
/// [SysTick](https://developer.arm.com/documentation/dui0552/a/cortex-m3-peripherals/system-timer--systick)
/// ядер ARMv7-M.
///
/// Счётчик таймера уменьшается на единицу с каждым тактом.
/// Досчитав до нуля, на следующем такте он перезагружается значением `reload`
/// и вызывает прерывание, обработчик которого должен вызвать [`SysTick::tick()`].
/// То есть значение `reload` задаёт период в `reload + 1` тактов.
pub trait TickTimer {
    /// Устанавливает приоритет прерывания таймера.
    fn set_priority(
        &self,
        priority: u8,
    );

    /// Текущее значение счётчика.
    fn counter(&self) -> u32;

    /// Записывает `counter` в счётчик.
    fn set_counter(
        &self,
        counter: u32,
    );

    /// Задаёт значение, которым счётчик будет перезагружен при следующем переходе через ноль.
    fn set_reload(
        &self,
        reload: u32,
    );

    /// Включает счёт и генерацию прерываний.
    fn start(&self);

    /// Останавливает счёт и генерацию прерываний.
    fn stop(&self);
}

/// Резервные часы.
/// Например,
/// [часы реального времени](https://en.wikipedia.org/wiki/Real-time_clock),
/// тактируемые часовым кварцем на 32768 Гц.
///
/// Продолжают считать, пока [`TickTimer`] выключен,
/// и читаются в том числе в это время.
pub trait BackupClock {
    /// Частота резервных часов --- `2^FREQUENCY_SHIFT` Гц.
    ///
    /// Степень двойки позволяет обойтись без 64-битного деления
    /// при пересчёте их тиков в миллисекунды.
    const FREQUENCY_SHIFT: u32;

    /// Монотонный счётчик тиков резервных часов.
    fn count(&self) -> u64;
}

/// Источник тактовой частоты [`TickTimer`].
pub trait CoreClock {
    /// Текущая частота в Гц.
    ///
    /// Может отличаться между [`SysTick::initialize()`] и [`SysTick::enable()`],
    /// если частота была изменена во время сна.
    fn frequency(&self) -> u32;
}

/// Механизм отложенных вызовов.
///
/// Выполняет `routine` вне прерывания, которое поставило его в очередь,
/// с приоритетом ниже прерывания таймера.
/// Например, через
/// [PendSV](https://developer.arm.com/documentation/dui0552/a/the-cortex-m3-processor/exception-model/exception-types).
pub trait Deferred {
    /// Ставит в очередь вызов `routine(context, argument)`.
    fn schedule(
        &self,
        routine: Callback,
        context: usize,
        argument: u64,
    );
}

/// Кооперативная уступка процессора.
pub trait Cooperative {
    /// Даёт поработать другим прерываниям и отложенным вызовам.
    /// Может, например, усыплять процессор до следующего прерывания.
    fn yield_now(&self);
}

/// Всё, что нужно [`SysTick`] от платформы.
pub trait Platform: BackupClock + Cooperative + CoreClock + Deferred + TickTimer {
}

impl<T: BackupClock + Cooperative + CoreClock + Deferred + TickTimer> Platform for T {
}
