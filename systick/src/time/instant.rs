#![forbid(unsafe_code)]

use core::mem;

use super::SysTick;

/// Описывает момент времени по часам [`SysTick`] с точностью до миллисекунды.
///
/// Похожа на стандартную, но недоступную нам в `#[no_std]`--окружении структуру
/// [`std::time::Instant`](https://doc.rust-lang.org/std/time/struct.Instant.html).
/// Обе описывают
/// [монотонно возрастающее время](https://blog.codeminer42.com/the-monotonic-clock-and-why-you-should-care-about-it/),
/// которое может никак не соответствовать
/// [реальному времени](https://en.wikipedia.org/wiki/Civil_time).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Instant(u64);

impl Instant {
    /// Возвращает [`Instant`], соответствующий `millis` миллисекундам.
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Возвращает текущий момент по часам `clock`.
    pub fn now<P>(clock: &SysTick<P>) -> Self {
        Self(clock.millis())
    }

    /// Показания часов в миллисекундах.
    pub fn millis(&self) -> u64 {
        self.0
    }

    /// Возвращает количество миллисекунд, которое прошло от `self` до текущего момента.
    pub fn elapsed<P>(
        &self,
        clock: &SysTick<P>,
    ) -> u64 {
        clock.millis().saturating_sub(self.0)
    }

    /// Возвращает количество миллисекунд, которое прошло от `self` до текущего момента.
    /// И записывает в `self` текущий момент.
    pub fn lap<P>(
        &mut self,
        clock: &SysTick<P>,
    ) -> u64 {
        let lap_end = clock.millis();
        lap_end.saturating_sub(mem::replace(&mut self.0, lap_end))
    }

    /// Возвращает `true`, если с момента `self` прошло не менее `duration` миллисекунд.
    pub fn has_passed<P>(
        &self,
        clock: &SysTick<P>,
        duration: u64,
    ) -> bool {
        self.elapsed(clock) >= duration
    }
}
