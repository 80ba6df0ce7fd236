use core::fmt::{
    Display,
    Formatter,
    Result,
};

use number_prefix::NumberPrefix;

/// Вспомогательная структура для форматирования
/// [частоты](https://en.wikipedia.org/wiki/Hertz)
/// при журналировании.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Hz(u32);

impl Hz {
    /// Возвращает частоту `hz` [Герц](https://en.wikipedia.org/wiki/Hertz).
    pub const fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Возвращает содержащееся значение частоты в
    /// [Герцах](https://en.wikipedia.org/wiki/Hertz).
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Display for Hz {
    fn fmt(
        &self,
        formatter: &mut Formatter,
    ) -> Result {
        let hz = self.get();
        match NumberPrefix::decimal(f64::from(hz)) {
            NumberPrefix::Standalone(_) => {
                write!(formatter, "{hz} Hz")
            },
            NumberPrefix::Prefixed(prefix, value) => {
                write!(formatter, "{value:.3} {}Hz", prefix.symbol())
            },
        }
    }
}
