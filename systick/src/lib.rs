//! Программные часы поверх периодического таймера тиков.
//!
//! Аппаратный таймер--вычитатель генерирует прерывание примерно раз в миллисекунду.
//! Более медленные, но не отключаемые при переходе в режим пониженного энергопотребления
//! резервные часы позволяют восстановить время, прошедшее пока таймер тиков был выключен.
//!
//! Библиотека предоставляет монотонное время в миллисекундах и микросекундах,
//! кооперативную задержку и оповещение о каждом тике.
//! Вся арифметика целочисленная и безопасна относительно прерываний.

#![deny(warnings)]
#![no_std]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(missing_docs)]

/// Перечисление для возможных ошибок [`Error`] и соответствующий [`Result`].
pub mod error;

/// Поддержка журналирования макросами библиотеки [`tracing`].
pub mod log;

/// Оповещение о тиках через
/// [отложенный вызов](https://en.wikipedia.org/wiki/Callback_(computer_programming)).
pub mod notify;

/// Внешние по отношению к часам компоненты платформы:
/// таймер тиков, резервные часы, источник тактовой частоты,
/// механизм отложенных вызовов и кооперативной уступки процессора.
pub mod platform;

/// Часы [`SysTick`] и вспомогательные структуры для работы со временем.
pub mod time;

pub use error::{
    Error,
    Result,
};
pub use notify::{
    Callback,
    Notifiable,
};
pub use platform::{
    BackupClock,
    Cooperative,
    CoreClock,
    Deferred,
    Platform,
    TickTimer,
};
pub use time::{
    Hz,
    Instant,
    SysTick,
    TickScale,
};
