//! Сами сообщения собирает и выводит коллектор, который устанавливает приложение.
//! Обработчик прерывания таймера и функции чтения времени в журнал ничего не пишут,
//! чтобы не удлинять тик и не зависеть от коллектора в контексте прерывания.

pub use tracing::{
    Level,
    debug,
    error,
    event,
    info,
    trace,
    warn,
};
