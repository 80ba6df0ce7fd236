use core::{
    mem,
    ptr,
    sync::atomic::{
        AtomicPtr,
        AtomicUsize,
        Ordering,
    },
};

// Used in docs.
#[allow(unused)]
use crate::{
    platform::Deferred,
    time::SysTick,
};

/// Функция оповещения о тике.
///
/// Получает зарегистрированный вместе с ней контекст и
/// значение [`SysTick::millis()`] сразу после тика.
pub type Callback = fn(context: usize, millis: u64);

/// Объект, который хочет получать оповещения о тиках.
///
/// Регистрируется методом [`SysTick::notify_with()`].
/// Метод [`Notifiable::notify()`] вызывается механизмом отложенных вызовов [`Deferred`],
/// а не самим обработчиком прерывания таймера.
pub trait Notifiable: Sync {
    /// Оповещение о тике, после которого часы показывают `millis` миллисекунд.
    fn notify(
        &self,
        millis: u64,
    );
}

/// Переходник от пары [`Callback`] и контекста к [`Notifiable`].
/// Контекст --- адрес объекта типа `N` со статическим временем жизни.
pub(crate) fn trampoline<N: Notifiable>(
    context: usize,
    millis: u64,
) {
    // SAFETY: `trampoline::<N>` registers only together with the address of a `&'static N`,
    // see `SysTick::notify_with()`, and `AtomicNotification` never mixes pairs.
    let notifiable = unsafe { &*(context as *const N) };
    notifiable.notify(millis);
}

/// Зарегистрированная функция оповещения и её контекст.
///
/// Пишется из основного контекста, а читается в обработчике прерывания.
/// Поэтому запись выполняется в строгом порядке:
///   - сначала функция оповещения стирается, и прерывание, случившееся в этот момент,
///     ничего не вызывает;
///   - затем записывается новый контекст;
///   - и только потом --- новая функция.
///
/// Все три записи имеют семантику [`Ordering::Release`],
/// а обработчик прерывания читает сначала функцию и только затем контекст,
/// оба раза с [`Ordering::Acquire`].
/// Поэтому прочитав новую функцию, обработчик гарантированно видит и новый контекст.
///
/// Считается, что обработчик прерывания выполняется целиком,
/// не перемежаясь с кодом основного контекста.
#[derive(Debug, Default)]
pub(crate) struct AtomicNotification {
    /// Функция оповещения [`Callback`] или нулевой указатель.
    callback: AtomicPtr<()>,

    /// Контекст функции оповещения.
    context: AtomicUsize,
}

impl AtomicNotification {
    /// Возвращает [`AtomicNotification`] без зарегистрированной функции оповещения.
    pub(crate) const fn new() -> Self {
        Self {
            callback: AtomicPtr::new(ptr::null_mut()),
            context: AtomicUsize::new(0),
        }
    }

    /// Заменяет зарегистрированную пару на `callback` и `context`.
    /// Значение [`None`] в `callback` отключает оповещение.
    pub(crate) fn store(
        &self,
        callback: Option<Callback>,
        context: usize,
    ) {
        let callback = callback.map_or(ptr::null_mut(), |callback| callback as *mut ());

        self.callback.store(ptr::null_mut(), Ordering::Release);
        self.context.store(context, Ordering::Release);
        self.callback.store(callback, Ordering::Release);
    }

    /// Возвращает зарегистрированную пару, если она есть.
    pub(crate) fn load(&self) -> Option<(Callback, usize)> {
        let callback = self.callback.load(Ordering::Acquire);
        if callback.is_null() {
            return None;
        }

        // SAFETY: a non-null `callback` has been stored by `AtomicNotification::store()`
        // from a valid `Callback`.
        let callback = unsafe { mem::transmute::<*mut (), Callback>(callback) };
        let context = self.context.load(Ordering::Acquire);

        Some((callback, context))
    }
}
