use core::{
    hint,
    sync::atomic::{
        AtomicBool,
        AtomicU32,
        AtomicU64,
        Ordering,
    },
};

use crate::{
    error::Result,
    log::{
        debug,
        error,
        info,
        warn,
    },
    notify::{
        AtomicNotification,
        Callback,
        Notifiable,
        trampoline,
    },
    platform::Platform,
};

use super::{
    BackupDelta,
    Instant,
    MSECS_PER_SEC,
    TickScale,
    USECS_PER_MSEC,
    scale::AtomicTickScale,
};

// Used in docs.
#[allow(unused)]
use crate::platform::{
    BackupClock,
    Cooperative,
    CoreClock,
    Deferred,
    TickTimer,
};

/// Программные часы поверх периодического таймера тиков [`TickTimer`],
/// которые переживают его выключение благодаря резервным часам [`BackupClock`].
///
/// Таймер настраивается на прерывание раз в номинальную миллисекунду,
/// обработчик которого должен вызывать [`SysTick::tick()`].
/// Предполагается ровно один экземпляр на всю программу, обычно в `static`:
/// [`SysTick::new()`] доступна в константном контексте,
/// а [`SysTick`] реализует [`Sync`], если его реализует платформа.
///
/// Состояние разделяется между основным контекстом и обработчиком прерывания таймера,
/// который может вытеснить основной контекст в любой момент.
/// Блокировки из обработчика прерывания брать нельзя,
/// поэтому у каждого поля ровно один писатель,
/// а согласованность чтения обеспечивается повторными попытками,
/// как в [`SysTick::micros()`], или порядком записей, как в [`SysTick::notify()`].
#[derive(Debug)]
pub struct SysTick<P> {
    /// Счётчик микросекунд. Увеличивается на `1000` с каждым тиком.
    micros: AtomicU64,

    /// Счётчик миллисекунд. Увеличивается на `1` с каждым тиком.
    millis: AtomicU64,

    /// Показания резервных часов в момент последнего [`SysTick::disable()`].
    saved_backup_count: AtomicU64,

    /// Константы пересчёта для текущей тактовой частоты.
    scale: AtomicTickScale,

    /// Накопитель дробной части миллисекунды в тактах, всегда меньше `1000`.
    /// Переполняясь, удлиняет очередной период таймера на один такт.
    accumulator: AtomicU32,

    /// Зарегистрированная функция оповещения о тиках.
    notification: AtomicNotification,

    /// Таймер настроен и считает.
    running: AtomicBool,

    /// Таймер, резервные часы и прочие внешние компоненты.
    platform: P,
}

impl<P> SysTick<P> {
    /// Создаёт часы поверх `platform`.
    /// Перед использованием их нужно запустить методом [`SysTick::initialize()`].
    pub const fn new(platform: P) -> Self {
        Self {
            micros: AtomicU64::new(0),
            millis: AtomicU64::new(0),
            saved_backup_count: AtomicU64::new(0),
            scale: AtomicTickScale::new(),
            accumulator: AtomicU32::new(0),
            notification: AtomicNotification::new(),
            running: AtomicBool::new(false),
            platform,
        }
    }

    /// Внешние компоненты, на которых работают часы.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Константы пересчёта для текущей тактовой частоты.
    pub fn scale(&self) -> TickScale {
        self.scale.load()
    }

    /// Возвращает `true`, если таймер тиков запущен.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Количество миллисекунд с момента [`SysTick::initialize()`].
    ///
    /// Чтение одного выровненного слова, дополнительной синхронизации не требует.
    pub fn millis(&self) -> u64 {
        self.millis.load(Ordering::Acquire)
    }

    /// Заменяет функцию оповещения о тиках на `callback` с контекстом `context`.
    /// Значение [`None`] в `callback` отключает оповещение.
    ///
    /// После каждого тика `callback(context, millis)` ставится в очередь
    /// отложенных вызовов [`Deferred`], синхронно из прерывания она не вызывается.
    /// Обработчик прерывания никогда не увидит новую функцию в паре со старым контекстом.
    pub fn notify(
        &self,
        callback: Option<Callback>,
        context: usize,
    ) {
        self.notification.store(callback, context);
    }

    /// Заменяет получателя оповещений о тиках на `notifiable`.
    /// Значение [`None`] отключает оповещение.
    pub fn notify_with<N: Notifiable>(
        &self,
        notifiable: Option<&'static N>,
    ) {
        match notifiable {
            Some(notifiable) => {
                self.notification.store(Some(trampoline::<N>), notifiable as *const N as usize)
            },
            None => self.notification.store(None, 0),
        }
    }
}

impl<P: Platform> SysTick<P> {
    /// Запускает часы с приоритетом прерывания таймера `priority`.
    ///
    /// Вычисляет константы пересчёта для текущей тактовой частоты,
    /// обнуляет счётчики и настраивает таймер на период в номинальную миллисекунду.
    ///
    /// Возвращает ошибку [`Error::InvalidArgument`](crate::Error::InvalidArgument),
    /// если тактовая частота таймера не превышает `1000` Гц.
    /// Таймер в этом случае не трогается.
    pub fn initialize(
        &self,
        priority: u8,
    ) -> Result<()> {
        let frequency = self.platform.frequency();
        let scale = TickScale::new(frequency).inspect_err(|error| {
            error!(?error, frequency, "unsupported tick timer frequency");
        })?;

        self.platform.stop();
        self.platform.set_priority(priority);

        self.scale.store(scale);
        self.accumulator.store(0, Ordering::Relaxed);
        self.millis.store(0, Ordering::Release);
        self.micros.store(0, Ordering::Release);

        self.platform.set_counter(scale.reload());
        self.platform.set_reload(scale.reload());
        self.platform.start();
        self.running.store(true, Ordering::Relaxed);

        info!(
            frequency = %scale.frequency(),
            cycle = scale.cycle(),
            fraction = scale.fraction(),
            priority,
            "tick timer initialized"
        );

        Ok(())
    }

    /// Обработчик прерывания таймера тиков.
    /// Должен вызываться ровно один раз на каждый период таймера.
    ///
    /// Если частота не кратна тысяче, распределяет лишние такты по периодам:
    /// каждый раз, когда накопитель дробной части переваливает за `1000`,
    /// следующий период удлиняется на один такт.
    /// Так средний период в точности равен миллисекунде,
    /// а накопленное расхождение не превышает одного такта таймера.
    pub fn tick(&self) {
        self.micros.fetch_add(USECS_PER_MSEC, Ordering::Release);
        let millis = self.millis.fetch_add(1, Ordering::Release) + 1;

        let scale = self.scale.load();
        if scale.fraction() != 0 {
            let mut accumulator = self.accumulator.load(Ordering::Relaxed) + scale.fraction();

            let reload = if accumulator >= MSECS_PER_SEC {
                accumulator -= MSECS_PER_SEC;
                scale.reload() + 1
            } else {
                scale.reload()
            };

            self.accumulator.store(accumulator, Ordering::Relaxed);
            self.platform.set_reload(reload);
        }

        if let Some((callback, context)) = self.notification.load() {
            self.platform.schedule(callback, context, millis);
        }
    }

    /// Количество микросекунд с момента [`SysTick::initialize()`].
    ///
    /// Дополняет счётчик микросекунд тактами, прошедшими с начала текущего периода таймера.
    /// Если между чтением счётчика микросекунд и счётчика таймера случился тик,
    /// пара читается заново.
    /// Результат меньше, чем `micros + 1000`, где `micros` --- значение счётчика микросекунд.
    pub fn micros(&self) -> u64 {
        let (micros, counter) = loop {
            let micros = self.micros.load(Ordering::Acquire);
            let counter = self.platform.counter();

            if micros == self.micros.load(Ordering::Acquire) {
                break (micros, counter);
            }

            hint::spin_loop();
        };

        let scale = self.scale.load();

        micros + u64::from(scale.offset_to_micros(scale.offset(counter)))
    }

    /// Кооперативно ждёт, пока не пройдёт `duration` миллисекунд,
    /// уступая процессор через [`Cooperative::yield_now()`].
    ///
    /// Отсчёт ведётся от показаний [`SysTick::millis()`] в момент вызова,
    /// поэтому на самом деле проходит от `duration` до `duration + 1` миллисекунды.
    /// Процессор уступается хотя бы один раз, даже если `duration` равна нулю.
    pub fn delay(
        &self,
        duration: u32,
    ) {
        let start = Instant::now(self);

        loop {
            self.platform.yield_now();

            if start.has_passed(self, duration.into()) {
                break;
            }
        }
    }

    /// Останавливает таймер тиков перед переходом в режим пониженного энергопотребления
    /// и запоминает показания резервных часов.
    ///
    /// Вызывающая сторона должна гарантировать,
    /// что прерывание таймера не выполняется одновременно с этим методом.
    pub fn disable(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            warn!("tick timer is already disabled");
            return;
        }

        self.platform.stop();

        let backup_count = self.platform.count();
        self.saved_backup_count.store(backup_count, Ordering::Relaxed);

        debug!(backup_count, millis = self.millis(), "tick timer disabled");
    }

    /// Снова запускает таймер тиков после выхода из режима пониженного энергопотребления.
    ///
    /// - Пересчитывает константы для новой тактовой частоты,
    ///   если она изменилась, пока таймер был выключен.
    ///   Пропорционально переносит смещение внутри прерванной миллисекунды в такты новой частоты.
    /// - Переводит показания резервных часов за время простоя в целые миллисекунды,
    ///   которые добавляются к счётчикам, и остаток в тактах таймера.
    /// - Настраивает счётчик таймера так, чтобы следующий тик пришёлся на правильную фазу.
    ///
    /// Вызывающая сторона должна гарантировать,
    /// что прерывание таймера не выполняется одновременно с этим методом.
    ///
    /// Возвращает ошибку [`Error::InvalidArgument`](crate::Error::InvalidArgument),
    /// если новая тактовая частота не превышает `1000` Гц.
    /// Таймер в этом случае остаётся выключенным, а состояние часов --- прежним.
    pub fn enable(&self) -> Result<()> {
        if self.is_running() {
            warn!("tick timer is already enabled");
            return Ok(());
        }

        let frequency = self.platform.frequency();
        let scale = TickScale::new(frequency).inspect_err(|error| {
            error!(?error, frequency, "unsupported tick timer frequency");
        })?;

        let old = self.scale.load();
        let offset = scale.rescale(old.offset(self.platform.counter()), &old);

        if scale.fraction() != old.fraction() {
            self.accumulator.store(0, Ordering::Relaxed);
        }
        self.scale.store(scale);

        let backup_delta = self
            .platform
            .count()
            .wrapping_sub(self.saved_backup_count.load(Ordering::Relaxed));
        let delta = BackupDelta::new(backup_delta, P::FREQUENCY_SHIFT, scale.cycle());

        // Both terms are below `cycle`, so at most one millisecond carries over.
        let mut offset = offset + delta.remainder_counts();
        let mut millis = self.millis.load(Ordering::Relaxed);
        while offset >= scale.cycle() {
            millis += 1;
            offset -= scale.cycle();
        }

        millis += delta.whole_millis();
        self.millis.store(millis, Ordering::Release);
        self.micros.store(millis * USECS_PER_MSEC, Ordering::Release);

        self.platform.set_counter(scale.reload() - offset);
        self.platform.set_reload(scale.reload());
        self.platform.start();
        self.running.store(true, Ordering::Relaxed);

        debug!(
            frequency = %scale.frequency(),
            backup_delta,
            slept_millis = delta.whole_millis(),
            offset,
            millis,
            "tick timer enabled"
        );

        Ok(())
    }
}
