#![allow(dead_code)]

use std::{
    mem,
    sync::{
        Mutex,
        atomic::{
            AtomicBool,
            AtomicU8,
            AtomicU32,
            AtomicU64,
            AtomicUsize,
            Ordering,
        },
    },
};

use systick::{
    BackupClock,
    Callback,
    Cooperative,
    CoreClock,
    Deferred,
    SysTick,
    TickTimer,
};

/// Часы поверх имитации платформы.
pub type Clock = SysTick<MockPlatform>;

/// Частота часового кварца резервных часов, 32768 Гц.
pub const LSE_SHIFT: u32 = 15;

/// Количество тиков резервных часов в секунде.
pub const LSE_PER_SEC: u64 = 1 << LSE_SHIFT;

/// Вызов, поставленный в очередь отложенных вызовов.
#[derive(Clone, Copy, Debug)]
pub struct Scheduled {
    pub routine: Callback,
    pub context: usize,
    pub argument: u64,
}

impl Scheduled {
    pub fn run(&self) {
        (self.routine)(self.context, self.argument);
    }
}

/// Имитация таймера тиков, резервных часов, источника частоты,
/// отложенных вызовов и уступки процессора.
#[derive(Debug)]
pub struct MockPlatform {
    backup: AtomicU64,
    counter: AtomicU32,
    frequency: AtomicU32,
    priority: AtomicU8,
    reload: AtomicU32,
    running: AtomicBool,
    scheduled: Mutex<Vec<Scheduled>>,
    yield_hook: Mutex<Option<fn()>>,
    yields: AtomicUsize,
}

impl MockPlatform {
    pub const fn new(frequency: u32) -> Self {
        Self {
            backup: AtomicU64::new(0),
            counter: AtomicU32::new(0),
            frequency: AtomicU32::new(frequency),
            priority: AtomicU8::new(0),
            reload: AtomicU32::new(0),
            running: AtomicBool::new(false),
            scheduled: Mutex::new(Vec::new()),
            yield_hook: Mutex::new(None),
            yields: AtomicUsize::new(0),
        }
    }

    pub fn set_frequency(
        &self,
        frequency: u32,
    ) {
        self.frequency.store(frequency, Ordering::Relaxed);
    }

    pub fn advance_backup(
        &self,
        ticks: u64,
    ) {
        self.backup.fetch_add(ticks, Ordering::Relaxed);
    }

    pub fn reload(&self) -> u32 {
        self.reload.load(Ordering::Relaxed)
    }

    pub fn priority(&self) -> u8 {
        self.priority.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn yields(&self) -> usize {
        self.yields.load(Ordering::Relaxed)
    }

    pub fn set_yield_hook(
        &self,
        hook: fn(),
    ) {
        *self.yield_hook.lock().unwrap() = Some(hook);
    }

    pub fn take_scheduled(&self) -> Vec<Scheduled> {
        mem::take(&mut *self.scheduled.lock().unwrap())
    }
}

impl BackupClock for MockPlatform {
    const FREQUENCY_SHIFT: u32 = LSE_SHIFT;

    fn count(&self) -> u64 {
        self.backup.load(Ordering::Relaxed)
    }
}

impl Cooperative for MockPlatform {
    fn yield_now(&self) {
        self.yields.fetch_add(1, Ordering::Relaxed);

        let hook = *self.yield_hook.lock().unwrap();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl CoreClock for MockPlatform {
    fn frequency(&self) -> u32 {
        self.frequency.load(Ordering::Relaxed)
    }
}

impl Deferred for MockPlatform {
    fn schedule(
        &self,
        routine: Callback,
        context: usize,
        argument: u64,
    ) {
        self.scheduled.lock().unwrap().push(Scheduled {
            routine,
            context,
            argument,
        });
    }
}

impl TickTimer for MockPlatform {
    fn set_priority(
        &self,
        priority: u8,
    ) {
        self.priority.store(priority, Ordering::Relaxed);
    }

    fn counter(&self) -> u32 {
        self.counter.load(Ordering::Acquire)
    }

    fn set_counter(
        &self,
        counter: u32,
    ) {
        self.counter.store(counter, Ordering::Release);
    }

    fn set_reload(
        &self,
        reload: u32,
    ) {
        self.reload.store(reload, Ordering::Relaxed);
    }

    fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Прокручивает таймер часов `clock` на `counts` тактов.
/// Как и настоящий таймер, досчитав до нуля, перезагружает счётчик и вызывает прерывание.
///
/// Возвращает количество случившихся тиков.
pub fn run(
    clock: &Clock,
    mut counts: u64,
) -> u64 {
    let timer = clock.platform();
    let mut ticks = 0;

    while counts > 0 && timer.is_running() {
        let counter = u64::from(timer.counter());

        if counts <= counter {
            timer.set_counter((counter - counts) as u32);
            counts = 0;
        } else {
            counts -= counter + 1;
            timer.set_counter(timer.reload());
            clock.tick();
            ticks += 1;
        }
    }

    ticks
}

/// Возвращает запущенные часы с тактовой частотой `frequency`.
pub fn initialized(frequency: u32) -> Clock {
    let clock = SysTick::new(MockPlatform::new(frequency));
    clock.initialize(3).unwrap();
    clock
}
