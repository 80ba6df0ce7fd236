#![deny(warnings)]

use std::time::Duration;

use rstest::rstest;

use systick::{
    Instant,
    SysTick,
};

use platform::{
    Clock,
    MockPlatform,
    run,
};

mod log;
mod platform;

/// Тактов таймера за одну уступку процессора, четверть миллисекунды.
const COUNTS_PER_YIELD: u64 = 20_000;

#[rstest]
#[timeout(Duration::from_secs(1))]
fn delay() {
    static CLOCK: Clock = SysTick::new(MockPlatform::new(80_000_000));

    CLOCK.initialize(3).unwrap();
    run(&CLOCK, 1_000 * 80_000);
    assert_eq!(CLOCK.millis(), 1_000);

    CLOCK.platform().set_yield_hook(|| {
        run(&CLOCK, COUNTS_PER_YIELD);
    });

    CLOCK.delay(50);

    assert!(CLOCK.millis() >= 1_050);
    assert!(CLOCK.millis() < 1_051);
    assert_eq!(CLOCK.platform().yields(), 50 * 4);
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn delay_from_the_middle_of_a_millisecond() {
    static CLOCK: Clock = SysTick::new(MockPlatform::new(80_000_000));

    CLOCK.initialize(3).unwrap();
    run(&CLOCK, 60_000);

    CLOCK.platform().set_yield_hook(|| {
        run(&CLOCK, COUNTS_PER_YIELD);
    });

    let start = CLOCK.micros();
    CLOCK.delay(10);
    let elapsed = CLOCK.micros() - start;

    assert_eq!(CLOCK.millis(), 10);
    assert!((9_000 .. 10_000).contains(&elapsed), "elapsed {elapsed} us");
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn zero_delay_yields_once() {
    static CLOCK: Clock = SysTick::new(MockPlatform::new(80_000_000));

    CLOCK.initialize(3).unwrap();
    let start = Instant::now(&CLOCK);

    CLOCK.delay(0);

    assert_eq!(CLOCK.platform().yields(), 1);
    assert_eq!(start.elapsed(&CLOCK), 0);
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn delay_runs_while_other_work_ticks() {
    static CLOCK: Clock = SysTick::new(MockPlatform::new(1_000_005));

    CLOCK.initialize(3).unwrap();
    CLOCK.platform().set_yield_hook(|| {
        run(&CLOCK, 777);
    });

    for duration in [1, 2, 5, 13] {
        let start = Instant::now(&CLOCK);
        CLOCK.delay(duration);
        let elapsed = start.elapsed(&CLOCK);

        assert!(elapsed >= u64::from(duration));
        assert!(elapsed <= u64::from(duration) + 1);
    }
}

#[ctor::ctor]
fn init() {
    log::init();
}
