use fwobject::{
    Error,
    arena::Arena,
    };


fn logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// pin configuration as a board would place it in flash
#[derive(Debug, PartialEq)]
struct Pins {
    tx: u8,
    rx: u8,
}
static UART1_PINS: Pins = Pins {tx: 9, rx: 10};
static UART2_PINS: Pins = Pins {tx: 2, rx: 3};
static MOTOR_PWM: u32 = 20_000;


#[test]
fn allocations_are_monotonic() {
    logger();
    let mut arena = Arena::<256>::new();
    arena.init();

    let sizes = [1, 4, 5, 3, 8, 13];
    let mut last_end = 0;
    let mut expected = 0;
    for size in sizes {
        let allocation = arena.allocate(size).unwrap();
        assert_eq!(allocation.offset(), last_end, "blocks are contiguous");
        assert_eq!(allocation.offset() % 4, 0);
        assert_eq!(allocation.size(), size.next_multiple_of(4));
        assert!(allocation.size() >= size);
        last_end = allocation.range().end;
        expected += size.next_multiple_of(4);
        assert_eq!(arena.allocated(), expected);
    }
    assert_eq!(arena.remaining(), 256 - expected);
}

#[test]
fn allocation_ceiling() {
    logger();
    let mut arena = Arena::<16>::new();
    arena.init();

    arena.allocate(10).unwrap();
    assert_eq!(arena.allocate(5), Err(Error::OutOfMemory));
    // a failed allocation does not move the cursor
    assert_eq!(arena.allocated(), 12);
    arena.allocate(4).unwrap();
    assert_eq!(arena.remaining(), 0);
    assert_eq!(arena.allocate(1), Err(Error::OutOfMemory));
    assert_eq!(arena.allocate(usize::MAX), Err(Error::OutOfMemory));
}

#[test]
fn allocation_requires_init() {
    logger();
    let mut arena = Arena::<16>::new();
    assert!(!arena.is_initialized());
    assert!(matches!(arena.allocate(4), Err(Error::InvalidState(_))));
    arena.init();
    assert!(matches!(arena.allocate(0), Err(Error::InvalidArgument(_))));
}

#[test]
fn allocated_blocks_are_usable() {
    logger();
    let mut arena = Arena::<32>::new();
    arena.init();

    let first = arena.allocate(3).unwrap();
    let second = arena.allocate(4).unwrap();
    arena.bytes_mut(first).unwrap().copy_from_slice(&[1, 2, 3, 0]);
    arena.bytes_mut(second).unwrap().fill(0xff);
    assert_eq!(arena.bytes(first).unwrap(), &[1, 2, 3, 0]);
    assert_eq!(arena.bytes(second).unwrap(), &[0xff; 4]);

    // block from a bigger heap
    let mut other = Arena::<64>::new();
    other.init();
    other.allocate(60).unwrap();
    let foreign = other.allocate(4).unwrap();
    assert!(arena.bytes(foreign).is_none());
}

#[test]
fn init_keeps_state() {
    logger();
    let mut arena = Arena::<64>::new();
    arena.init();
    let block = arena.allocate(6).unwrap();
    arena.bytes_mut(block).unwrap()[0] = 42;
    arena.register_data("pins", &UART1_PINS).unwrap();

    // warm reboot
    arena.init();
    assert!(arena.is_initialized());
    assert_eq!(arena.allocated(), 8);
    assert_eq!(arena.bytes(block).unwrap()[0], 42);
    assert_eq!(arena.lookup::<Pins>("pins"), Some(&UART1_PINS));
    assert_eq!(arena.allocate(4).unwrap().offset(), 8);
}

#[test]
fn named_data_last_write_wins() {
    logger();
    let mut arena = Arena::<16>::new();
    arena.init();

    assert!(arena.lookup_data("uart").is_none());
    arena.register_data("uart", &UART1_PINS).unwrap();
    arena.register_data("pwm", &MOTOR_PWM).unwrap();
    assert_eq!(arena.lookup::<Pins>("uart"), Some(&UART1_PINS));

    arena.register_data("uart", &UART2_PINS).unwrap();
    assert_eq!(arena.lookup::<Pins>("uart"), Some(&UART2_PINS));
    assert_eq!(arena.lookup::<u32>("pwm"), Some(&20_000));
    // wrong type
    assert!(arena.lookup::<u16>("pwm").is_none());
    assert!(arena.lookup_data("can").is_none());
}

#[test]
fn named_data_truncation() {
    logger();
    let mut arena = Arena::<16>::new();
    arena.init();

    arena.register_data("motor_left", &MOTOR_PWM).unwrap();
    // only the first 7 bytes are significant
    assert!(arena.lookup_data("motor_l").is_some());
    assert!(arena.lookup_data("motor_lights").is_some());
    assert!(arena.lookup_data("motor_right").is_none());
    assert!(arena.lookup_data("motor").is_none());

    // truncation never splits a character
    arena.register_data("moteuré", &UART1_PINS).unwrap();
    assert_eq!(arena.lookup::<Pins>("moteur"), Some(&UART1_PINS));
}

#[test]
fn named_data_requires_init() {
    logger();
    let mut arena = Arena::<16>::new();
    assert!(matches!(arena.register_data("uart", &UART1_PINS), Err(Error::InvalidState(_))));
    assert!(arena.lookup_data("uart").is_none());
}

#[test]
fn named_data_capacity() {
    logger();
    let mut arena = Arena::<16>::new();
    arena.init();

    for _ in 0 .. fwobject::config::MAX_NAMED_DATA {
        arena.register_data("uart", &UART1_PINS).unwrap();
    }
    assert_eq!(arena.register_data("uart", &UART2_PINS), Err(Error::CapacityExceeded));
    assert_eq!(arena.lookup::<Pins>("uart"), Some(&UART1_PINS));
}
