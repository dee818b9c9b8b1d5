mod common;

use common::{Operation, RegisterMap};
use edge_sensors::ads1015::registers::{
    CONFIG_DEFAULT, REG_CONFIG, REG_CONVERSION, REG_HI_THRESH, REG_LO_THRESH,
};
use edge_sensors::ads1015::{
    Ads1015, Ads1015Config, ComparatorMode, ComparatorPolarity, ComparatorQueue, FullScaleRange,
    Input, SampleRate,
};
use edge_sensors::{ConfigError, Error, LifecycleError};

fn adc(map: &RegisterMap) -> Ads1015<RegisterMap> {
    Ads1015::new(map.clone(), Ads1015Config::default())
}

#[test]
fn conversion_extremes_in_volts() {
    let map = RegisterMap::new().with(REG_CONVERSION, &[0x7F, 0xF0]);
    let mut adc = adc(&map);

    let top = adc.read().unwrap();
    assert!((top - 4.094).abs() < 1e-3, "got {top}");

    map.set(REG_CONVERSION, &[0x80, 0x00]);
    assert_eq!(adc.read().unwrap(), -4.096);

    map.set(REG_CONVERSION, &[0xFF, 0xF0]);
    assert_eq!(adc.read_raw().unwrap(), -1);
}

#[test]
fn configure_programs_fields_thresholds_and_starts() {
    let map = RegisterMap::new().with(REG_CONFIG, &CONFIG_DEFAULT);
    let mut adc = adc(&map);

    adc.init().unwrap();

    // Continuous mode (MODE cleared), OS set by the start request.
    assert_eq!(map.get(REG_CONFIG, 2), [0x84, 0x83]);
    assert_eq!(map.get(REG_LO_THRESH, 2), [0x08, 0x00]);
    assert_eq!(map.get(REG_HI_THRESH, 2), [0x07, 0xFF]);
}

#[test]
fn setters_leave_other_fields_untouched() {
    let map = RegisterMap::new().with(REG_CONFIG, &CONFIG_DEFAULT);
    let mut adc = adc(&map);

    adc.set_range(FullScaleRange::V0_256).unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0x8B, 0x83]);

    adc.set_single_channel(2).unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0xEB, 0x83]);

    adc.set_data_rate(SampleRate::Sps128).unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0xEB, 0x03]);

    adc.set_comparator_mode(ComparatorMode::Window).unwrap();
    adc.set_comparator_polarity(ComparatorPolarity::ActiveHigh).unwrap();
    adc.enable_latching_comparator(true).unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0xEB, 0x1F]);

    adc.set_comparator_queue(ComparatorQueue::One).unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0xEB, 0x1C]);

    adc.set_continuous(true).unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0xEA, 0x1C]);

    let config = adc.config();
    assert_eq!(config.input, Input::Ain2);
    assert_eq!(config.queue, ComparatorQueue::One);
    assert!(config.latching);
}

#[test]
fn invalid_inputs_are_rejected_before_any_write() {
    let map = RegisterMap::new().with(REG_CONFIG, &CONFIG_DEFAULT);
    let mut adc = adc(&map);

    assert_eq!(
        adc.set_differential_mode(1, 2),
        Err(Error::Config(ConfigError::InvalidChannelPair(1, 2)))
    );
    assert_eq!(
        adc.set_single_channel(4),
        Err(Error::Config(ConfigError::InvalidChannel(4)))
    );
    assert!(map.operations().is_empty());

    adc.set_differential_mode(1, 3).unwrap();
    assert_eq!(adc.config().input, Input::Ain1Ain3);
}

#[test]
fn thresholds_are_written_big_endian() {
    let map = RegisterMap::new();
    let mut adc = adc(&map);

    adc.set_lo_threshold(0x0123).unwrap();
    adc.set_hi_threshold(0x7FF0).unwrap();
    assert_eq!(
        map.writes(),
        [
            Operation::Write {
                register: REG_LO_THRESH,
                data: vec![0x01, 0x23],
            },
            Operation::Write {
                register: REG_HI_THRESH,
                data: vec![0x7F, 0xF0],
            },
        ]
    );
}

#[test]
fn start_requests_set_high_byte_flags() {
    let map = RegisterMap::new().with(REG_CONFIG, &[0x04, 0x83]);
    let mut adc = adc(&map);

    adc.start_single_shot().unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0x85, 0x83]);

    map.set(REG_CONFIG, &[0x04, 0x83]);
    adc.start_continuous().unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), [0x84, 0x83]);
}

#[test]
fn new_data_flag_is_the_os_bit() {
    let map = RegisterMap::new().with(REG_CONFIG, &[0x05, 0x83]);
    let mut adc = adc(&map);

    assert!(!adc.new_data_available().unwrap());
    map.set(REG_CONFIG, &[0x85, 0x83]);
    assert!(adc.new_data_available().unwrap());
}

#[test]
fn stop_restores_default_and_closes_bus() {
    let map = RegisterMap::new().with(REG_CONFIG, &[0x44, 0xE0]);
    let mut adc = adc(&map);

    assert_eq!(adc.stop(), Err(Error::Lifecycle(LifecycleError::NotStarted)));
    assert!(map.writes().is_empty());

    adc.start().unwrap();
    adc.stop().unwrap();
    assert_eq!(map.get(REG_CONFIG, 2), CONFIG_DEFAULT);
    assert!(map.is_closed());

    assert_eq!(adc.stop(), Err(Error::Lifecycle(LifecycleError::Stopped)));
    assert_eq!(adc.read(), Err(Error::Lifecycle(LifecycleError::Stopped)));
}
