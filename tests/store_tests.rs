//! Concurrent publish/read behavior of the shared observation store.

use std::sync::Arc;
use std::thread;

use airstation::domain::temperature::Celsius;
use airstation::domain::{AirQuality, SensorAcquisition};
use airstation::store::StationStore;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

fn climate(v: f32) -> SensorAcquisition<Celsius> {
    // Humidity is tied to temperature so a torn read is detectable.
    SensorAcquisition {
        temperature: v.into(),
        relative_humidity: v * 2.0,
    }
}

fn air_quality(v: f32) -> AirQuality {
    AirQuality {
        raw: 1,
        voltage: v,
        ratio: v,
        co2_ppm: v + 1.0,
        lpg_ppm: v + 2.0,
        co_ppm: v + 3.0,
        nh3_ppm: v + 4.0,
    }
}

#[test]
fn concurrent_writers_and_readers_never_observe_a_torn_group() {
    let store = Arc::new(StationStore::<CriticalSectionRawMutex>::new());
    let mut handles = Vec::new();

    for w in 0..2u32 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for i in 0..1_000u32 {
                let v = (w * 1_000 + i) as f32;
                store.set_climate(climate(v));
                store.set_air_quality(air_quality(v));
            }
        }));
    }

    for _ in 0..4 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..2_000 {
                if let Some(c) = store.climate() {
                    assert_eq!(c.relative_humidity, c.temperature.raw_value() * 2.0);
                }
                if let Some(a) = store.air_quality() {
                    assert_eq!(a.co2_ppm, a.ratio + 1.0);
                    assert_eq!(a.lpg_ppm, a.ratio + 2.0);
                    assert_eq!(a.co_ppm, a.ratio + 3.0);
                    assert_eq!(a.nh3_ppm, a.ratio + 4.0);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn snapshots_stay_coherent_under_concurrent_writes() {
    let store = Arc::new(StationStore::<CriticalSectionRawMutex>::new());

    let writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..1_000u32 {
                let v = i as f32;
                store.set_climate(climate(v));
                store.set_air_quality(air_quality(v));
            }
        })
    };

    for _ in 0..2_000 {
        let snapshot = store.snapshot();
        if snapshot.climate_valid {
            assert_eq!(snapshot.humidity, snapshot.temperature * 2.0);
        }
        if snapshot.air_quality_valid {
            assert_eq!(snapshot.lpg_ppm, snapshot.co2_ppm + 1.0);
        }
    }

    writer.join().unwrap();
}

#[test]
fn producers_publish_independently() {
    let store = Arc::new(StationStore::<CriticalSectionRawMutex>::new());

    let climate_writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..500u32 {
                store.set_climate(climate(i as f32));
            }
        })
    };
    let air_writer = {
        let store = store.clone();
        thread::spawn(move || {
            for i in 0..500u32 {
                store.set_air_quality(air_quality(i as f32));
            }
        })
    };

    climate_writer.join().unwrap();
    air_writer.join().unwrap();

    assert_eq!(store.climate().unwrap().temperature.raw_value(), 499.0);
    assert_eq!(store.air_quality().unwrap().ratio, 499.0);
}
