use vitals::engine::Engine;
use vitals::metrics::history::MAX_POINTS;
use vitals::system::MockSource;
use vitals::system::mock::tick_sample;

fn engine(source: MockSource) -> Engine {
    Engine::new(Box::new(source), 50)
}

#[test]
fn history_holds_last_twenty_cycles_in_order() {
    let eng = engine(MockSource::typical_system());
    for _ in 0..25 {
        eng.collect().unwrap();
    }
    let history = eng.history();
    assert_eq!(history.count, MAX_POINTS);
    assert_eq!(history.max_points, MAX_POINTS);
    // Chronological: timestamps never decrease.
    for pair in history.data.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}

#[test]
fn estimator_warms_up_across_cycles() {
    let eng = engine(MockSource::typical_system().with_tick_script(vec![
        vec![tick_sample(100, 100, 800)],
        // +75 busy, +25 idle of +100 total: usage 75
        vec![tick_sample(160, 115, 825)],
    ]));
    assert_eq!(eng.collect().unwrap().cpu.usage, 0);
    assert_eq!(eng.collect().unwrap().cpu.usage, 75);
}

#[test]
fn memory_tier_scenario() {
    // 80% used memory crosses the >75 tier (deduct 30) with idle CPU on the
    // first cycle and a quiet disk.
    let eng = engine(
        MockSource::typical_system()
            .with_memory(1000, 200)
            .with_disk(1000, 900),
    );
    let stats = eng.collect().unwrap();
    assert_eq!(stats.memory.used, 800);
    assert_eq!(stats.memory.used_percentage, "80.00");
    assert_eq!(stats.cpu.usage, 0);
    assert_eq!(stats.health, 70);
}

#[test]
fn disk_failure_keeps_health_disk_neutral() {
    let eng = engine(
        MockSource::typical_system()
            .with_memory(1000, 900) // 10% used, no deduction
            .fail_disk(),
    );
    let stats = eng.collect().unwrap();
    assert!(stats.disk.is_none());
    assert_eq!(stats.health, 100);
}

#[test]
fn uptime_formatting_in_combined_snapshot() {
    let eng = engine(MockSource::typical_system().with_uptime(90_061));
    let stats = eng.collect().unwrap();
    assert_eq!(stats.uptime.seconds, 90_061);
    assert_eq!(stats.uptime.formatted.days, 1);
    assert_eq!(stats.uptime.formatted.hours, 1);
    assert_eq!(stats.uptime.formatted.minutes, 1);
    assert_eq!(stats.uptime.formatted.seconds, 1);
}

#[test]
fn load_averages_render_as_two_decimal_strings() {
    let eng = engine(MockSource::typical_system().with_load(1.5, 0.755, 0.0));
    let stats = eng.collect().unwrap();
    assert_eq!(stats.load_average.one_min, "1.50");
    assert_eq!(stats.load_average.five_min, "0.76");
    // All-zero load is a valid reading, not an error.
    assert_eq!(stats.load_average.fifteen_min, "0.00");
}

#[test]
fn history_point_tracks_first_load_average() {
    let eng = engine(MockSource::typical_system().with_load(2.25, 1.0, 0.5));
    let stats = eng.collect().unwrap();
    let point = stats.history.last().unwrap();
    assert!((point.load_avg - 2.25).abs() < f64::EPSILON);
    assert_eq!(point.cpu_usage, stats.cpu.usage);
}

#[test]
fn each_collect_returns_fresh_snapshot() {
    let eng = engine(MockSource::typical_system());
    let a = eng.collect().unwrap();
    let b = eng.collect().unwrap();
    assert_eq!(a.history.len(), 1);
    assert_eq!(b.history.len(), 2);
}
