// ==========================================
// 并发工位分配测试
// ==========================================
// 测试目标: 多个进程内连接同时分配同一天，工位不重复且不超额
// ==========================================

mod test_helpers;

use autoservice_booking::{AppState, BookingConfig};
use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;
use test_helpers::{create_test_db, date, seed_customer_with_vehicle};

#[test]
fn test_concurrent_allocation_never_double_books() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let seed_state = AppState::from_config(BookingConfig {
        db_path: db_path.clone(),
        ..BookingConfig::default()
    })
    .unwrap();
    seed_customer_with_vehicle(&seed_state, "Иван", "+7001", "X001AA", "Lada");

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let mut handles = Vec::new();

    for i in 0..threads {
        let barrier = Arc::clone(&barrier);
        let db_path = db_path.clone();
        handles.push(thread::spawn(move || {
            // 每个线程独立连接，模拟多个进程
            let state = AppState::from_config(BookingConfig {
                db_path,
                ..BookingConfig::default()
            })
            .unwrap();
            barrier.wait();
            state
                .allocator
                .allocate(date(2025, 6, 1), "X001AA", &format!("поток {}", i))
                .unwrap()
        }));
    }

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let bays: Vec<u32> = outcomes
        .iter()
        .filter_map(|o| o.booking().map(|b| b.bay_number))
        .collect();

    assert_eq!(bays.len(), 5);
    let distinct: BTreeSet<u32> = bays.iter().copied().collect();
    assert_eq!(distinct, (1..=5).collect::<BTreeSet<u32>>());
    assert_eq!(outcomes.iter().filter(|o| !o.is_allocated()).count(), threads - 5);
    assert_eq!(seed_state.reporting.count_total().unwrap(), 5);
}

#[test]
fn test_shared_state_across_threads() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = Arc::new(
        AppState::from_config(BookingConfig {
            db_path,
            ..BookingConfig::default()
        })
        .unwrap(),
    );
    seed_customer_with_vehicle(&state, "Иван", "+7001", "X001AA", "Lada");

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let state = Arc::clone(&state);
            thread::spawn(move || state.allocator.allocate(date(2025, 6, 2), "X001AA", "ТО").unwrap())
        })
        .collect();

    let allocated = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|o| o.is_allocated())
        .count();
    assert_eq!(allocated, 5);
    assert_eq!(state.availability.free_bays(date(2025, 6, 2)).unwrap(), 0);
}
