// ==========================================
// 记录存储集成测试
// ==========================================
// 测试目标: 幂等登记、手机号唯一、级联删除、组合查询
// ==========================================

mod test_helpers;

use autoservice_booking::{NewCustomer, RegisterOutcome, RepositoryError, Vehicle};
use test_helpers::{add_vehicle, booking_row_count, date, default_state, seed_customer_with_vehicle};

#[test]
fn test_register_customer_is_idempotent_by_phone() {
    let (_temp_file, state) = default_state();

    let first = state
        .customer_repo
        .register(&NewCustomer::new("Иван", "+7001").with_external(100, Some("ivan")))
        .unwrap();
    assert_eq!(first, RegisterOutcome::Created);
    assert!(first.is_created());

    let second = state
        .customer_repo
        .register(&NewCustomer::new("Другое имя", "+7001"))
        .unwrap();
    assert_eq!(second, RegisterOutcome::AlreadyExists);
    assert!(!second.is_created());

    let stored = state.customer_repo.find_by_phone("+7001").unwrap().unwrap();
    assert_eq!(stored.name, "Иван");
    assert_eq!(stored.external_id, Some(100));
    assert_eq!(stored.handle.as_deref(), Some("ivan"));

    let by_external = state.customer_repo.find_by_external_id(100).unwrap().unwrap();
    assert_eq!(by_external.id, stored.id);
}

#[test]
fn test_change_phone_to_taken_number_leaves_both_unchanged() {
    let (_temp_file, state) = default_state();
    state.customer_repo.register(&NewCustomer::new("Иван", "+7001")).unwrap();
    state.customer_repo.register(&NewCustomer::new("Мария", "+7002")).unwrap();

    let err = state.customer_repo.change_phone("+7001", "+7002").unwrap_err();
    assert!(matches!(err, RepositoryError::DuplicateKey { .. }));

    assert_eq!(state.customer_repo.find_by_phone("+7001").unwrap().unwrap().name, "Иван");
    assert_eq!(state.customer_repo.find_by_phone("+7002").unwrap().unwrap().name, "Мария");

    assert!(state.customer_repo.change_phone("+7001", "+7003").unwrap());
    assert!(state.customer_repo.find_by_phone("+7001").unwrap().is_none());
    assert_eq!(state.customer_repo.find_by_phone("+7003").unwrap().unwrap().name, "Иван");

    assert!(!state.customer_repo.change_phone("+7999", "+7004").unwrap());
}

#[test]
fn test_register_vehicle_is_idempotent_by_plate() {
    let (_temp_file, state) = default_state();
    let owner_id = seed_customer_with_vehicle(&state, "Иван", "+7001", "X001AA", "Lada");

    let again = state
        .vehicle_repo
        .register(&Vehicle::new("X001AA", owner_id, "BMW", "X5"))
        .unwrap();
    assert_eq!(again, RegisterOutcome::AlreadyExists);
    assert_eq!(state.vehicle_repo.find_by_plate("X001AA").unwrap().unwrap().brand, "Lada");
}

#[test]
fn test_vehicle_for_unknown_owner_is_rejected() {
    let (_temp_file, state) = default_state();
    let err = state
        .vehicle_repo
        .register(&Vehicle::new("X001AA", 404, "Lada", "Vesta"))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
}

#[test]
fn test_customer_delete_cascades_to_vehicles_and_bookings() {
    let (_temp_file, state) = default_state();
    let owner_id = seed_customer_with_vehicle(&state, "Иван", "+7001", "X001AA", "Lada");
    add_vehicle(&state, owner_id, "X002AA", "Kia");
    let other = seed_customer_with_vehicle(&state, "Мария", "+7002", "Y001BB", "Kia");

    state.allocator.allocate(date(2025, 6, 1), "X001AA", "ТО").unwrap();
    state.allocator.allocate(date(2025, 6, 1), "X002AA", "ТО").unwrap();
    state.allocator.allocate(date(2025, 6, 1), "Y001BB", "ТО").unwrap();
    assert_eq!(booking_row_count(&state), 3);

    assert!(state.customer_repo.delete(owner_id).unwrap());

    assert!(state.vehicle_repo.list_by_owner(owner_id).unwrap().is_empty());
    assert!(state.vehicle_repo.find_by_plate("X001AA").unwrap().is_none());
    assert_eq!(booking_row_count(&state), 1);
    assert_eq!(state.vehicle_repo.list_by_owner(other).unwrap().len(), 1);
}

#[test]
fn test_vehicle_delete_cascades_to_bookings() {
    let (_temp_file, state) = default_state();
    seed_customer_with_vehicle(&state, "Иван", "+7001", "X001AA", "Lada");
    state.allocator.allocate(date(2025, 6, 1), "X001AA", "ТО").unwrap();

    assert!(state.vehicle_repo.delete("X001AA").unwrap());
    assert_eq!(booking_row_count(&state), 0);
    assert!(!state.vehicle_repo.delete("X001AA").unwrap());
}

#[test]
fn test_composite_reads() {
    let (_temp_file, state) = default_state();
    let owner_id = seed_customer_with_vehicle(&state, "Иван", "+7001", "X002AA", "Lada");
    add_vehicle(&state, owner_id, "X001AA", "Kia");
    state.customer_repo.register(&NewCustomer::new("Без машины", "+7009")).unwrap();

    let with_vehicles = state
        .customer_repo
        .find_with_vehicles_by_phone("+7001")
        .unwrap()
        .unwrap();
    assert_eq!(with_vehicles.customer.id, owner_id);
    let plates: Vec<&str> = with_vehicles.vehicles.iter().map(|v| v.plate.as_str()).collect();
    assert_eq!(plates.len(), 2);
    assert!(plates.contains(&"X001AA"));
    assert!(plates.contains(&"X002AA"));

    let empty = state
        .customer_repo
        .find_with_vehicles_by_phone("+7009")
        .unwrap()
        .unwrap();
    assert!(empty.vehicles.is_empty());

    assert!(state.customer_repo.find_with_vehicles_by_phone("+7404").unwrap().is_none());

    let with_owner = state
        .vehicle_repo
        .find_with_owner_by_plate("X001AA")
        .unwrap()
        .unwrap();
    assert_eq!(with_owner.vehicle.brand, "Kia");
    assert_eq!(with_owner.owner.unwrap().phone, "+7001");
}
