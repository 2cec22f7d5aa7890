// ==========================================
// 汽车服务预约系统 - 车辆数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 登记语义: 车牌号冲突时幂等忽略（insert-or-ignore）
// ==========================================

use crate::db::SharedConnection;
use crate::domain::customer::RegisterOutcome;
use crate::domain::vehicle::{Vehicle, VehicleWithOwner};
use crate::repository::customer_repo::map_customer_row;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};

const VEHICLE_COLUMNS: &str = "owner_id, plate, brand, model, year, color, wrapped, repainted";

// ==========================================
// VehicleRepository - 车辆仓储
// ==========================================
pub struct VehicleRepository {
    conn: SharedConnection,
}

impl VehicleRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 登记车辆（车牌号已存在时忽略）
    ///
    /// # 返回
    /// - Ok(Created) / Ok(AlreadyExists)
    /// - Err(ForeignKeyViolation): 车主不存在
    pub fn register(&self, vehicle: &Vehicle) -> RepositoryResult<RegisterOutcome> {
        let conn = self.get_conn()?;

        let affected = conn
            .execute(
                r#"
                INSERT INTO vehicles (owner_id, plate, brand, model, year, color, wrapped, repainted)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(plate) DO NOTHING
                "#,
                params![
                    vehicle.owner_id,
                    vehicle.plate,
                    vehicle.brand,
                    vehicle.model,
                    vehicle.year,
                    vehicle.color,
                    vehicle.wrapped,
                    vehicle.repainted,
                ],
            )
            .map_err(|e| {
                tracing::error!("车辆登记失败: plate={}, err={}", vehicle.plate, e);
                RepositoryError::from(e)
            })?;

        if affected == 0 {
            tracing::debug!("车辆已存在，忽略登记: plate={}", vehicle.plate);
            return Ok(RegisterOutcome::AlreadyExists);
        }

        tracing::info!("车辆登记成功: plate={}, owner_id={:?}", vehicle.plate, vehicle.owner_id);
        Ok(RegisterOutcome::Created)
    }

    /// 删除车辆（级联删除其预约）
    pub fn delete(&self, plate: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM vehicles WHERE plate = ?1", params![plate])?;
        Ok(affected > 0)
    }

    pub fn find_by_plate(&self, plate: &str) -> RepositoryResult<Option<Vehicle>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM vehicles WHERE plate = ?1", VEHICLE_COLUMNS);

        let vehicle = conn
            .query_row(&sql, params![plate], |row| map_vehicle_row(row, 0))
            .optional()?;
        Ok(vehicle)
    }

    pub fn list_by_owner(&self, owner_id: i64) -> RepositoryResult<Vec<Vehicle>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM vehicles WHERE owner_id = ?1 ORDER BY plate",
            VEHICLE_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let vehicles = stmt
            .query_map(params![owner_id], |row| map_vehicle_row(row, 0))?
            .collect::<SqliteResult<Vec<Vehicle>>>()?;
        Ok(vehicles)
    }

    /// 按车牌查询车辆及车主（车主缺失时 owner 为 None）
    pub fn find_with_owner_by_plate(&self, plate: &str) -> RepositoryResult<Option<VehicleWithOwner>> {
        let conn = self.get_conn()?;

        let found = conn
            .query_row(
                r#"
                SELECT
                    v.owner_id, v.plate, v.brand, v.model, v.year, v.color, v.wrapped, v.repainted,
                    c.id, c.external_id, c.handle, c.name, c.phone
                FROM vehicles v
                LEFT JOIN customers c ON c.id = v.owner_id
                WHERE v.plate = ?1
                "#,
                params![plate],
                |row| {
                    let vehicle = map_vehicle_row(row, 0)?;
                    let owner_id: Option<i64> = row.get(8)?;
                    let owner = match owner_id {
                        Some(_) => Some(map_customer_row(row, 8)?),
                        None => None,
                    };
                    Ok(VehicleWithOwner { vehicle, owner })
                },
            )
            .optional()?;

        Ok(found)
    }
}

/// 从指定列偏移映射 Vehicle（列顺序同 VEHICLE_COLUMNS）
pub(crate) fn map_vehicle_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        owner_id: row.get(offset)?,
        plate: row.get(offset + 1)?,
        brand: row.get(offset + 2)?,
        model: row.get(offset + 3)?,
        year: row.get(offset + 4)?,
        color: row.get(offset + 5)?,
        wrapped: row.get(offset + 6)?,
        repainted: row.get(offset + 7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{into_shared, open_in_memory};
    use crate::domain::customer::NewCustomer;
    use crate::repository::customer_repo::CustomerRepository;

    fn setup() -> (CustomerRepository, VehicleRepository, i64) {
        let conn = into_shared(open_in_memory().unwrap());
        let customers = CustomerRepository::new(conn.clone());
        let vehicles = VehicleRepository::new(conn);
        customers.register(&NewCustomer::new("Олег", "+7100")).unwrap();
        let owner_id = customers.find_by_phone("+7100").unwrap().unwrap().id;
        (customers, vehicles, owner_id)
    }

    #[test]
    fn test_register_and_find_by_plate() {
        let (_customers, vehicles, owner_id) = setup();
        let car = Vehicle::new("A123BC", owner_id, "Toyota", "Camry")
            .year(2019)
            .color("black")
            .wrapped(true);

        assert_eq!(vehicles.register(&car).unwrap(), RegisterOutcome::Created);
        let found = vehicles.find_by_plate("A123BC").unwrap().unwrap();
        assert_eq!(found, car);
    }

    #[test]
    fn test_register_duplicate_plate_is_noop() {
        let (_customers, vehicles, owner_id) = setup();
        vehicles.register(&Vehicle::new("A123BC", owner_id, "Toyota", "Camry")).unwrap();
        let second = vehicles
            .register(&Vehicle::new("A123BC", owner_id, "BMW", "X5"))
            .unwrap();
        assert_eq!(second, RegisterOutcome::AlreadyExists);
        assert_eq!(vehicles.find_by_plate("A123BC").unwrap().unwrap().brand, "Toyota");
    }

    #[test]
    fn test_register_with_unknown_owner_fails() {
        let (_customers, vehicles, owner_id) = setup();
        let err = vehicles
            .register(&Vehicle::new("Z999ZZ", owner_id + 100, "Lada", "Vesta"))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_list_by_owner_and_composite_reads() {
        let (customers, vehicles, owner_id) = setup();
        vehicles.register(&Vehicle::new("B222BB", owner_id, "Kia", "Rio")).unwrap();
        vehicles.register(&Vehicle::new("A111AA", owner_id, "Kia", "Ceed")).unwrap();

        let listed = vehicles.list_by_owner(owner_id).unwrap();
        let plates: Vec<&str> = listed.iter().map(|v| v.plate.as_str()).collect();
        assert_eq!(plates, vec!["A111AA", "B222BB"]);
        assert!(vehicles.list_by_owner(owner_id + 1).unwrap().is_empty());

        let with_owner = vehicles.find_with_owner_by_plate("B222BB").unwrap().unwrap();
        assert_eq!(with_owner.owner.unwrap().phone, "+7100");

        let with_cars = customers.find_with_vehicles_by_phone("+7100").unwrap().unwrap();
        assert_eq!(with_cars.vehicles.len(), 2);
        assert!(vehicles.find_with_owner_by_plate("NONE").unwrap().is_none());
    }

    #[test]
    fn test_delete_customer_cascades_vehicles() {
        let (customers, vehicles, owner_id) = setup();
        vehicles.register(&Vehicle::new("A111AA", owner_id, "Kia", "Ceed")).unwrap();

        assert!(customers.delete(owner_id).unwrap());
        assert!(vehicles.find_by_plate("A111AA").unwrap().is_none());
    }
}
