// ==========================================
// 汽车服务预约系统 - 客户数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 登记语义: 手机号冲突时幂等忽略（insert-or-ignore）
// 改号语义: 新手机号已存在时硬失败（DuplicateKey）
// ==========================================

use crate::db::SharedConnection;
use crate::domain::customer::{Customer, CustomerWithVehicles, NewCustomer, RegisterOutcome};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::vehicle_repo::map_vehicle_row;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

const CUSTOMER_COLUMNS: &str = "id, external_id, handle, name, phone";

// ==========================================
// CustomerRepository - 客户仓储
// ==========================================
pub struct CustomerRepository {
    conn: SharedConnection,
}

impl CustomerRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 登记客户（手机号已存在时忽略，保留首次写入的字段）
    ///
    /// # 返回
    /// - Ok(Created): 新建
    /// - Ok(AlreadyExists): 手机号已存在，未写入
    /// - Err: 其他约束冲突（如 external_id 被其他手机号占用）或存储错误
    pub fn register(&self, customer: &NewCustomer) -> RepositoryResult<RegisterOutcome> {
        let conn = self.get_conn()?;

        let affected = conn
            .execute(
                r#"
                INSERT INTO customers (external_id, handle, name, phone)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(phone) DO NOTHING
                "#,
                params![
                    customer.external_id,
                    customer.handle,
                    customer.name,
                    customer.phone,
                ],
            )
            .map_err(|e| {
                tracing::error!("客户登记失败: phone={}, err={}", customer.phone, e);
                RepositoryError::from(e)
            })?;

        if affected == 0 {
            tracing::debug!("客户已存在，忽略登记: phone={}", customer.phone);
            return Ok(RegisterOutcome::AlreadyExists);
        }

        tracing::info!("客户登记成功: phone={}", customer.phone);
        Ok(RegisterOutcome::Created)
    }

    /// 更换手机号
    ///
    /// # 返回
    /// - Ok(true): 已更新
    /// - Ok(false): 原手机号不存在，未更新
    /// - Err(DuplicateKey): 新手机号已被其他客户占用，两条记录均不变
    pub fn change_phone(&self, old_phone: &str, new_phone: &str) -> RepositoryResult<bool> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists = tx
            .query_row(
                "SELECT 1 FROM customers WHERE phone = ?1",
                params![new_phone],
                |_row| Ok(()),
            )
            .optional()?
            .is_some();

        if exists {
            tracing::warn!("更换手机号失败，新号码已存在: {}", new_phone);
            return Err(RepositoryError::DuplicateKey {
                entity: "customer".to_string(),
                key: new_phone.to_string(),
            });
        }

        let affected = tx.execute(
            "UPDATE customers SET phone = ?1 WHERE phone = ?2",
            params![new_phone, old_phone],
        )?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(affected > 0)
    }

    /// 删除客户（级联删除名下车辆及其预约）
    pub fn delete(&self, customer_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM customers WHERE id = ?1", params![customer_id])?;
        if affected > 0 {
            tracing::info!("客户已删除(级联车辆与预约): id={}", customer_id);
        }
        Ok(affected > 0)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_phone(&self, phone: &str) -> RepositoryResult<Option<Customer>> {
        self.find_one("phone = ?1", &phone)
    }

    pub fn find_by_external_id(&self, external_id: i64) -> RepositoryResult<Option<Customer>> {
        self.find_one("external_id = ?1", &external_id)
    }

    pub fn find_by_id(&self, customer_id: i64) -> RepositoryResult<Option<Customer>> {
        self.find_one("id = ?1", &customer_id)
    }

    fn find_one(
        &self,
        predicate: &str,
        value: &dyn rusqlite::ToSql,
    ) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM customers WHERE {}", CUSTOMER_COLUMNS, predicate);

        let customer = conn
            .query_row(&sql, [value], |row| map_customer_row(row, 0))
            .optional()?;

        if customer.is_none() {
            tracing::debug!("客户不存在: {}", predicate);
        }
        Ok(customer)
    }

    /// 按手机号查询客户及其名下车辆
    ///
    /// LEFT JOIN 对无车客户会产生一行车辆字段全空的记录，这里将其过滤为空列表。
    pub fn find_with_vehicles_by_phone(
        &self,
        phone: &str,
    ) -> RepositoryResult<Option<CustomerWithVehicles>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                c.id, c.external_id, c.handle, c.name, c.phone,
                v.owner_id, v.plate, v.brand, v.model, v.year, v.color, v.wrapped, v.repainted
            FROM customers c
            LEFT JOIN vehicles v ON v.owner_id = c.id
            WHERE c.phone = ?1
            ORDER BY v.plate
            "#,
        )?;

        let mut rows = stmt.query(params![phone])?;
        let mut result: Option<CustomerWithVehicles> = None;

        while let Some(row) = rows.next()? {
            if result.is_none() {
                result = Some(CustomerWithVehicles {
                    customer: map_customer_row(row, 0)?,
                    vehicles: Vec::new(),
                });
            }

            let plate: Option<String> = row.get(6)?;
            if plate.is_none() {
                continue;
            }

            if let Some(entry) = result.as_mut() {
                entry.vehicles.push(map_vehicle_row(row, 5)?);
            }
        }

        Ok(result)
    }
}

/// 从指定列偏移映射 Customer
pub(crate) fn map_customer_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(offset)?,
        external_id: row.get(offset + 1)?,
        handle: row.get(offset + 2)?,
        name: row.get(offset + 3)?,
        phone: row.get(offset + 4)?,
    })
}
