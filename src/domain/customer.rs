// ==========================================
// 汽车服务预约系统 - 客户领域模型
// ==========================================
// 业务主键: phone（唯一）
// 代理主键: id（由存储分配，不可变）
// ==========================================

use crate::domain::vehicle::Vehicle;
use serde::{Deserialize, Serialize};

// ==========================================
// Customer - 客户
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,                   // 代理主键
    pub external_id: Option<i64>,  // 外部聊天账号 ID（唯一）
    pub handle: Option<String>,    // 外部账号显示名
    pub name: String,              // 客户姓名
    pub phone: String,             // 手机号（业务主键）
}

/// 新客户登记参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub external_id: Option<i64>,
    pub handle: Option<String>,
}

impl NewCustomer {
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            phone: phone.to_string(),
            external_id: None,
            handle: None,
        }
    }

    pub fn with_external(mut self, external_id: i64, handle: Option<&str>) -> Self {
        self.external_id = Some(external_id);
        self.handle = handle.map(|h| h.to_string());
        self
    }
}

/// 客户及其名下车辆（无车客户的 vehicles 为空列表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerWithVehicles {
    pub customer: Customer,
    pub vehicles: Vec<Vehicle>,
}

/// 幂等登记结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// 新建记录
    Created,
    /// 业务主键已存在，本次写入被忽略
    AlreadyExists,
}

impl RegisterOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, RegisterOutcome::Created)
    }
}
