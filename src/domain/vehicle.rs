// ==========================================
// 汽车服务预约系统 - 车辆领域模型
// ==========================================
// 业务主键: plate（车牌号，无代理主键）
// 归属: 多对一关联 Customer，客户删除时级联删除
// ==========================================

use crate::domain::customer::Customer;
use serde::{Deserialize, Serialize};

// ==========================================
// Vehicle - 车辆
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub plate: String,           // 车牌号
    pub owner_id: Option<i64>,   // 车主 customers.id
    pub brand: String,           // 品牌
    pub model: String,           // 型号
    pub year: Option<i32>,       // 年份
    pub color: Option<String>,   // 颜色
    pub wrapped: bool,           // 是否贴膜
    pub repainted: bool,         // 是否重新喷漆
}

impl Vehicle {
    pub fn new(plate: &str, owner_id: i64, brand: &str, model: &str) -> Self {
        Self {
            plate: plate.to_string(),
            owner_id: Some(owner_id),
            brand: brand.to_string(),
            model: model.to_string(),
            year: None,
            color: None,
            wrapped: false,
            repainted: false,
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn wrapped(mut self, wrapped: bool) -> Self {
        self.wrapped = wrapped;
        self
    }

    pub fn repainted(mut self, repainted: bool) -> Self {
        self.repainted = repainted;
        self
    }
}

/// 车辆及其车主（车主缺失时为 None）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleWithOwner {
    pub vehicle: Vehicle,
    pub owner: Option<Customer>,
}
