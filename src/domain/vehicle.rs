// ==========================================
// 车队运营后台 - 车辆领域模型
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 车辆摘要（id + 车牌）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: i64,
    pub plate: String,
}

// ==========================================
// VehicleLookup - 车牌 → 车辆 ID 映射
// ==========================================
// 约束: 仅由启用状态的车辆构建; 键为 TRIM + UPPER 后的车牌
#[derive(Debug, Clone, Default)]
pub struct VehicleLookup {
    by_plate: HashMap<String, i64>,
}

impl VehicleLookup {
    pub fn from_vehicles(vehicles: &[VehicleSummary]) -> Self {
        let by_plate = vehicles
            .iter()
            .map(|v| (Self::normalize_plate(&v.plate), v.id))
            .collect();
        Self { by_plate }
    }

    /// 车牌标准化（TRIM + UPPER）
    pub fn normalize_plate(plate: &str) -> String {
        plate.trim().to_uppercase()
    }

    /// 大小写不敏感查找
    pub fn resolve(&self, plate: &str) -> Option<i64> {
        self.by_plate.get(&Self::normalize_plate(plate)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_plate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_plate.is_empty()
    }
}
