use serde::{Deserialize, Serialize};

/// 产量公式系数（策略值,不是经验证的物理定律）
///
/// 存储位置：config_kv（scope_id='global'，key='yield_policy'，JSON）
///
/// 单锭每班产量:
/// `g = rpm × 60 × shift_hours × eff ÷ tpi × inches_to_meters ÷ (meters_per_gram_per_ne × Ne)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldPolicy {
    /// 每班小时数
    #[serde(default = "default_shift_hours")]
    pub shift_hours: f64,

    /// 每日班数
    #[serde(default = "default_shifts_per_day")]
    pub shifts_per_day: u32,

    /// 英寸 → 米
    #[serde(default = "default_inches_to_meters")]
    pub inches_to_meters: f64,

    /// 1 Ne 纱线每克长度（米）：840 码/磅 ≈ 1.6934 m/g
    #[serde(default = "default_meters_per_gram_per_ne")]
    pub meters_per_gram_per_ne: f64,

    /// 清花到细纱的落棉比例（0~1），用于推算清花所需供给
    #[serde(default)]
    pub blowroom_waste_fraction: f64,
}

fn default_shift_hours() -> f64 {
    8.0
}

fn default_shifts_per_day() -> u32 {
    3
}

fn default_inches_to_meters() -> f64 {
    0.0254
}

fn default_meters_per_gram_per_ne() -> f64 {
    1.6934
}

impl Default for YieldPolicy {
    fn default() -> Self {
        Self {
            shift_hours: default_shift_hours(),
            shifts_per_day: default_shifts_per_day(),
            inches_to_meters: default_inches_to_meters(),
            meters_per_gram_per_ne: default_meters_per_gram_per_ne(),
            blowroom_waste_fraction: 0.0,
        }
    }
}
