// ==========================================
// 纺纱工艺顾问 - 产量计算器
// ==========================================
// 职责: 捻度、单锭产量、日产量、产能平衡的确定性计算
// 红线: 非有限值或越界输入一律拒绝并指明字段,从不静默截断
// ==========================================
// 说明: 产量公式系数来自 YieldPolicy,属于策略值
// ==========================================

use crate::config::YieldPolicy;
use crate::domain::metrics::ComputedMetrics;
use crate::domain::plant::PlantConfiguration;
use crate::engine::error::ValidationError;
use tracing::{debug, instrument};

type CalcResult<T> = Result<T, ValidationError>;

// ==========================================
// 纯函数
// ==========================================

/// 捻度 TPI = TM × √Ne
pub fn twist_per_inch(twist_multiplier: f64, target_count: f64) -> CalcResult<f64> {
    require_positive("twist_multiplier", twist_multiplier)?;
    require_positive("target_count", target_count)?;
    Ok(twist_multiplier * target_count.sqrt())
}

/// 日产量 (t/day) = 单锭每班克数 × 锭数 × 班数 ÷ 1,000,000
pub fn daily_tonnage(
    grams_per_spindle_per_shift: f64,
    spindle_count: u32,
    shifts_per_day: u32,
) -> CalcResult<f64> {
    require_non_negative("grams_per_spindle_per_shift", grams_per_spindle_per_shift)?;
    Ok(grams_per_spindle_per_shift * f64::from(spindle_count) * f64::from(shifts_per_day)
        / 1_000_000.0)
}

/// 供给能力是否覆盖需求（建议性,不是硬约束）
pub fn capacity_balance(feed_capacity_kg_hr: f64, required_kg_hr: f64) -> CalcResult<bool> {
    require_non_negative("feed_capacity_kg_hr", feed_capacity_kg_hr)?;
    require_non_negative("required_kg_hr", required_kg_hr)?;
    Ok(feed_capacity_kg_hr >= required_kg_hr)
}

/// 百分比 (0~100) → 小数 (0~1)
pub fn percent_to_fraction(field: &str, percent: f64) -> CalcResult<f64> {
    if !percent.is_finite() {
        return Err(ValidationError::new(field, "必须是有限数值"));
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(ValidationError::new(
            field,
            format!("百分比 {} 超出范围 [0, 100]", percent),
        ));
    }
    Ok(percent / 100.0)
}

// ==========================================
// YieldCalculator - 绑定产量公式系数的计算器
// ==========================================
#[derive(Debug, Clone)]
pub struct YieldCalculator {
    policy: YieldPolicy,
}

impl YieldCalculator {
    pub fn new(policy: YieldPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &YieldPolicy {
        &self.policy
    }

    /// 单锭每班产量 (g)，班长取策略值
    pub fn grams_per_spindle_per_shift(
        &self,
        speed_rpm: f64,
        efficiency_fraction: f64,
        tpi: f64,
        target_count: f64,
    ) -> CalcResult<f64> {
        self.grams_per_spindle_for_shift(
            speed_rpm,
            efficiency_fraction,
            tpi,
            target_count,
            self.policy.shift_hours,
        )
    }

    /// 单锭每班产量 (g)
    ///
    /// 锭速 × 时间 × 效率 = 有效转数；÷ TPI = 纱长（英寸）；
    /// 换算为米后 ÷ (每克米数 × Ne) = 质量（克）
    pub fn grams_per_spindle_for_shift(
        &self,
        speed_rpm: f64,
        efficiency_fraction: f64,
        tpi: f64,
        target_count: f64,
        shift_hours: f64,
    ) -> CalcResult<f64> {
        require_non_negative("spindle_speed_rpm", speed_rpm)?;
        require_fraction("efficiency_fraction", efficiency_fraction)?;
        require_positive("tpi", tpi)?;
        require_positive("target_count", target_count)?;
        require_positive("shift_hours", shift_hours)?;
        self.check_policy()?;

        let effective_revolutions = speed_rpm * 60.0 * shift_hours * efficiency_fraction;
        let length_m = effective_revolutions / tpi * self.policy.inches_to_meters;
        Ok(length_m / (self.policy.meters_per_gram_per_ne * target_count))
    }

    /// 日产量 (t/day)，班数取策略值
    pub fn daily_tonnage(&self, grams_per_spindle_per_shift: f64, spindle_count: u32) -> CalcResult<f64> {
        daily_tonnage(
            grams_per_spindle_per_shift,
            spindle_count,
            self.policy.shifts_per_day,
        )
    }

    /// 由工厂配置计算全部指标
    #[instrument(skip(self, plant), fields(
        target_count_ne = plant.target_count_ne,
        spindle_count = plant.spindle_count
    ))]
    pub fn compute_metrics(&self, plant: &PlantConfiguration) -> CalcResult<ComputedMetrics> {
        self.check_policy()?;

        // ===== 细纱 =====
        require_positive("target_count_ne", plant.target_count_ne)?;
        require_positive("twist_multiplier", plant.twist_multiplier)?;
        if plant.spindle_count == 0 {
            return Err(ValidationError::new("spindle_count", "锭数必须大于 0"));
        }
        require_non_negative("spindle_speed_rpm", plant.spindle_speed_rpm)?;
        let ring_eff = percent_to_fraction("ring_efficiency_pct", plant.ring_efficiency_pct)?;

        let tpi = twist_per_inch(plant.twist_multiplier, plant.target_count_ne)?;
        let grams = self.grams_per_spindle_per_shift(
            plant.spindle_speed_rpm,
            ring_eff,
            tpi,
            plant.target_count_ne,
        )?;
        let tonnage = self.daily_tonnage(grams, plant.spindle_count)?;
        let ring_kg_hr =
            grams * f64::from(plant.spindle_count) / 1000.0 / self.policy.shift_hours;

        // ===== 清花 =====
        require_non_negative("blowroom_capacity_kg_hr", plant.blowroom_capacity_kg_hr)?;
        let blow_eff =
            percent_to_fraction("blowroom_efficiency_pct", plant.blowroom_efficiency_pct)?;
        let blowroom_feed = plant.blowroom_capacity_kg_hr * blow_eff;
        let blowroom_required = ring_kg_hr / (1.0 - self.policy.blowroom_waste_fraction);
        let blowroom_balanced = capacity_balance(blowroom_feed, blowroom_required)?;

        // ===== 梳棉 =====
        require_positive("card_production_kg_hr", plant.card_production_kg_hr)?;
        let card_eff = percent_to_fraction("card_efficiency_pct", plant.card_efficiency_pct)?;
        if card_eff <= 0.0 {
            return Err(ValidationError::new("card_efficiency_pct", "梳棉效率必须大于 0"));
        }
        let card_rate = plant.card_production_kg_hr * card_eff;
        let cards_required = (blowroom_required / card_rate).ceil() as u32;

        // ===== 络筒 =====
        if plant.winding_drums == 0 {
            return Err(ValidationError::new("winding_drums", "络筒锭数必须大于 0"));
        }
        require_non_negative("winding_speed_m_min", plant.winding_speed_m_min)?;
        let wind_eff =
            percent_to_fraction("winding_efficiency_pct", plant.winding_efficiency_pct)?;
        let winding_m_per_hr = f64::from(plant.winding_drums)
            * plant.winding_speed_m_min
            * 60.0
            * wind_eff;
        let winding_capacity_kg_hr = winding_m_per_hr
            / (self.policy.meters_per_gram_per_ne * plant.target_count_ne)
            / 1000.0;
        let winding_balanced = capacity_balance(winding_capacity_kg_hr, ring_kg_hr)?;

        let metrics = ComputedMetrics {
            twist_per_inch: tpi,
            grams_per_spindle_per_shift: grams,
            ring_production_kg_hr: ring_kg_hr,
            daily_tonnage: tonnage,
            blowroom_feed_kg_hr: blowroom_feed,
            blowroom_required_kg_hr: blowroom_required,
            blowroom_balanced,
            cards_required,
            winding_capacity_kg_hr,
            winding_balanced,
        };

        debug!(
            tpi = metrics.twist_per_inch,
            grams = metrics.grams_per_spindle_per_shift,
            daily_tonnage = metrics.daily_tonnage,
            blowroom_balanced,
            winding_balanced,
            "产量指标计算完成"
        );

        Ok(metrics)
    }

    fn check_policy(&self) -> CalcResult<()> {
        require_positive("yield_policy.shift_hours", self.policy.shift_hours)?;
        if self.policy.shifts_per_day == 0 {
            return Err(ValidationError::new(
                "yield_policy.shifts_per_day",
                "每日班数必须大于 0",
            ));
        }
        require_positive("yield_policy.inches_to_meters", self.policy.inches_to_meters)?;
        require_positive(
            "yield_policy.meters_per_gram_per_ne",
            self.policy.meters_per_gram_per_ne,
        )?;
        let waste = self.policy.blowroom_waste_fraction;
        if !waste.is_finite() || !(0.0..1.0).contains(&waste) {
            return Err(ValidationError::new(
                "yield_policy.blowroom_waste_fraction",
                format!("落棉比例 {} 超出范围 [0, 1)", waste),
            ));
        }
        Ok(())
    }
}

impl Default for YieldCalculator {
    fn default() -> Self {
        Self::new(YieldPolicy::default())
    }
}

// ==========================================
// 校验辅助
// ==========================================

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "必须是有限数值"));
    }
    if value <= 0.0 {
        return Err(ValidationError::new(field, format!("必须大于 0，实际 {}", value)));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "必须是有限数值"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, format!("不能为负数，实际 {}", value)));
    }
    Ok(())
}

fn require_fraction(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "必须是有限数值"));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("{} 超出范围 [0, 1]", value),
        ));
    }
    Ok(())
}
