// ==========================================
// 设备维护排程系统 - 周期校验引擎
// ==========================================
// 红线: 集合内任意两个周期互为整数倍
// 红线: 高层级类别必须在低层级类别均已设置周期后才能设置
// ==========================================
// 职责: 纯校验，不落库
// 输入: PeriodicitySet + 类别目录
// 输出: Ok(()) 或 指明具体类别/周期的 ValidationError
// ==========================================

use crate::domain::category::MaintenanceCategory;
use crate::domain::error::{ValidationError, ValidationResult};
use crate::domain::periodicity::{PeriodicityInput, PeriodicitySet};
use std::collections::HashMap;

// ==========================================
// PeriodicityValidator - 周期校验引擎
// ==========================================
/// 周期校验引擎
///
/// 校验顺序（返回第一个违规）：
/// 1. 类别存在于目录
/// 2. 周期为正整数
/// 3. 层级前置条件
/// 4. 两两互为整数倍
pub struct PeriodicityValidator {
    // 无状态引擎
}

impl Default for PeriodicityValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PeriodicityValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 将录入项解析为周期集合并校验
    ///
    /// 录入项未给出周期时取类别默认周期；同一类别重复录入时以最后一项为准
    pub fn resolve(
        &self,
        inputs: &[PeriodicityInput],
        catalog: &[MaintenanceCategory],
    ) -> ValidationResult<PeriodicitySet> {
        let by_id = index_catalog(catalog);
        let mut set = PeriodicitySet::new();

        for input in inputs {
            let category = by_id.get(input.category_id.as_str()).ok_or_else(|| {
                ValidationError::UnknownCategory {
                    category: input.category_id.clone(),
                }
            })?;

            let days = input
                .periodicity_days
                .or(category.base_periodicity_days)
                .ok_or_else(|| ValidationError::UndefinedPeriodicity {
                    category: input.category_id.clone(),
                })?;

            set.set(input.category_id.clone(), days);
        }

        self.validate(&set, catalog)?;
        Ok(set)
    }

    /// 校验待写入的周期集合（完整规则）
    pub fn validate(
        &self,
        set: &PeriodicitySet,
        catalog: &[MaintenanceCategory],
    ) -> ValidationResult<()> {
        let by_id = index_catalog(catalog);

        self.check_known_and_positive(set, &by_id)?;
        self.check_prerequisites(set, &by_id, catalog)?;
        self.check_mutual_multiples(set)
    }

    /// 校验已落库的周期集合
    ///
    /// 层级前置只在写入时检查：目录后来新增的低层级类别不使已有集合失效
    pub fn validate_stored(
        &self,
        set: &PeriodicitySet,
        catalog: &[MaintenanceCategory],
    ) -> ValidationResult<()> {
        let by_id = index_catalog(catalog);

        self.check_known_and_positive(set, &by_id)?;
        self.check_mutual_multiples(set)
    }

    /// 判断两个正周期是否互为整数倍
    pub fn are_compatible(a: i64, b: i64) -> bool {
        a > 0 && b > 0 && (a % b == 0 || b % a == 0)
    }

    fn check_known_and_positive(
        &self,
        set: &PeriodicitySet,
        by_id: &HashMap<&str, &MaintenanceCategory>,
    ) -> ValidationResult<()> {
        for (category_id, _) in set.iter() {
            if !by_id.contains_key(category_id) {
                return Err(ValidationError::UnknownCategory {
                    category: category_id.to_string(),
                });
            }
        }

        for (category_id, days) in set.iter() {
            if days <= 0 {
                return Err(ValidationError::NonPositivePeriodicity {
                    category: category_id.to_string(),
                    days,
                });
            }
        }
        Ok(())
    }

    fn check_prerequisites(
        &self,
        set: &PeriodicitySet,
        by_id: &HashMap<&str, &MaintenanceCategory>,
        catalog: &[MaintenanceCategory],
    ) -> ValidationResult<()> {
        // 目录按 (tier, id) 排序，保证报告的前置类别稳定
        let mut ordered: Vec<&MaintenanceCategory> = catalog.iter().collect();
        ordered.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.category_id.cmp(&b.category_id)));

        for (category_id, _) in set.iter() {
            let tier = by_id[category_id].tier;
            let missing = ordered
                .iter()
                .take_while(|c| c.tier < tier)
                .find(|c| !set.contains(&c.category_id));

            if let Some(prerequisite) = missing {
                return Err(ValidationError::MissingPrerequisitePeriodicity {
                    category: category_id.to_string(),
                    prerequisite: prerequisite.category_id.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_mutual_multiples(&self, set: &PeriodicitySet) -> ValidationResult<()> {
        let entries: Vec<(&str, i64)> = set.iter().collect();
        for (i, &(first, first_days)) in entries.iter().enumerate() {
            for &(second, second_days) in &entries[i + 1..] {
                if !Self::are_compatible(first_days, second_days) {
                    return Err(ValidationError::IncompatiblePeriodicities {
                        first_category: first.to_string(),
                        first_days,
                        second_category: second.to_string(),
                        second_days,
                    });
                }
            }
        }
        Ok(())
    }
}

fn index_catalog(catalog: &[MaintenanceCategory]) -> HashMap<&str, &MaintenanceCategory> {
    catalog.iter().map(|c| (c.category_id.as_str(), c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::default_catalog;

    fn validator() -> PeriodicityValidator {
        PeriodicityValidator::new()
    }

    #[test]
    fn test_valid_full_set() {
        let set = PeriodicitySet::new()
            .with("routine", 10)
            .with("repair", 30)
            .with("overhaul", 360);
        assert_eq!(validator().validate(&set, &default_catalog()), Ok(()));
    }

    #[test]
    fn test_equal_periodicities_are_compatible() {
        let set = PeriodicitySet::new().with("routine", 30).with("repair", 30);
        assert!(validator().validate(&set, &default_catalog()).is_ok());
    }

    #[test]
    fn test_incompatible_pair_names_both_sides() {
        let set = PeriodicitySet::new().with("routine", 10).with("repair", 25);
        let err = validator().validate(&set, &default_catalog()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IncompatiblePeriodicities {
                first_category: "repair".to_string(),
                first_days: 25,
                second_category: "routine".to_string(),
                second_days: 10,
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("25") && msg.contains("10"));
    }

    #[test]
    fn test_incompatible_non_adjacent_pair() {
        // routine 与另外两项都相容，只有 repair/overhaul 这一对不相容
        let set = PeriodicitySet::new()
            .with("routine", 5)
            .with("repair", 20)
            .with("overhaul", 30);
        assert!(matches!(
            validator().validate(&set, &default_catalog()),
            Err(ValidationError::IncompatiblePeriodicities { .. })
        ));
    }

    #[test]
    fn test_non_positive() {
        let set = PeriodicitySet::new().with("routine", 0);
        assert_eq!(
            validator().validate(&set, &default_catalog()),
            Err(ValidationError::NonPositivePeriodicity {
                category: "routine".to_string(),
                days: 0
            })
        );

        let set = PeriodicitySet::new().with("routine", -7);
        assert!(matches!(
            validator().validate(&set, &default_catalog()),
            Err(ValidationError::NonPositivePeriodicity { days: -7, .. })
        ));
    }

    #[test]
    fn test_missing_prerequisite() {
        let set = PeriodicitySet::new().with("routine", 10).with("overhaul", 360);
        assert_eq!(
            validator().validate(&set, &default_catalog()),
            Err(ValidationError::MissingPrerequisitePeriodicity {
                category: "overhaul".to_string(),
                prerequisite: "repair".to_string(),
            })
        );
    }

    #[test]
    fn test_prerequisites_generalise_to_more_tiers() {
        let mut catalog = default_catalog();
        catalog.push(MaintenanceCategory::new("rebuild", "Rebuild", 3, None));
        catalog.push(MaintenanceCategory::new("lubrication", "Lubrication", 0, Some(5)));

        let set = PeriodicitySet::new()
            .with("routine", 10)
            .with("repair", 30)
            .with("overhaul", 90)
            .with("rebuild", 180);
        assert_eq!(
            validator().validate(&set, &catalog),
            Err(ValidationError::MissingPrerequisitePeriodicity {
                category: "overhaul".to_string(),
                prerequisite: "lubrication".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_category() {
        let set = PeriodicitySet::new().with("painting", 10);
        assert_eq!(
            validator().validate(&set, &default_catalog()),
            Err(ValidationError::UnknownCategory {
                category: "painting".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_uses_base_periodicity() {
        let catalog = vec![
            MaintenanceCategory::new("routine", "Routine", 0, Some(7)),
            MaintenanceCategory::new("repair", "Repair", 1, None),
        ];
        let set = validator()
            .resolve(
                &[PeriodicityInput::base("routine"), PeriodicityInput::days("repair", 28)],
                &catalog,
            )
            .unwrap();
        assert_eq!(set.get("routine"), Some(7));
        assert_eq!(set.get("repair"), Some(28));
    }

    #[test]
    fn test_resolve_without_base_is_undefined() {
        let err = validator()
            .resolve(&[PeriodicityInput::base("routine")], &default_catalog())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UndefinedPeriodicity {
                category: "routine".to_string()
            }
        );
    }

    #[test]
    fn test_accepted_sets_satisfy_invariant() {
        // 穷举小范围周期组合：被接受的集合两两整除，被拒绝的集合至少一对不整除
        let catalog = default_catalog();
        for a in 1..=12i64 {
            for b in 1..=12i64 {
                for c in 1..=12i64 {
                    let set = PeriodicitySet::new()
                        .with("routine", a)
                        .with("repair", b)
                        .with("overhaul", c);
                    let pairs = [(a, b), (a, c), (b, c)];
                    let all_ok = pairs
                        .iter()
                        .all(|&(p, q)| p % q == 0 || q % p == 0);
                    assert_eq!(validator().validate(&set, &catalog).is_ok(), all_ok);
                }
            }
        }
    }

    #[test]
    fn test_stored_set_survives_new_lower_tier_category() {
        let mut catalog = default_catalog();
        catalog.push(MaintenanceCategory::new("lubrication", "Lubrication", 0, Some(5)));
        let set = PeriodicitySet::new().with("routine", 10).with("repair", 30);

        assert!(matches!(
            validator().validate(&set, &catalog),
            Err(ValidationError::MissingPrerequisitePeriodicity { .. })
        ));
        assert_eq!(validator().validate_stored(&set, &catalog), Ok(()));

        let broken = PeriodicitySet::new().with("routine", 10).with("repair", 25);
        assert!(matches!(
            validator().validate_stored(&broken, &catalog),
            Err(ValidationError::IncompatiblePeriodicities { .. })
        ));
    }
}
