// ==========================================
// 设备维护排程系统 - 维护周期集合
// ==========================================
// 红线: 集合内任意两个周期必须互为整数倍
// 红线: 校验失败的集合不落库（全有或全无）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// PeriodicitySet - 单台设备的周期集合
// ==========================================
// 对齐: equipment_periodicity 表 (equipment_id, category_id) → periodicity_days
// BTreeMap 保证遍历顺序稳定，错误信息与生成结果可复现
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicitySet {
    entries: BTreeMap<String, i64>,
}

impl PeriodicitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置类别周期，已存在则覆盖
    pub fn set(&mut self, category_id: impl Into<String>, periodicity_days: i64) {
        self.entries.insert(category_id.into(), periodicity_days);
    }

    /// 链式构造，便于测试与调用方组装
    pub fn with(mut self, category_id: impl Into<String>, periodicity_days: i64) -> Self {
        self.set(category_id, periodicity_days);
        self
    }

    pub fn get(&self, category_id: &str) -> Option<i64> {
        self.entries.get(category_id).copied()
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.entries.contains_key(category_id)
    }

    /// 按类别 ID 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, i64)> for PeriodicitySet {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ==========================================
// PeriodicityInput - 周期录入项
// ==========================================
// periodicity_days 为空时使用类别的默认周期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicityInput {
    pub category_id: String,
    pub periodicity_days: Option<i64>,
}

impl PeriodicityInput {
    pub fn days(category_id: impl Into<String>, periodicity_days: i64) -> Self {
        Self {
            category_id: category_id.into(),
            periodicity_days: Some(periodicity_days),
        }
    }

    pub fn base(category_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            periodicity_days: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overrides_and_orders() {
        let set = PeriodicitySet::new()
            .with("repair", 30)
            .with("routine", 10)
            .with("repair", 60);

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("repair"), Some(60));
        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["repair", "routine"]);
    }
}
