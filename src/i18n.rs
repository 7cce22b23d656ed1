// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）、英文、俄文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::MaintenanceStatus;

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" / "en" / "ru"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use equipment_maintenance::i18n::t_with_args;
/// let msg = t_with_args("schedule.generated_until", &[("date", "2025-01-01")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 维护状态的显示名称
pub fn status_label(status: MaintenanceStatus) -> String {
    t(&format!("status.{}", status.as_db_str()))
}

/// 维护类别的显示名称
///
/// 目录中的自定义类别没有翻译时，回退为传入的类别名称
pub fn category_label(category_id: &str, fallback_name: &str) -> String {
    let key = format!("category.{}", category_id);
    let translated = t(&key);
    // rust-i18n 在缺失翻译时原样返回 key（可能带 locale 前缀）
    if translated.ends_with(&key) {
        fallback_name.to_string()
    } else {
        translated
    }
}
