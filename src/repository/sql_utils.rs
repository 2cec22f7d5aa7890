// ==========================================
// 汽车服务预约系统 - SQL 工具
// ==========================================
// 职责: IN / NOT IN 子句占位符构建
// ==========================================

/// 构建 IN 子句的 SQL 片段
///
/// # 示例
/// ```
/// use autoservice_booking::repository::sql_utils::build_in_clause;
///
/// let brands = vec!["Kia".to_string(), "BMW".to_string()];
/// assert_eq!(build_in_clause("v.brand", &brands), "v.brand IN (?, ?)");
///
/// // 空列表返回永假条件
/// let empty: Vec<String> = vec![];
/// assert_eq!(build_in_clause("v.brand", &empty), "1 = 0");
/// ```
pub fn build_in_clause<T: AsRef<str>>(column_name: &str, values: &[T]) -> String {
    if values.is_empty() {
        return "1 = 0".to_string();
    }

    format!("{} IN ({})", column_name, placeholders(values.len()))
}

/// 构建 NOT IN 子句的 SQL 片段（空列表返回永真条件）
pub fn build_not_in_clause<T: AsRef<str>>(column_name: &str, values: &[T]) -> String {
    if values.is_empty() {
        return "1 = 1".to_string();
    }

    format!("{} NOT IN ({})", column_name, placeholders(values.len()))
}

fn placeholders(n: usize) -> String {
    std::iter::repeat("?").take(n).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_in_clause() {
        assert_eq!(
            build_not_in_clause("b.status", &["cancelled", "completed"]),
            "b.status NOT IN (?, ?)"
        );
        let empty: [&str; 0] = [];
        assert_eq!(build_not_in_clause("b.status", &empty), "1 = 1");
    }

    #[test]
    fn test_in_clause_single() {
        assert_eq!(build_in_clause("b.status", &["scheduled"]), "b.status IN (?)");
    }
}
