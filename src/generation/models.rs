// ==========================================
// 纺纱工艺顾问 - 可选模型列表
// ==========================================
// 说明: 模型列表由外部发现后传入；发现失败时使用兜底列表
// ==========================================

/// 兜底模型列表
pub const FALLBACK_MODELS: [&str; 2] = ["gemini-1.5-flash", "gemini-pro"];

/// 去掉 "models/" 前缀
pub fn normalize_model_name(name: &str) -> String {
    name.trim().trim_start_matches("models/").to_string()
}

/// 整理外部提供的模型列表
///
/// 规范化、去空、去重（保持原顺序）；结果为空时返回兜底列表
pub fn resolve_model_list<I, S>(discovered: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut models: Vec<String> = Vec::new();
    for name in discovered {
        let name = normalize_model_name(name.as_ref());
        if !name.is_empty() && !models.contains(&name) {
            models.push(name);
        }
    }

    if models.is_empty() {
        FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
    } else {
        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_discovery_falls_back() {
        let models = resolve_model_list(Vec::<String>::new());
        assert_eq!(models, vec!["gemini-1.5-flash", "gemini-pro"]);
    }

    #[test]
    fn test_discovered_names_are_normalized() {
        let models = resolve_model_list(["models/gemini-2.0-flash", "gemini-2.0-flash", " "]);
        assert_eq!(models, vec!["gemini-2.0-flash"]);
    }
}
