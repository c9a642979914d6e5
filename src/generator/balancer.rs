//! 内容分类平衡 - 找出历史创意中出现最少的分类

use crate::types::idea::{CategoryCounts, ContentCategory};

/// 判断一条创意属于哪个分类：去空白、转小写后以分类标签开头（标签可去掉空格，可跟冒号）
pub fn classify(idea: &str) -> Option<ContentCategory> {
    let normalized = idea.trim().to_lowercase();

    ContentCategory::ALL.iter().copied().find(|category| {
        let label = category.label().to_lowercase();
        let compact = label.replace(' ', "");
        // "label:" 与 "label" 同为前缀匹配，冒号无需单独判断
        normalized.starts_with(&label) || normalized.starts_with(&compact)
    })
}

/// 统计各分类出现次数，返回次数最少的分类；平局时取固定顺序中靠前者
pub fn least_used_category<S: AsRef<str>>(prior_ideas: &[S]) -> (ContentCategory, CategoryCounts) {
    let mut counts = CategoryCounts::default();

    for idea in prior_ideas {
        if let Some(category) = classify(idea.as_ref()) {
            counts.increment(category);
        }
    }

    // min_by_key遇到相同的最小值时返回第一个
    let category = ContentCategory::ALL
        .iter()
        .copied()
        .min_by_key(|category| counts.get(*category))
        .unwrap_or(ContentCategory::TimelessPrinciple);

    (category, counts)
}
