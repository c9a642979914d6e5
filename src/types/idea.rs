use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 一次生成得到的帖子创意，流水线唯一的输出类型
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdeaRecord {
    /// 系列名称（2-3个词）
    pub name: String,
    /// 核心角度，约定以内容分类标签开头
    pub idea: String,
    /// 标题
    pub title: String,
    /// 正文
    pub text: String,
    /// 配图描述，作为图片生成的prompt
    pub image: String,
}

impl IdeaRecord {
    pub const FIELDS: [&'static str; 5] = ["name", "idea", "title", "text", "image"];

    pub const DEFAULT_NAME: &'static str = "Field Note";
    pub const DEFAULT_TITLE: &'static str = "Untitled";
    pub const DEFAULT_TEXT: &'static str = "...";
    pub const DEFAULT_IMAGE: &'static str = "Abstract tech illustration";

    /// 对象同时包含五个字段时才视为合法创意，多余字段忽略
    pub fn from_object(object: &Map<String, Value>) -> Option<Self> {
        if !Self::FIELDS.iter().all(|key| object.contains_key(*key)) {
            return None;
        }

        let field = |key: &str| object.get(key).map(coerce_to_string).unwrap_or_default();

        Some(Self {
            name: field("name"),
            idea: field("idea"),
            title: field("title"),
            text: field("text"),
            image: field("image"),
        })
    }

    /// 宽松读取：缺失的字段使用默认值
    pub fn from_object_lenient(object: &Map<String, Value>, topic: Option<&str>) -> Self {
        let read = |key: &str| {
            object
                .get(key)
                .filter(|value| !value.is_null())
                .map(coerce_to_string)
        };

        let title = read("title");
        let idea = read("idea");
        let image = read("image")
            .or_else(|| title.clone().filter(|t| !t.is_empty()))
            .or_else(|| idea.clone().filter(|i| !i.is_empty()))
            .unwrap_or_else(|| Self::DEFAULT_IMAGE.to_string());

        Self {
            name: read("name").unwrap_or_default(),
            idea: idea.unwrap_or_else(|| topic.unwrap_or_default().to_string()),
            title: title.unwrap_or_else(|| Self::DEFAULT_TITLE.to_string()),
            text: read("text").unwrap_or_else(|| Self::DEFAULT_TEXT.to_string()),
            image,
        }
    }

    /// 补齐空白字段，保证返回给调用方的五个字段均非空
    pub fn normalized(mut self, topic: Option<&str>) -> Self {
        if self.title.trim().is_empty() {
            self.title = Self::DEFAULT_TITLE.to_string();
        }
        if self.text.trim().is_empty() {
            self.text = Self::DEFAULT_TEXT.to_string();
        }
        if self.idea.trim().is_empty() {
            self.idea = match topic.map(str::trim).filter(|t| !t.is_empty()) {
                Some(topic) => topic.to_string(),
                None => self.title.clone(),
            };
        }
        if self.name.trim().is_empty() {
            self.name = Self::DEFAULT_NAME.to_string();
        }
        if self.image.trim().is_empty() {
            self.image = self.title.clone();
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        [&self.name, &self.idea, &self.title, &self.text, &self.image]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// 字符串原样返回，null视为空串，其余值取其JSON文本
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 内容分类，用于在历史帖子之间平衡选题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentCategory {
    TimelessPrinciple,
    CaseStudy,
    GrowthHack,
    ControversialTopic,
}

impl ContentCategory {
    /// 固定顺序，同时也是平局时的优先顺序
    pub const ALL: [ContentCategory; 4] = [
        ContentCategory::TimelessPrinciple,
        ContentCategory::CaseStudy,
        ContentCategory::GrowthHack,
        ContentCategory::ControversialTopic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentCategory::TimelessPrinciple => "Timeless principle",
            ContentCategory::CaseStudy => "Case study",
            ContentCategory::GrowthHack => "Growth hack",
            ContentCategory::ControversialTopic => "Controversial topic",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ContentCategory::TimelessPrinciple => 0,
            ContentCategory::CaseStudy => 1,
            ContentCategory::GrowthHack => 2,
            ContentCategory::ControversialTopic => 3,
        }
    }
}

impl Display for ContentCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 各分类在历史创意中的出现次数，每次调用重新计算
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; 4],
}

impl CategoryCounts {
    pub fn get(&self, category: ContentCategory) -> usize {
        self.counts[category.index()]
    }

    pub fn increment(&mut self, category: ContentCategory) {
        self.counts[category.index()] += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContentCategory, usize)> + '_ {
        ContentCategory::ALL
            .iter()
            .map(move |category| (*category, self.get(*category)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Display for CategoryCounts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(category, count)| format!("{}={}", category.label(), count))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_object_requires_all_fields() {
        let value = json!({"name": "n", "idea": "i", "title": "t", "text": "x"});
        assert!(IdeaRecord::from_object(value.as_object().unwrap()).is_none());
    }

    #[test]
    fn test_from_object_coerces_non_string_values() {
        let value = json!({"name": 7, "idea": "i", "title": "t", "text": null, "image": true});
        let record = IdeaRecord::from_object(value.as_object().unwrap()).unwrap();

        assert_eq!(record.name, "7");
        assert_eq!(record.text, "");
        assert_eq!(record.image, "true");
    }

    #[test]
    fn test_from_object_lenient_defaults() {
        let value = json!({"name": "Series"});
        let record = IdeaRecord::from_object_lenient(value.as_object().unwrap(), Some("Testing"));

        assert_eq!(record.idea, "Testing");
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.text, "...");
        assert_eq!(record.image, IdeaRecord::DEFAULT_IMAGE);
    }

    #[test]
    fn test_from_object_lenient_image_falls_back_to_idea() {
        let value = json!({"idea": "Case study: onboarding", "title": ""});
        let record = IdeaRecord::from_object_lenient(value.as_object().unwrap(), None);

        assert_eq!(record.image, "Case study: onboarding");
    }

    #[test]
    fn test_normalized_fills_blank_fields() {
        let record = IdeaRecord {
            name: " ".to_string(),
            idea: String::new(),
            title: String::new(),
            text: "body".to_string(),
            image: String::new(),
        }
        .normalized(None);

        assert!(record.is_complete());
        assert_eq!(record.name, IdeaRecord::DEFAULT_NAME);
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.idea, "Untitled");
        assert_eq!(record.image, "Untitled");
    }

    #[test]
    fn test_category_counts_display() {
        let mut counts = CategoryCounts::default();
        counts.increment(ContentCategory::GrowthHack);

        assert_eq!(counts.total(), 1);
        assert!(counts.to_string().contains("Growth hack=1"));
    }
}
