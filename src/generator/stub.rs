//! 离线兜底生成器 - 不依赖网络，保证流水线总能返回结果

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Mutex;

use crate::types::idea::IdeaRecord;

pub const TOPICS: [&str; 12] = [
    "AI productivity",
    "Remote work",
    "Leadership",
    "Career growth",
    "Developer tools",
    "Open source",
    "Design systems",
    "Product strategy",
    "Team culture",
    "Testing",
    "Performance",
    "Security",
];

const ANGLES: [&str; 4] = [
    "practical tips",
    "common pitfalls",
    "real-world lessons",
    "fast iteration",
];

const NAMES: [&str; 4] = ["Sprint Insight", "Daily Practice", "Field Note", "Fast Track"];

/// 标题模板
pub fn title_templates(topic: &str) -> [String; 4] {
    [
        format!("Thoughts on {}", topic),
        format!("{} in practice", topic),
        format!("Making the most of {}", topic),
        format!("{}: what works for us", topic),
    ]
}

/// 正文模板
fn body_templates(topic: &str) -> [String; 3] {
    let hashtag: String = topic.split_whitespace().collect();
    [
        format!(
            "Quick tip on {}: start small, measure impact, iterate fast. Consistency beats intensity. #{}",
            topic, hashtag
        ),
        format!(
            "Lessons learned shipping a feature around {}:\n- Define success clearly\n- Align early with stakeholders\n- Ship in slices\nWhat would you add?",
            topic
        ),
        format!(
            "Why {} matters in 2025: it helps teams focus on outcomes, not output. The best teams are ruthlessly simple.",
            topic
        ),
    ]
}

/// 离线兜底生成器，随机源可注入以便测试
pub struct StubGenerator {
    rng: Mutex<StdRng>,
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// 生成一条创意，未给出话题时随机挑选
    pub fn generate(&self, topic: Option<&str>) -> IdeaRecord {
        // 锁中毒时随机源本身仍然可用
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let topic = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => topic.to_string(),
            None => pick(&mut *rng, &TOPICS).to_string(),
        };

        let title = pick(&mut *rng, &title_templates(&topic)).clone();
        let text = pick(&mut *rng, &body_templates(&topic)).clone();
        let idea = format!("{} – {}", topic, pick(&mut *rng, &ANGLES));
        let name = pick(&mut *rng, &NAMES).to_string();
        let image = format!("{} minimal illustration, flat design, high contrast", topic);

        IdeaRecord {
            name,
            idea,
            title,
            text,
            image,
        }
    }
}

fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}
