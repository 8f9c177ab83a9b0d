//! Stateless novelty draws: divination and lottery.

use rand::Rng;
use rand::seq::SliceRandom;

/// The three possible divination outcomes.
pub const DIVINATION_RESULTS: [&str; 3] =
    ["聖筊 👍 (同意)", "陰筊 👎 (不同意)", "笑筊 🤔 (重新問)"];

/// Draws a divination result for a question.
#[must_use]
pub fn divination<R: Rng>(question: &str, rng: &mut R) -> String {
    let result = DIVINATION_RESULTS
        .choose(rng)
        .copied()
        .unwrap_or("笑筊 🤔 (重新問)");
    format!("❓ 問題: {question}\n✨ 結果: {result}")
}

/// Picks one option uniformly at random.
#[must_use]
pub fn lottery<R: Rng>(options: &[String], rng: &mut R) -> String {
    match options.choose(rng) {
        None => "請提供至少一個抽籤選項！ (用空格分隔)".to_owned(),
        Some(chosen) => format!(
            "從 [{}] {} 個選項中抽出：\n🎉 {chosen} 🎉",
            options.join(", "),
            options.len()
        ),
    }
}
