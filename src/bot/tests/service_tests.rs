//! Chat service dispatch tests over the in-memory adapters.

use std::sync::Arc;

use crate::bot::{ChatService, InboundEvent};
use crate::reply;
use crate::task::{
    adapters::memory::{InMemoryMemberDirectory, InMemoryTaskStore},
    domain::GroupId,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestChat = ChatService<InMemoryTaskStore, InMemoryMemberDirectory, DefaultClock>;

#[fixture]
fn chat() -> TestChat {
    ChatService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(InMemoryMemberDirectory::new()),
        Arc::new(DefaultClock),
    )
}

fn event(text: &str) -> InboundEvent {
    InboundEvent::new(GroupId::new("G-chat"), "U-sender", text)
}

async fn reply_to(chat: &TestChat, text: &str) -> String {
    chat.handle_event(&event(text))
        .await
        .expect("commands always get a reply")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plain_chatter_gets_no_reply(chat: TestChat) {
    assert!(chat.handle_event(&event("午餐吃什麼")).await.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_command_replies_with_the_reference(chat: TestChat) {
    let reply_text = reply_to(&chat, "#亂打一通").await;
    assert_eq!(reply_text, reply::help_text());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_complete_flow_round_trips(chat: TestChat) {
    let created = reply_to(&chat, "#新增 @小明 買晚餐 2026/4/17").await;
    assert!(created.contains("已為 小明 新增任務：買晚餐"));
    assert!(created.contains("任務ID：T-1"));
    assert!(created.contains("截止日期：2026/04/17"));

    let completed = reply_to(&chat, "#完成 T-1").await;
    assert!(completed.contains("已將 小明 的任務 T-1 標記為完成！"));

    let repeat = reply_to(&chat, "#完成 T-1").await;
    assert_eq!(repeat, "任務 T-1 已經標記為完成");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_reflects_filters_and_membership(chat: TestChat) {
    let _ = reply_to(&chat, "#新增 @小明 任務甲").await;
    let _ = reply_to(&chat, "#新增 @小美 任務乙").await;

    let all = reply_to(&chat, "#列表").await;
    assert!(all.contains("任務甲"));
    assert!(all.contains("任務乙"));

    let filtered = reply_to(&chat, "#列表 @小美").await;
    assert!(filtered.contains("任務乙"));
    assert!(!filtered.contains("任務甲"));

    let unknown = reply_to(&chat, "#列表 @路人").await;
    assert_eq!(unknown, "找不到成員：路人");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_delete_and_detail_commands_round_trip(chat: TestChat) {
    let _ = reply_to(&chat, "#新增 @小明 買晚餐").await;

    let updated = reply_to(&chat, "#修改 T-1 買宵夜 !高").await;
    assert!(updated.contains("已更新任務 T-1"));
    assert!(updated.contains("買宵夜"));

    let detail = reply_to(&chat, "#詳情 T-1").await;
    assert!(detail.contains("【T-1】買宵夜"));
    assert!(detail.contains("優先度: 高"));

    let deleted = reply_to(&chat, "#刪除 T-1").await;
    assert_eq!(deleted, "已刪除任務 T-1：買宵夜");

    let missing = reply_to(&chat, "#刪除 T-1").await;
    assert_eq!(missing, "找不到ID為 T-1 的任務");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_create_is_all_or_nothing_from_chat(chat: TestChat) {
    let rejected = reply_to(&chat, "#批量新增 @小明\n任務一\n任務二 2026/2/30").await;
    assert!(rejected.contains("2026/2/30"));

    let empty = reply_to(&chat, "#列表").await;
    assert_eq!(empty, "本群組任務：目前沒有任務");

    let accepted = reply_to(&chat, "#批量新增 @小明\n任務一\n!高 任務二").await;
    assert!(accepted.contains("2 項任務"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recurring_commands_round_trip(chat: TestChat) {
    let created = reply_to(&chat, "#定期 @小明 倒垃圾 每週一").await;
    assert!(created.contains("已建立定期任務：倒垃圾"));
    assert!(created.contains("週期：每週一"));
    assert!(created.contains("已產生第一筆任務"));

    let cancelled = reply_to(&chat, "#取消定期 T-1").await;
    assert!(cancelled.contains("已取消任務 T-1 的定期排程"));

    let not_recurring = reply_to(&chat, "#取消定期 T-2").await;
    assert_eq!(not_recurring, "任務 T-2 不是定期任務");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn help_and_novelty_commands_reply(chat: TestChat) {
    assert_eq!(reply_to(&chat, "#幫助").await, reply::help_text());

    let divination = reply_to(&chat, "#擲筊 今天適合出門嗎").await;
    assert!(divination.starts_with("❓ 問題: 今天適合出門嗎"));

    let lottery = reply_to(&chat, "#抽籤 唯一").await;
    assert!(lottery.contains("🎉 唯一 🎉"));
}
