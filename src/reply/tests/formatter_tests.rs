//! Formatter tests: fixed templates for successes and typed failures.

use crate::command::domain::CommandParseError;
use crate::reply;
use crate::task::{
    domain::{
        GroupId, Member, MemberId, MemberName, Priority, RecurrenceRule, Task, TaskDraft, TaskId,
    },
    ports::CompletionRecord,
    services::TaskCommandError,
};
use chrono::{NaiveDate, Weekday};
use mockable::{Clock, DefaultClock};
use rstest::rstest;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn task(id: i64, content: &str) -> Task {
    let group = GroupId::new("G-reply");
    let member = Member::new(
        MemberId::new(),
        MemberName::new("小明").expect("valid name"),
        group.clone(),
        DefaultClock.utc(),
    );
    let draft = TaskDraft::new(
        group,
        &member,
        content,
        Priority::Normal,
        DefaultClock.utc(),
    )
    .expect("valid draft");
    Task::from_draft(TaskId::from_sequence(id).expect("positive id"), draft)
}

#[rstest]
fn created_reply_names_assignee_id_and_missing_due_date() {
    let reply_text = reply::created(&task(12, "買晚餐"));
    assert!(reply_text.contains("已為 小明 新增任務：買晚餐"));
    assert!(reply_text.contains("任務ID：T-12"));
    assert!(reply_text.contains("無截止日期"));
}

#[rstest]
fn completed_reply_distinguishes_repeat_completion() {
    let record = CompletionRecord {
        task: task(7, "倒垃圾"),
        already_done: false,
    };
    assert!(reply::completed(&record).contains("標記為完成！"));

    let repeat = CompletionRecord {
        task: task(7, "倒垃圾"),
        already_done: true,
    };
    assert_eq!(reply::completed(&repeat), "任務 T-7 已經標記為完成");
}

#[rstest]
fn listing_renders_tasks_in_given_order() {
    let tasks = vec![task(1, "第一項"), task(2, "第二項")];
    let rendered =
        reply::listing("本群組任務", &tasks, date(2026, 4, 1)).expect("rendering succeeds");

    assert!(rendered.starts_with("📋 本群組任務 📋"));
    let first = rendered.find("T-1").expect("first task present");
    let second = rendered.find("T-2").expect("second task present");
    assert!(first < second);
}

#[rstest]
fn empty_listing_has_a_fixed_reply() {
    let rendered = reply::listing("本群組任務", &[], date(2026, 4, 1)).expect("rendering succeeds");
    assert_eq!(rendered, "本群組任務：目前沒有任務");
}

#[rstest]
fn listing_flags_overdue_and_due_today() {
    let today = date(2026, 4, 10);
    let overdue = {
        let mut item = task(1, "過期了");
        item.apply_patch(
            &crate::task::domain::TaskPatch::new().with_due_date(date(2026, 4, 1)),
        );
        item
    };
    let due_today = {
        let mut item = task(2, "今天到期");
        item.apply_patch(&crate::task::domain::TaskPatch::new().with_due_date(today));
        item
    };
    let rendered =
        reply::listing("本群組任務", &[overdue, due_today], today).expect("rendering succeeds");
    assert!(rendered.contains("已逾期"));
    assert!(rendered.contains("今天到期"));
}

#[rstest]
fn detail_reports_status_and_schedule() {
    let group = GroupId::new("G-reply");
    let member = Member::new(
        MemberId::new(),
        MemberName::new("小美").expect("valid name"),
        group.clone(),
        DefaultClock.utc(),
    );
    let draft = TaskDraft::new(group, &member, "倒垃圾", Priority::High, DefaultClock.utc())
        .expect("valid draft")
        .with_recurrence(RecurrenceRule::weekly(Weekday::Mon));
    let template = Task::from_draft(TaskId::from_sequence(3).expect("positive id"), draft);

    let rendered = reply::detail(&template, date(2026, 4, 1)).expect("rendering succeeds");
    assert!(rendered.contains("【T-3】倒垃圾"));
    assert!(rendered.contains("⬜ 未完成"));
    assert!(rendered.contains("每週一"));
    assert!(rendered.contains("優先度: 高"));
}

#[rstest]
fn unknown_command_maps_to_the_command_reference() {
    let reply_text = reply::parse_failure(&CommandParseError::UnknownCommand("沒有".to_owned()));
    assert_eq!(reply_text, reply::help_text());
}

#[rstest]
fn parse_failures_name_the_offending_token() {
    assert!(
        reply::parse_failure(&CommandParseError::InvalidDateFormat("2026/2/30".to_owned()))
            .contains("2026/2/30")
    );
    assert!(
        reply::parse_failure(&CommandParseError::InvalidPriorityToken("特".to_owned()))
            .contains("特")
    );
    assert!(
        reply::parse_failure(&CommandParseError::MissingArgument("任務內容"))
            .contains("任務內容")
    );
}

#[rstest]
fn command_failures_use_the_original_wording() {
    let missing = TaskId::from_sequence(12).expect("positive id");
    assert_eq!(
        reply::command_failure(&TaskCommandError::TaskNotFound(missing)),
        "找不到ID為 T-12 的任務"
    );
    assert_eq!(
        reply::command_failure(&TaskCommandError::MemberNotFound(
            MemberName::new("路人").expect("valid name")
        )),
        "找不到成員：路人"
    );
}
