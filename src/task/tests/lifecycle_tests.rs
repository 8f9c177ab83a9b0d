//! Service orchestration tests over the in-memory adapters.

use std::sync::Arc;

use crate::task::{
    adapters::memory::{InMemoryMemberDirectory, InMemoryTaskStore},
    domain::{
        GroupId, MemberName, Priority, RecurrenceRule, TaskDomainError, TaskId, TaskLine,
        TaskPatch, TaskStatus,
    },
    services::{
        BatchCreateRequest, CreateRecurringRequest, CreateTaskRequest, TaskCommandError,
        TaskLifecycleService,
    },
};
use chrono::{NaiveDate, Weekday};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

type TestService = TaskLifecycleService<InMemoryTaskStore, InMemoryMemberDirectory, DefaultClock>;

#[fixture]
fn service() -> TestService {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(InMemoryMemberDirectory::new()),
        Arc::new(DefaultClock),
    )
}

fn group() -> GroupId {
    GroupId::new("G-lifecycle")
}

fn name(value: &str) -> MemberName {
    MemberName::new(value).expect("valid member name")
}

fn due(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

async fn create_simple(service: &TestService, content: &str) -> crate::task::domain::Task {
    service
        .create(CreateTaskRequest::new(group(), name("小明"), content))
        .await
        .expect("creation should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_defaults_to_open_and_normal_priority(service: TestService) {
    let task = create_simple(&service, "買晚餐").await;

    assert_eq!(task.status(), TaskStatus::Open);
    assert_eq!(task.priority(), Priority::Normal);
    assert_eq!(task.due_date(), None);
    assert_eq!(task.assignee_name(), &name("小明"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_round_trips_through_detail(service: TestService) {
    let request = CreateTaskRequest::new(group(), name("小美"), "交報告")
        .with_priority(Priority::High)
        .with_due_date(due(2026, 9, 1));
    let created = service.create(request).await.expect("creation should succeed");

    let fetched = service
        .detail(&group(), created.id())
        .await
        .expect("detail should succeed");

    assert_eq!(fetched, created);
    assert_eq!(fetched.priority(), Priority::High);
    assert_eq!(fetched.due_date(), Some(due(2026, 9, 1)));
    assert_eq!(fetched.content(), "交報告");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_create_persists_every_line(service: TestService) {
    let lines = vec![
        TaskLine::new("任務一", Priority::Normal, None).expect("valid line"),
        TaskLine::new("任務二", Priority::High, Some(due(2026, 7, 1))).expect("valid line"),
        TaskLine::new("任務三", Priority::Low, None).expect("valid line"),
    ];
    let tasks = service
        .batch_create(BatchCreateRequest::new(group(), name("小明"), lines))
        .await
        .expect("batch should succeed");

    assert_eq!(tasks.len(), 3);
    assert!(tasks.iter().all(|task| task.status() == TaskStatus::Open));
    assert!(tasks.iter().all(|task| task.assignee_name() == &name("小明")));

    let listed = service
        .list(&group(), None)
        .await
        .expect("listing should succeed");
    assert_eq!(listed.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_create_rejects_empty_batch(service: TestService) {
    let result = service
        .batch_create(BatchCreateRequest::new(group(), name("小明"), Vec::new()))
        .await;

    assert!(matches!(
        result,
        Err(TaskCommandError::Validation(TaskDomainError::EmptyContent))
    ));
    let listed = service
        .list(&group(), None)
        .await
        .expect("listing should succeed");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_is_idempotent(service: TestService) {
    let task = create_simple(&service, "倒垃圾").await;

    let first = service
        .complete(&group(), task.id())
        .await
        .expect("first completion should succeed");
    assert!(!first.already_done);
    assert_eq!(first.task.status(), TaskStatus::Done);

    let second = service
        .complete(&group(), task.id())
        .await
        .expect("second completion should succeed");
    assert!(second.already_done);
    assert_eq!(second.task, first.task);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn complete_unknown_task_fails(service: TestService) {
    let missing = TaskId::from_sequence(404).expect("positive id");
    let result = service.complete(&group(), missing).await;
    assert!(matches!(
        result,
        Err(TaskCommandError::TaskNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_provided_fields(service: TestService) {
    let task = create_simple(&service, "買晚餐").await;

    let patch = TaskPatch::new().with_priority(Priority::High);
    let updated = service
        .update(&group(), task.id(), patch)
        .await
        .expect("update should succeed");

    assert_eq!(updated.content(), "買晚餐");
    assert_eq!(updated.priority(), Priority::High);
    assert_eq!(updated.due_date(), None);

    let patch = TaskPatch::new()
        .with_content("買宵夜")
        .expect("valid content")
        .with_due_date(due(2026, 12, 31));
    let updated = service
        .update(&group(), task.id(), patch)
        .await
        .expect("update should succeed");

    assert_eq!(updated.content(), "買宵夜");
    assert_eq!(updated.priority(), Priority::High);
    assert_eq!(updated.due_date(), Some(due(2026, 12, 31)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_task_fails(service: TestService) {
    let missing = TaskId::from_sequence(77).expect("positive id");
    let result = service
        .update(&group(), missing, TaskPatch::new().with_priority(Priority::Low))
        .await;
    assert!(matches!(
        result,
        Err(TaskCommandError::TaskNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_and_missing_delete_fails(service: TestService) {
    let task = create_simple(&service, "舊任務").await;

    let deleted = service
        .delete(&group(), task.id())
        .await
        .expect("delete should succeed");
    assert_eq!(deleted.id(), task.id());

    let repeat = service.delete(&group(), task.id()).await;
    assert!(matches!(
        repeat,
        Err(TaskCommandError::TaskNotFound(id)) if id == task.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn detail_unknown_task_fails(service: TestService) {
    let missing = TaskId::from_sequence(9).expect("positive id");
    let result = service.detail(&group(), missing).await;
    assert!(matches!(
        result,
        Err(TaskCommandError::TaskNotFound(id)) if id == missing
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_invisible_from_other_groups(service: TestService) {
    let task = create_simple(&service, "群組A的任務").await;
    let other_group = GroupId::new("G-other");

    let result = service.detail(&other_group, task.id()).await;
    assert!(matches!(result, Err(TaskCommandError::TaskNotFound(_))));

    let listed = service
        .list(&other_group, None)
        .await
        .expect("listing should succeed");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_member_and_rejects_unknown_filter(service: TestService) {
    service
        .create(CreateTaskRequest::new(group(), name("小明"), "小明的任務"))
        .await
        .expect("creation should succeed");
    service
        .create(CreateTaskRequest::new(group(), name("小美"), "小美的任務"))
        .await
        .expect("creation should succeed");

    let filtered = service
        .list(&group(), Some(&name("小美")))
        .await
        .expect("filtered listing should succeed");
    assert_eq!(filtered.len(), 1);
    assert!(filtered.iter().all(|task| task.assignee_name() == &name("小美")));

    let unknown = service.list(&group(), Some(&name("路人"))).await;
    assert!(matches!(
        unknown,
        Err(TaskCommandError::MemberNotFound(member)) if member == name("路人")
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_recurring_generates_first_occurrence(service: TestService) {
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let creation = service
        .create_recurring(CreateRecurringRequest::new(
            group(),
            name("小明"),
            "倒垃圾",
            rule,
        ))
        .await
        .expect("recurring creation should succeed");

    assert!(creation.template.has_active_recurrence());
    let today = DefaultClock.utc().date_naive();
    let expected_due = rule.next_occurrence(today).expect("upcoming monday exists");

    let occurrence = creation.first_occurrence.expect("first occurrence generated");
    assert_eq!(occurrence.due_date(), Some(expected_due));
    assert_eq!(occurrence.content(), "倒垃圾");
    assert!(occurrence.recurrence().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduled_trigger_does_not_duplicate_first_occurrence(service: TestService) {
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let creation = service
        .create_recurring(CreateRecurringRequest::new(
            group(),
            name("小明"),
            "倒垃圾",
            rule,
        ))
        .await
        .expect("recurring creation should succeed");
    let first_due = creation
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");

    let generated = service
        .generate_recurring_occurrences(first_due)
        .await
        .expect("generation should succeed");
    assert!(generated.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generation_is_idempotent_per_date(service: TestService) {
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let creation = service
        .create_recurring(CreateRecurringRequest::new(
            group(),
            name("小明"),
            "倒垃圾",
            rule,
        ))
        .await
        .expect("recurring creation should succeed");
    let first_due = creation
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");
    let next_monday = rule
        .next_occurrence(first_due)
        .expect("following monday exists");

    let first_run = service
        .generate_recurring_occurrences(next_monday)
        .await
        .expect("generation should succeed");
    assert_eq!(first_run.len(), 1);

    let second_run = service
        .generate_recurring_occurrences(next_monday)
        .await
        .expect("repeat generation should succeed");
    assert!(second_run.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generation_skips_dates_the_rule_does_not_match(service: TestService) {
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let creation = service
        .create_recurring(CreateRecurringRequest::new(
            group(),
            name("小明"),
            "倒垃圾",
            rule,
        ))
        .await
        .expect("recurring creation should succeed");
    let first_due = creation
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");
    let tuesday = first_due.succ_opt().expect("next day exists");

    let generated = service
        .generate_recurring_occurrences(tuesday)
        .await
        .expect("generation should succeed");
    assert!(generated.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_recurring_stops_generation(service: TestService) {
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let creation = service
        .create_recurring(CreateRecurringRequest::new(
            group(),
            name("小明"),
            "倒垃圾",
            rule,
        ))
        .await
        .expect("recurring creation should succeed");
    let first_due = creation
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");

    let cancelled = service
        .cancel_recurring(&group(), creation.template.id())
        .await
        .expect("cancellation should succeed");
    assert!(!cancelled.has_active_recurrence());

    let next_monday = rule
        .next_occurrence(first_due)
        .expect("following monday exists");
    let generated = service
        .generate_recurring_occurrences(next_monday)
        .await
        .expect("generation should succeed");
    assert!(generated.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_recurring_rejects_plain_and_missing_tasks(service: TestService) {
    let plain = create_simple(&service, "一次性任務").await;
    let result = service.cancel_recurring(&group(), plain.id()).await;
    assert!(matches!(
        result,
        Err(TaskCommandError::NotRecurring(id)) if id == plain.id()
    ));

    let missing = TaskId::from_sequence(500).expect("positive id");
    let result = service.cancel_recurring(&group(), missing).await;
    assert!(matches!(
        result,
        Err(TaskCommandError::TaskNotFound(id)) if id == missing
    ));
}
