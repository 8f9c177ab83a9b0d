//! Scheduled recurrence generation: idempotence, cancellation, and
//! cross-group scanning through the public service API.

use std::sync::Arc;

use chrono::Weekday;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use taskline::task::adapters::memory::{InMemoryMemberDirectory, InMemoryTaskStore};
use taskline::task::domain::{GroupId, MemberName, RecurrenceRule, Task};
use taskline::task::services::{CreateRecurringRequest, TaskLifecycleService};

type Service = TaskLifecycleService<InMemoryTaskStore, InMemoryMemberDirectory, DefaultClock>;

#[fixture]
fn service() -> Service {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskStore::new()),
        Arc::new(InMemoryMemberDirectory::new()),
        Arc::new(DefaultClock),
    )
}

fn member(name: &str) -> MemberName {
    MemberName::new(name).expect("valid member name")
}

/// Asserts exactly one occurrence was generated, in the expected group.
///
/// # Errors
///
/// Returns an error if the count differs or the occurrence landed in
/// another group.
fn assert_single_occurrence(generated: &[Task], group: &str) -> Result<(), eyre::Report> {
    eyre::ensure!(
        generated.len() == 1,
        "expected exactly one occurrence, found {}",
        generated.len()
    );
    let occurrence = generated
        .first()
        .ok_or_else(|| eyre::eyre!("expected at least one occurrence"))?;
    eyre::ensure!(
        occurrence.group().as_str() == group,
        "occurrence landed in the wrong group"
    );
    Ok(())
}

async fn weekly_template(
    service: &Service,
    group: &str,
    content: &str,
) -> taskline::task::services::RecurringCreation {
    service
        .create_recurring(CreateRecurringRequest::new(
            GroupId::new(group),
            member("小明"),
            content,
            RecurrenceRule::weekly(Weekday::Mon),
        ))
        .await
        .expect("recurring creation should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_trigger_scans_every_group(service: Service) {
    let first = weekly_template(&service, "G-a", "A群倒垃圾").await;
    weekly_template(&service, "G-b", "B群倒垃圾").await;

    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let first_due = first
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");
    let next_monday = rule.next_occurrence(first_due).expect("monday exists");

    let generated = service
        .generate_recurring_occurrences(next_monday)
        .await
        .expect("generation should succeed");

    assert_eq!(generated.len(), 2);
    let groups: Vec<String> = generated
        .iter()
        .map(|task| task.group().to_string())
        .collect();
    assert!(groups.contains(&"G-a".to_owned()));
    assert!(groups.contains(&"G-b".to_owned()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_triggers_generate_exactly_once(service: Service) {
    let creation = weekly_template(&service, "G-race", "倒垃圾").await;
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let first_due = creation
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");
    let next_monday = rule.next_occurrence(first_due).expect("monday exists");

    let (left, right) = tokio::join!(
        service.generate_recurring_occurrences(next_monday),
        service.generate_recurring_occurrences(next_monday),
    );
    let mut generated = left.expect("generation should succeed");
    generated.extend(right.expect("generation should succeed"));

    assert_single_occurrence(&generated, "G-race").expect("exactly one occurrence");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_templates_stop_producing(service: Service) {
    let creation = weekly_template(&service, "G-cancel", "倒垃圾").await;
    let rule = RecurrenceRule::weekly(Weekday::Mon);
    let first_due = creation
        .first_occurrence
        .as_ref()
        .and_then(|task| task.due_date())
        .expect("first occurrence has a due date");

    service
        .cancel_recurring(&GroupId::new("G-cancel"), creation.template.id())
        .await
        .expect("cancellation should succeed");

    let next_monday = rule.next_occurrence(first_due).expect("monday exists");
    let generated = service
        .generate_recurring_occurrences(next_monday)
        .await
        .expect("generation should succeed");
    assert!(generated.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn occurrences_inherit_template_fields_but_not_the_rule(service: Service) {
    let creation = weekly_template(&service, "G-inherit", "倒垃圾").await;
    let occurrence = creation
        .first_occurrence
        .expect("first occurrence generated");

    assert_eq!(occurrence.content(), creation.template.content());
    assert_eq!(occurrence.assignee(), creation.template.assignee());
    assert_eq!(occurrence.priority(), creation.template.priority());
    assert!(occurrence.recurrence().is_none());
    assert!(occurrence.is_open());
}
