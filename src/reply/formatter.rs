//! Reply construction from engine results and typed failures.

use super::templates;
use crate::command::domain::CommandParseError;
use crate::task::{
    domain::{Priority, Task, TaskDomainError, TaskStatus},
    ports::CompletionRecord,
    services::{RecurringCreation, TaskCommandError},
};
use chrono::NaiveDate;
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while rendering a reply template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplyError {
    /// Template rendering failed.
    #[error("template rendering failed: {reason}")]
    TemplateRender {
        /// Rendering failure reason.
        reason: String,
    },
}

/// Serialisable view of one task for template contexts.
#[derive(Debug, Serialize)]
struct TaskView {
    id: String,
    content: String,
    assignee: String,
    priority: &'static str,
    done: bool,
    due_line: Option<String>,
    recurrence: Option<String>,
    created_on: String,
    completed_on: Option<String>,
}

impl TaskView {
    fn from_task(task: &Task, today: NaiveDate) -> Self {
        let recurrence = task.recurrence().map(|schedule| {
            if schedule.is_cancelled() {
                format!("{}（已取消）", schedule.rule())
            } else {
                schedule.rule().to_string()
            }
        });
        Self {
            id: task.id().to_string(),
            content: task.content().to_owned(),
            assignee: task.assignee_name().to_string(),
            priority: task.priority().label(),
            done: task.status() == TaskStatus::Done,
            due_line: task.due_date().map(|due| due_line(due, today)),
            recurrence,
            created_on: task.created_at().format("%Y/%m/%d").to_string(),
            completed_on: task
                .completed_at()
                .map(|at| at.format("%Y/%m/%d").to_string()),
        }
    }
}

/// Returns the static command reference.
#[must_use]
pub const fn help_text() -> &'static str {
    templates::HELP
}

/// Returns the generic internal-failure reply.
#[must_use]
pub const fn internal_error() -> &'static str {
    "處理指令時發生內部錯誤，請稍後再試。"
}

/// Renders a parse failure into its user-facing reply.
///
/// Unknown keywords get the full command reference; every other variant
/// names the offending token.
#[must_use]
pub fn parse_failure(err: &CommandParseError) -> String {
    match err {
        CommandParseError::UnknownCommand(_) => help_text().to_owned(),
        CommandParseError::MissingArgument(field) => format!("指令缺少必要內容：{field}"),
        CommandParseError::InvalidPriorityToken(token) => {
            format!("優先度標記不正確：{token}（請使用 !低 / !中 / !高）")
        }
        CommandParseError::InvalidDateFormat(token) => {
            format!("日期格式不正確：{token}，請使用 YYYY/MM/DD 格式")
        }
        CommandParseError::InvalidRecurrenceExpression(expr) => {
            format!("重複週期格式不正確：{expr}（例：每週一、每月15日、每年3月15日）")
        }
        CommandParseError::MissingMention => "請使用 @成員 指定負責人".to_owned(),
        CommandParseError::MissingTaskId => "請提供任務ID（例：T-12）".to_owned(),
    }
}

/// Renders an engine failure into its user-facing reply.
///
/// Infrastructure failures map to the generic internal-error reply; the
/// caller is responsible for logging the underlying cause.
#[must_use]
pub fn command_failure(err: &TaskCommandError) -> String {
    match err {
        TaskCommandError::MemberNotFound(name) => format!("找不到成員：{name}"),
        TaskCommandError::TaskNotFound(id) => format!("找不到ID為 {id} 的任務"),
        TaskCommandError::NotRecurring(id) => format!("任務 {id} 不是定期任務"),
        TaskCommandError::Validation(domain_err) => validation_failure(domain_err),
        TaskCommandError::Directory(_) | TaskCommandError::Store(_) => {
            internal_error().to_owned()
        }
    }
}

fn validation_failure(err: &TaskDomainError) -> String {
    match err {
        TaskDomainError::InvalidPriorityToken(token) => {
            format!("優先度標記不正確：{token}（請使用 !低 / !中 / !高）")
        }
        TaskDomainError::InvalidDueDate(token) => {
            format!("日期格式不正確：{token}，請使用 YYYY/MM/DD 格式")
        }
        TaskDomainError::InvalidRecurrenceExpression(expr) => {
            format!("重複週期格式不正確：{expr}")
        }
        TaskDomainError::EmptyContent => "任務內容不可為空".to_owned(),
        TaskDomainError::InvalidTaskId(token) => format!("任務ID格式不正確：{token}"),
        TaskDomainError::InvalidMemberName(name) => format!("成員名稱不正確：{name}"),
    }
}

/// Reply for a created task.
#[must_use]
pub fn created(task: &Task) -> String {
    let mut reply = format!(
        "已為 {} 新增任務：{}\n任務ID：{}",
        task.assignee_name(),
        task.content(),
        task.id()
    );
    if task.priority() != Priority::Normal {
        reply.push_str(&format!("\n優先度：{}", task.priority().label()));
    }
    match task.due_date() {
        Some(due) => reply.push_str(&format!("\n截止日期：{}", due.format("%Y/%m/%d"))),
        None => reply.push_str("\n無截止日期"),
    }
    reply
}

/// Reply for a created batch.
#[must_use]
pub fn batch_created(tasks: &[Task]) -> String {
    let assignee = tasks
        .first()
        .map(|task| task.assignee_name().to_string())
        .unwrap_or_default();
    let mut reply = format!("已為 {assignee} 新增 {} 項任務：", tasks.len());
    for task in tasks {
        reply.push_str(&format!("\n・{}　{}", task.id(), task.content()));
    }
    reply
}

/// Reply for a created recurring template and its first occurrence.
#[must_use]
pub fn recurring_created(creation: &RecurringCreation) -> String {
    let template = &creation.template;
    let rule_text = template
        .recurrence()
        .map(|schedule| schedule.rule().to_string())
        .unwrap_or_default();
    let mut reply = format!(
        "已建立定期任務：{}\n任務ID：{}\n週期：{rule_text}",
        template.content(),
        template.id()
    );
    if let Some(occurrence) = &creation.first_occurrence {
        let due = occurrence
            .due_date()
            .map(|date| date.format("%Y/%m/%d").to_string())
            .unwrap_or_default();
        reply.push_str(&format!(
            "\n已產生第一筆任務：{}（截止 {due}）",
            occurrence.id()
        ));
    }
    reply
}

/// Reply for a cancelled recurring schedule.
#[must_use]
pub fn recurring_cancelled(task: &Task) -> String {
    format!("已取消任務 {} 的定期排程：{}", task.id(), task.content())
}

/// Reply for a completion, idempotent on repeats.
#[must_use]
pub fn completed(record: &CompletionRecord) -> String {
    if record.already_done {
        return format!("任務 {} 已經標記為完成", record.task.id());
    }
    format!(
        "已將 {} 的任務 {} 標記為完成！\n任務內容：{}",
        record.task.assignee_name(),
        record.task.id(),
        record.task.content()
    )
}

/// Reply for an updated task.
#[must_use]
pub fn updated(task: &Task) -> String {
    let mut reply = format!(
        "已更新任務 {}\n內容：{}\n優先度：{}",
        task.id(),
        task.content(),
        task.priority().label()
    );
    if let Some(due) = task.due_date() {
        reply.push_str(&format!("\n截止日期：{}", due.format("%Y/%m/%d")));
    }
    reply
}

/// Reply for a deleted task.
#[must_use]
pub fn deleted(task: &Task) -> String {
    format!("已刪除任務 {}：{}", task.id(), task.content())
}

/// Renders a task listing under the given title.
///
/// # Errors
///
/// Returns [`ReplyError::TemplateRender`] when the template engine fails.
pub fn listing(title: &str, tasks: &[Task], today: NaiveDate) -> Result<String, ReplyError> {
    if tasks.is_empty() {
        return Ok(format!("{title}：目前沒有任務"));
    }
    let views: Vec<TaskView> = tasks
        .iter()
        .map(|task| TaskView::from_task(task, today))
        .collect();
    render(
        templates::LISTING,
        minijinja::context! { title => title, tasks => views },
    )
}

/// Renders the full record of one task.
///
/// # Errors
///
/// Returns [`ReplyError::TemplateRender`] when the template engine fails.
pub fn detail(task: &Task, today: NaiveDate) -> Result<String, ReplyError> {
    render(
        templates::DETAIL,
        minijinja::context! { task => TaskView::from_task(task, today) },
    )
}

fn due_line(due: NaiveDate, today: NaiveDate) -> String {
    let days_left = due.signed_duration_since(today).num_days();
    let status = if days_left < 0 {
        "⚠️ 已逾期".to_owned()
    } else if days_left == 0 {
        "⚠️ 今天到期".to_owned()
    } else if days_left < 2 {
        format!("⚠️ 即將到期 ({days_left}天)")
    } else {
        format!("還有 {days_left} 天")
    };
    format!("{} {status}", due.format("%Y/%m/%d"))
}

fn render(template: &str, context: minijinja::Value) -> Result<String, ReplyError> {
    let environment = Environment::new();
    environment
        .render_str(template, context)
        .map_err(|error| ReplyError::TemplateRender {
            reason: error.to_string(),
        })
        .map(|rendered| rendered.trim_end().to_owned())
}
