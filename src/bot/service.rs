//! Chat dispatch: one inbound event in, one reply out.

use super::{InboundEvent, novelty};
use crate::command::domain::{Command, is_command, parse};
use crate::reply;
use crate::task::{
    domain::{GroupId, MemberName, Priority, RecurrenceRule, TaskId, TaskLine, TaskPatch},
    ports::{MemberDirectory, TaskStore},
    services::{
        BatchCreateRequest, CreateRecurringRequest, CreateTaskRequest, TaskCommandError,
        TaskLifecycleService,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;

/// Front-door service turning inbound group messages into replies.
#[derive(Clone)]
pub struct ChatService<S, D, C>
where
    S: TaskStore,
    D: MemberDirectory,
    C: Clock + Send + Sync,
{
    lifecycle: TaskLifecycleService<S, D, C>,
    clock: Arc<C>,
}

impl<S, D, C> ChatService<S, D, C>
where
    S: TaskStore,
    D: MemberDirectory,
    C: Clock + Send + Sync,
{
    /// Creates a chat service over the given store, directory, and clock.
    #[must_use]
    pub fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            lifecycle: TaskLifecycleService::new(store, directory, Arc::clone(&clock)),
            clock,
        }
    }

    /// Returns the lifecycle service, for callers that bypass chat (the
    /// scheduled recurrence trigger).
    #[must_use]
    pub const fn lifecycle(&self) -> &TaskLifecycleService<S, D, C> {
        &self.lifecycle
    }

    /// Handles one inbound message.
    ///
    /// Returns `None` for non-command chatter; every command, valid or
    /// not, gets a reply.
    pub async fn handle_event(&self, event: &InboundEvent) -> Option<String> {
        let text = event.text();
        if !is_command(text) {
            return None;
        }
        tracing::debug!(group = %event.group(), sender = event.sender(), "handling command");
        let reply_text = match parse(text) {
            Err(err) => {
                tracing::debug!(error = %err, "command rejected at parse");
                reply::parse_failure(&err)
            }
            Ok(command) => self.dispatch(command, event.group()).await,
        };
        Some(reply_text)
    }

    async fn dispatch(&self, command: Command, group: &GroupId) -> String {
        match command {
            Command::Create {
                assignee,
                priority,
                content,
                due_date,
            } => {
                self.handle_create(group, assignee, priority, content, due_date)
                    .await
            }
            Command::BatchCreate { assignee, lines } => {
                self.handle_batch_create(group, assignee, lines).await
            }
            Command::CreateRecurring {
                assignee,
                priority,
                content,
                rule,
            } => {
                self.handle_create_recurring(group, assignee, priority, content, rule)
                    .await
            }
            Command::CancelRecurring { id } => self.handle_cancel_recurring(group, id).await,
            Command::Complete { id } => self.handle_complete(group, id).await,
            Command::List { assignee } => self.handle_list(group, assignee).await,
            Command::Update { id, patch } => self.handle_update(group, id, patch).await,
            Command::Delete { id } => self.handle_delete(group, id).await,
            Command::Detail { id } => self.handle_detail(group, id).await,
            Command::Help => reply::help_text().to_owned(),
            Command::Divination { question } => {
                novelty::divination(&question, &mut rand::thread_rng())
            }
            Command::Lottery { options } => novelty::lottery(&options, &mut rand::thread_rng()),
        }
    }

    async fn handle_create(
        &self,
        group: &GroupId,
        assignee: MemberName,
        priority: Priority,
        content: String,
        due_date: Option<NaiveDate>,
    ) -> String {
        let mut request =
            CreateTaskRequest::new(group.clone(), assignee, content).with_priority(priority);
        if let Some(due) = due_date {
            request = request.with_due_date(due);
        }
        match self.lifecycle.create(request).await {
            Ok(task) => reply::created(&task),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_batch_create(
        &self,
        group: &GroupId,
        assignee: MemberName,
        lines: Vec<TaskLine>,
    ) -> String {
        let request = BatchCreateRequest::new(group.clone(), assignee, lines);
        match self.lifecycle.batch_create(request).await {
            Ok(tasks) => reply::batch_created(&tasks),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_create_recurring(
        &self,
        group: &GroupId,
        assignee: MemberName,
        priority: Priority,
        content: String,
        rule: RecurrenceRule,
    ) -> String {
        let request = CreateRecurringRequest::new(group.clone(), assignee, content, rule)
            .with_priority(priority);
        match self.lifecycle.create_recurring(request).await {
            Ok(creation) => reply::recurring_created(&creation),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_cancel_recurring(&self, group: &GroupId, id: TaskId) -> String {
        match self.lifecycle.cancel_recurring(group, id).await {
            Ok(task) => reply::recurring_cancelled(&task),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_complete(&self, group: &GroupId, id: TaskId) -> String {
        match self.lifecycle.complete(group, id).await {
            Ok(record) => reply::completed(&record),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_list(&self, group: &GroupId, assignee: Option<MemberName>) -> String {
        let title = assignee.as_ref().map_or_else(
            || "本群組任務".to_owned(),
            |name| format!("{name} 的任務"),
        );
        match self.lifecycle.list(group, assignee.as_ref()).await {
            Ok(tasks) => rendered_or_internal(reply::listing(&title, &tasks, self.today())),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_update(&self, group: &GroupId, id: TaskId, patch: TaskPatch) -> String {
        match self.lifecycle.update(group, id, patch).await {
            Ok(task) => reply::updated(&task),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_delete(&self, group: &GroupId, id: TaskId) -> String {
        match self.lifecycle.delete(group, id).await {
            Ok(task) => reply::deleted(&task),
            Err(err) => failure_reply(&err),
        }
    }

    async fn handle_detail(&self, group: &GroupId, id: TaskId) -> String {
        match self.lifecycle.detail(group, id).await {
            Ok(task) => rendered_or_internal(reply::detail(&task, self.today())),
            Err(err) => failure_reply(&err),
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

fn failure_reply(err: &TaskCommandError) -> String {
    if matches!(
        err,
        TaskCommandError::Directory(_) | TaskCommandError::Store(_)
    ) {
        tracing::error!(error = %err, "infrastructure failure while handling command");
    }
    reply::command_failure(err)
}

fn rendered_or_internal(rendered: Result<String, reply::ReplyError>) -> String {
    rendered.unwrap_or_else(|err| {
        tracing::error!(error = %err, "reply rendering failed");
        reply::internal_error().to_owned()
    })
}
