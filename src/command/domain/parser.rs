//! The command lexer/parser.
//!
//! A command is one header line (marker, keyword, inline arguments) plus,
//! for batch creation only, one task line per following line. Tokens are
//! whitespace-separated; a `@` prefix marks a mention, a `!` prefix a
//! priority marker, and the last token of a line may be a `YYYY/MM/DD`
//! due date or (for recurring creation) a recurrence expression.

use super::{Command, CommandKeyword, CommandParseError};
use crate::task::domain::{
    MemberName, Priority, RecurrenceRule, TaskId, TaskLine, TaskPatch, is_date_shaped,
    parse_due_date,
};
use chrono::NaiveDate;
use std::str::Lines;

/// The marker character that opens every command.
pub const COMMAND_MARKER: char = '#';

/// Returns whether the text is addressed to the bot at all.
///
/// Non-command chatter is ignored upstream rather than parsed.
#[must_use]
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with(COMMAND_MARKER)
}

/// Parses raw message text into a validated [`Command`].
///
/// # Errors
///
/// Returns a [`CommandParseError`] naming the first offending token; the
/// whole input is rejected on any invalid part (batches are fail-closed,
/// never partially applied).
pub fn parse(text: &str) -> Result<Command, CommandParseError> {
    let trimmed = text.trim();
    let mut lines = trimmed.lines();
    let header = lines.next().unwrap_or_default();
    let mut header_tokens = header.split_whitespace();
    let keyword_token = header_tokens.next().unwrap_or_default();
    let keyword_word = keyword_token
        .strip_prefix(COMMAND_MARKER)
        .ok_or_else(|| CommandParseError::UnknownCommand(keyword_token.to_owned()))?;
    let keyword = CommandKeyword::resolve(keyword_word)
        .ok_or_else(|| CommandParseError::UnknownCommand(keyword_word.to_owned()))?;
    let args: Vec<&str> = header_tokens.collect();

    match keyword {
        CommandKeyword::Create => parse_create(&args),
        CommandKeyword::BatchCreate => parse_batch_create(&args, lines),
        CommandKeyword::CreateRecurring => parse_create_recurring(&args),
        CommandKeyword::CancelRecurring => {
            Ok(Command::CancelRecurring { id: parse_single_id(&args)? })
        }
        CommandKeyword::Complete => Ok(Command::Complete { id: parse_single_id(&args)? }),
        CommandKeyword::List => parse_list(&args),
        CommandKeyword::Update => parse_update(&args),
        CommandKeyword::Delete => Ok(Command::Delete { id: parse_single_id(&args)? }),
        CommandKeyword::Detail => Ok(Command::Detail { id: parse_single_id(&args)? }),
        CommandKeyword::Divination => parse_divination(&args),
        CommandKeyword::Lottery => parse_lottery(&args),
        CommandKeyword::Help => Ok(Command::Help),
    }
}

/// Priority, content, and trailing due date shared by several grammars.
struct LineFields {
    content: String,
    priority: Option<Priority>,
    due_date: Option<NaiveDate>,
}

fn parse_line_fields(tokens: &[&str]) -> Result<LineFields, CommandParseError> {
    let mut remaining: Vec<&str> = tokens.to_vec();
    let mut due_date = None;
    if remaining.last().is_some_and(|token| is_date_shaped(token)) {
        if let Some(token) = remaining.pop() {
            due_date = Some(parse_due_date(token)?);
        }
    }

    let mut priority = None;
    let mut content_tokens: Vec<&str> = Vec::new();
    for token in remaining {
        match token.strip_prefix('!') {
            Some(marker) => {
                if priority.is_some() {
                    return Err(CommandParseError::InvalidPriorityToken(token.to_owned()));
                }
                priority = Some(Priority::from_marker(marker)?);
            }
            None => content_tokens.push(token),
        }
    }

    Ok(LineFields {
        content: content_tokens.join(" "),
        priority,
        due_date,
    })
}

fn require_mention<'a>(
    args: &[&'a str],
) -> Result<(MemberName, Vec<&'a str>), CommandParseError> {
    let (first, rest) = args.split_first().ok_or(CommandParseError::MissingMention)?;
    let name = first
        .strip_prefix('@')
        .ok_or(CommandParseError::MissingMention)?;
    let assignee = MemberName::new(name)?;
    Ok((assignee, rest.to_vec()))
}

fn parse_single_id(args: &[&str]) -> Result<TaskId, CommandParseError> {
    let token = args.first().ok_or(CommandParseError::MissingTaskId)?;
    TaskId::parse(token).map_err(|_| CommandParseError::MissingTaskId)
}

fn parse_create(args: &[&str]) -> Result<Command, CommandParseError> {
    let (assignee, rest) = require_mention(args)?;
    let fields = parse_line_fields(&rest)?;
    if fields.content.is_empty() {
        return Err(CommandParseError::MissingArgument("任務內容"));
    }
    Ok(Command::Create {
        assignee,
        priority: fields.priority.unwrap_or_default(),
        content: fields.content,
        due_date: fields.due_date,
    })
}

fn parse_batch_create(args: &[&str], lines: Lines<'_>) -> Result<Command, CommandParseError> {
    let (assignee, rest) = require_mention(args)?;
    let mut task_lines = Vec::new();
    // Anything after the mention on the header line counts as the first
    // task line.
    if !rest.is_empty() {
        task_lines.push(parse_task_line(&rest)?);
    }
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        task_lines.push(parse_task_line(&tokens)?);
    }
    if task_lines.is_empty() {
        return Err(CommandParseError::MissingArgument("子任務清單"));
    }
    Ok(Command::BatchCreate {
        assignee,
        lines: task_lines,
    })
}

fn parse_task_line(tokens: &[&str]) -> Result<TaskLine, CommandParseError> {
    let fields = parse_line_fields(tokens)?;
    Ok(TaskLine::new(
        fields.content,
        fields.priority.unwrap_or_default(),
        fields.due_date,
    )?)
}

fn parse_create_recurring(args: &[&str]) -> Result<Command, CommandParseError> {
    let (assignee, rest) = require_mention(args)?;
    let (rule_token, body) = rest
        .split_last()
        .ok_or(CommandParseError::MissingArgument("重複週期"))?;
    let rule = RecurrenceRule::parse(rule_token)?;

    let mut priority = None;
    let mut content_tokens: Vec<&str> = Vec::new();
    for token in body.iter().copied() {
        match token.strip_prefix('!') {
            Some(marker) => {
                if priority.is_some() {
                    return Err(CommandParseError::InvalidPriorityToken(token.to_owned()));
                }
                priority = Some(Priority::from_marker(marker)?);
            }
            None => content_tokens.push(token),
        }
    }
    let content = content_tokens.join(" ");
    if content.is_empty() {
        return Err(CommandParseError::MissingArgument("任務內容"));
    }
    Ok(Command::CreateRecurring {
        assignee,
        priority: priority.unwrap_or_default(),
        content,
        rule,
    })
}

fn parse_list(args: &[&str]) -> Result<Command, CommandParseError> {
    match args.first() {
        None => Ok(Command::List { assignee: None }),
        Some(token) => {
            let name = token
                .strip_prefix('@')
                .ok_or(CommandParseError::MissingMention)?;
            Ok(Command::List {
                assignee: Some(MemberName::new(name)?),
            })
        }
    }
}

fn parse_update(args: &[&str]) -> Result<Command, CommandParseError> {
    let (id_token, rest) = args.split_first().ok_or(CommandParseError::MissingTaskId)?;
    let id = TaskId::parse(id_token).map_err(|_| CommandParseError::MissingTaskId)?;
    let fields = parse_line_fields(rest)?;

    let mut patch = TaskPatch::new();
    if !fields.content.is_empty() {
        patch = patch.with_content(fields.content)?;
    }
    if let Some(priority) = fields.priority {
        patch = patch.with_priority(priority);
    }
    if let Some(due_date) = fields.due_date {
        patch = patch.with_due_date(due_date);
    }
    if patch.is_empty() {
        return Err(CommandParseError::MissingArgument("修改內容"));
    }
    Ok(Command::Update { id, patch })
}

fn parse_divination(args: &[&str]) -> Result<Command, CommandParseError> {
    let question = args.join(" ");
    if question.is_empty() {
        return Err(CommandParseError::MissingArgument("問題內容"));
    }
    Ok(Command::Divination { question })
}

fn parse_lottery(args: &[&str]) -> Result<Command, CommandParseError> {
    if args.is_empty() {
        return Err(CommandParseError::MissingArgument("抽籤選項"));
    }
    Ok(Command::Lottery {
        options: args.iter().map(|option| (*option).to_owned()).collect(),
    })
}
