//! The closed keyword table recognised after the command marker.

/// Command keyword, matched against the first token after `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKeyword {
    /// `新增` — create one task.
    Create,
    /// `批量新增` — create one task per following line.
    BatchCreate,
    /// `定期` — create a recurring-schedule template.
    CreateRecurring,
    /// `取消定期` — cancel a template's schedule.
    CancelRecurring,
    /// `完成` — complete a task.
    Complete,
    /// `列表` — list the group's tasks.
    List,
    /// `修改` — update a task's fields.
    Update,
    /// `刪除` — delete a task.
    Delete,
    /// `詳情` — show one task in full.
    Detail,
    /// `擲筊` — divination draw.
    Divination,
    /// `抽籤` — random-choice lottery.
    Lottery,
    /// `幫助` — command reference.
    Help,
}

impl CommandKeyword {
    /// Resolves a keyword word (without the marker) against the closed
    /// table.
    #[must_use]
    pub fn resolve(word: &str) -> Option<Self> {
        match word {
            "新增" => Some(Self::Create),
            "批量新增" => Some(Self::BatchCreate),
            "定期" => Some(Self::CreateRecurring),
            "取消定期" => Some(Self::CancelRecurring),
            "完成" => Some(Self::Complete),
            "列表" => Some(Self::List),
            "修改" => Some(Self::Update),
            "刪除" => Some(Self::Delete),
            "詳情" => Some(Self::Detail),
            "擲筊" => Some(Self::Divination),
            "抽籤" => Some(Self::Lottery),
            "幫助" => Some(Self::Help),
            _ => None,
        }
    }

    /// Returns the chat-facing keyword text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "新增",
            Self::BatchCreate => "批量新增",
            Self::CreateRecurring => "定期",
            Self::CancelRecurring => "取消定期",
            Self::Complete => "完成",
            Self::List => "列表",
            Self::Update => "修改",
            Self::Delete => "刪除",
            Self::Detail => "詳情",
            Self::Divination => "擲筊",
            Self::Lottery => "抽籤",
            Self::Help => "幫助",
        }
    }
}
