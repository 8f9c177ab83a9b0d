//! Minijinja sources for multi-line replies.

/// Group or member task listing.
pub const LISTING: &str = "\
📋 {{ title }} 📋
{% for task in tasks %}
【{{ task.id }}】{% if task.done %}✅{% else %}⬜{% endif %} {{ task.content }}
👤 負責人: {{ task.assignee }}｜優先度: {{ task.priority }}
{%- if task.due_line %}
📅 截止: {{ task.due_line }}
{%- endif %}
{%- if task.recurrence %}
🔁 {{ task.recurrence }}
{%- endif %}
{% endfor %}";

/// Full single-task record.
pub const DETAIL: &str = "\
【{{ task.id }}】{{ task.content }}
👤 負責人: {{ task.assignee }}
🎯 優先度: {{ task.priority }}
📌 狀態: {% if task.done %}✅ 已完成{% else %}⬜ 未完成{% endif %}
{%- if task.due_line %}
📅 截止: {{ task.due_line }}
{%- endif %}
{%- if task.recurrence %}
🔁 {{ task.recurrence }}
{%- endif %}
🕐 建立於: {{ task.created_on }}
{%- if task.completed_on %}
🏁 完成於: {{ task.completed_on }}
{%- endif %}";

/// Static command reference shown for `#幫助` and unrecognised keywords.
pub const HELP: &str = "\
📋 待辦事項機器人指令 📋

🔸 新增任務:
   #新增 @成員 [!低|!中|!高] 任務內容 [YYYY/MM/DD]
   例: #新增 @小明 !高 買晚餐 2026/04/17

🔸 批量新增:
   #批量新增 @成員
   任務一 [YYYY/MM/DD]
   !高 任務二

🔸 定期任務:
   #定期 @成員 任務內容 每週一
   (支援 每週X、每月N日、每年M月N日)
   #取消定期 T-任務ID

🔸 完成任務:
   #完成 T-任務ID

🔸 查看任務:
   #列表          (看本群組全部任務)
   #列表 @成員   (看指定成員任務)
   #詳情 T-任務ID

🔸 修改與刪除:
   #修改 T-任務ID [新內容] [!高] [YYYY/MM/DD]
   #刪除 T-任務ID

🔸 其他功能:
   #擲筊 問題
   #抽籤 選項1 選項2 ...
   #幫助 (顯示本說明)";
