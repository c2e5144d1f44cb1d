mod avatar;
mod comment_thread;
mod dashboard;
mod date_picker;
mod dropdowns;
mod employee_modal;
mod filter_bar;
mod kanban_board;
mod kanban_card;
mod kanban_column;
mod navigation;
mod outside_click;
mod task_detail;
mod task_form;

pub use avatar::EmployeeAvatar;
pub use comment_thread::{
  CommentComposer,
  CommentThread
};
pub use dashboard::Dashboard;
pub use date_picker::DateInput;
pub use dropdowns::{
  MultiSelectDropdown,
  SelectOption,
  SingleSelectDropdown
};
pub use employee_modal::EmployeeModal;
pub use filter_bar::FilterBar;
pub use kanban_board::KanbanBoard;
pub(crate) use kanban_board::lane_color;
pub use kanban_card::KanbanCard;
pub use kanban_column::KanbanColumn;
pub use navigation::Navigation;
pub use outside_click::{
  OutsideClickProvider,
  use_outside_click
};
pub use task_detail::TaskDetail;
pub use task_form::TaskForm;
