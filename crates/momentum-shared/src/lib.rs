//! Browser-independent core of the Momentum
//! task board: API data model, comment
//! threading, filter state, form validation
//! and widget state machines.

pub mod comments;
pub mod error;
pub mod filters;
pub mod model;
pub mod validation;
pub mod widgets;

pub use comments::{
  Placement,
  Threads
};
pub use error::ApiError;
pub use filters::{
  FilterDimension,
  FilterSelection,
  FilterStore,
  KeyValueStore
};
pub use model::{
  Comment,
  CommentCreate,
  Department,
  Employee,
  EmployeeCreate,
  Logo,
  Priority,
  Status,
  Task,
  TaskCreate,
  TaskStatusUpdate
};
pub use validation::{
  EmployeeDraft,
  TaskDraft,
  ValidationErrors
};
