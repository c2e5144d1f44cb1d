use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{
  CommentCreate,
  CommentId,
  DepartmentId,
  Employee,
  EmployeeCreate,
  EmployeeId,
  PriorityId,
  StatusId,
  TaskCreate
};

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_TEXT_CHARS: usize = 255;
pub const MIN_DESCRIPTION_WORDS: usize = 4;
pub const MAX_AVATAR_BYTES: u64 = 600 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Description,
  DueDate,
  Status,
  Priority,
  Department,
  Employee,
  Name,
  Surname,
  Avatar,
  Text
}

impl Field {
  pub fn label(self) -> &'static str {
    match self {
      | Self::Title => "Title",
      | Self::Description => "Description",
      | Self::DueDate => "Due date",
      | Self::Status => "Status",
      | Self::Priority => "Priority",
      | Self::Department => "Department",
      | Self::Employee => "Employee",
      | Self::Name => "Name",
      | Self::Surname => "Surname",
      | Self::Avatar => "Avatar",
      | Self::Text => "Comment"
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
  #[error("is required")]
  Required,
  #[error("must be at least {0} characters")]
  TooShort(usize),
  #[error("must be at most {0} characters")]
  TooLong(usize),
  #[error("must contain at least {0} words")]
  TooFewWords(usize),
  #[error("may only contain Latin or Georgian letters")]
  InvalidLetters,
  #[error("cannot be in the past")]
  InPast,
  #[error("must be an image")]
  NotAnImage,
  #[error("must be at most {} KB", .0 / 1024)]
  FileTooLarge(u64),
  #[error("does not belong to the chosen department")]
  WrongDepartment
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field:   Field,
  pub problem: Problem
}

impl fmt::Display for FieldError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{} {}", self.field.label(), self.problem)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summary(.errors))]
pub struct ValidationErrors {
  pub errors: Vec<FieldError>
}

fn summary(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}

impl ValidationErrors {
  fn push(&mut self, field: Field, problem: Problem) {
    self.errors.push(FieldError { field, problem });
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  /// First problem reported for `field`, for
  /// inline rendering next to the input.
  pub fn for_field(
    &self,
    field: Field
  ) -> Option<&Problem> {
    self
      .errors
      .iter()
      .find(|error| error.field == field)
      .map(|error| &error.problem)
  }

  fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() {
      Ok(value)
    } else {
      Err(self)
    }
  }
}

/// Unvalidated task form input. `title` is
/// sent to the API as `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
  pub title:          String,
  pub description:    String,
  pub due_date:       Option<NaiveDate>,
  pub status_id:      Option<StatusId>,
  pub priority_id:    Option<PriorityId>,
  pub department_id:  Option<DepartmentId>,
  pub employee_id:    Option<EmployeeId>,
  /// Due date the task already has on the
  /// server. Keeping it is allowed even once
  /// it lies in the past.
  pub saved_due_date: Option<NaiveDate>
}

impl TaskDraft {
  /// `employees` is used to check that the
  /// assignee works in the chosen department.
  pub fn validate(
    &self,
    today: NaiveDate,
    employees: &[Employee]
  ) -> Result<TaskCreate, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = self.title.trim();
    if let Some(problem) = check_length(title) {
      errors.push(Field::Title, problem);
    }

    let description = self.description.trim();
    if let Some(problem) =
      check_description(description)
    {
      errors.push(Field::Description, problem);
    }

    match self.due_date {
      | None => {
        errors.push(Field::DueDate, Problem::Required);
      }
      | Some(date)
        if date < today
          && self.saved_due_date != Some(date) =>
      {
        errors.push(Field::DueDate, Problem::InPast);
      }
      | Some(_) => {}
    }

    let status_id = required(
      &mut errors,
      Field::Status,
      self.status_id
    );
    let priority_id = required(
      &mut errors,
      Field::Priority,
      self.priority_id
    );
    let department_id = required(
      &mut errors,
      Field::Department,
      self.department_id
    );
    let employee_id = required(
      &mut errors,
      Field::Employee,
      self.employee_id
    );

    if let (Some(department_id), Some(employee_id)) =
      (department_id, employee_id)
      && works_elsewhere(
        employees,
        employee_id,
        department_id
      )
    {
      errors.push(
        Field::Employee,
        Problem::WrongDepartment
      );
    }

    match (
      self.due_date,
      status_id,
      priority_id,
      department_id,
      employee_id
    ) {
      | (
        Some(due_date),
        Some(status_id),
        Some(priority_id),
        Some(department_id),
        Some(employee_id)
      ) if errors.is_empty() => Ok(TaskCreate {
        name: title.to_string(),
        description: (!description.is_empty())
          .then(|| description.to_string()),
        due_date,
        status_id,
        priority_id,
        department_id,
        employee_id
      }),
      | _ => {
        tracing::debug!(%errors, "task draft rejected");
        Err(errors)
      }
    }
  }
}

fn check_description(
  description: &str
) -> Option<Problem> {
  if description.is_empty() {
    return None;
  }
  let words =
    description.split_whitespace().count();
  if words < MIN_DESCRIPTION_WORDS {
    Some(Problem::TooFewWords(
      MIN_DESCRIPTION_WORDS
    ))
  } else if description.chars().count()
    > MAX_TEXT_CHARS
  {
    Some(Problem::TooLong(MAX_TEXT_CHARS))
  } else {
    None
  }
}

fn required<T>(
  errors: &mut ValidationErrors,
  field: Field,
  value: Option<T>
) -> Option<T> {
  if value.is_none() {
    errors.push(field, Problem::Required);
  }
  value
}

/// True only when the employee's department
/// is known and differs.
fn works_elsewhere(
  employees: &[Employee],
  employee_id: EmployeeId,
  department_id: DepartmentId
) -> bool {
  employees
    .iter()
    .find(|employee| employee.id == employee_id)
    .and_then(|employee| employee.department.as_ref())
    .is_some_and(|department| {
      department.id != department_id
    })
}

/// Avatar file metadata as read from the
/// file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
  pub name:      String,
  pub mime_type: String,
  pub size:      u64
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeDraft {
  pub name:          String,
  pub surname:       String,
  pub department_id: Option<DepartmentId>,
  pub avatar:        Option<AvatarFile>
}

impl EmployeeDraft {
  pub fn validate(
    &self
  ) -> Result<EmployeeCreate, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for (field, value) in [
      (Field::Name, self.name.trim()),
      (Field::Surname, self.surname.trim()),
    ] {
      if let Some(problem) = check_length(value) {
        errors.push(field, problem);
      } else if !is_latin_or_georgian(value) {
        errors.push(field, Problem::InvalidLetters);
      }
    }

    match &self.avatar {
      | None => {
        errors.push(Field::Avatar, Problem::Required);
      }
      | Some(file)
        if !file.mime_type.starts_with("image/") =>
      {
        errors.push(Field::Avatar, Problem::NotAnImage);
      }
      | Some(file) if file.size > MAX_AVATAR_BYTES => {
        errors.push(
          Field::Avatar,
          Problem::FileTooLarge(MAX_AVATAR_BYTES)
        );
      }
      | Some(_) => {}
    }

    let Some(department_id) = self.department_id else {
      errors.push(Field::Department, Problem::Required);
      return Err(errors);
    };

    errors.into_result(EmployeeCreate {
      name: self.name.trim().to_string(),
      surname: self.surname.trim().to_string(),
      department_id
    })
  }
}

pub fn validate_comment(
  text: &str,
  parent_id: Option<CommentId>
) -> Result<CommentCreate, ValidationErrors> {
  let mut errors = ValidationErrors::default();
  let text = text.trim();
  if text.is_empty() {
    errors.push(Field::Text, Problem::Required);
  }
  errors.into_result(CommentCreate {
    text: text.to_string(),
    parent_id
  })
}

fn check_length(value: &str) -> Option<Problem> {
  let count = value.chars().count();
  if count == 0 {
    Some(Problem::Required)
  } else if count < MIN_NAME_CHARS {
    Some(Problem::TooShort(MIN_NAME_CHARS))
  } else if count > MAX_TEXT_CHARS {
    Some(Problem::TooLong(MAX_TEXT_CHARS))
  } else {
    None
  }
}

fn is_latin_or_georgian(value: &str) -> bool {
  value.chars().all(|ch| {
    ch.is_ascii_alphabetic()
      || ('\u{10A0}'..='\u{10FF}').contains(&ch)
  })
}

/// Employees eligible for a department;
/// everyone when no department is chosen.
pub fn employees_in_department(
  employees: &[Employee],
  department_id: Option<DepartmentId>
) -> Vec<&Employee> {
  employees
    .iter()
    .filter(|employee| {
      department_id.is_none_or(|wanted| {
        employee
          .department
          .as_ref()
          .is_none_or(|department| {
            department.id == wanted
          })
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Department;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19)
      .expect("valid date")
  }

  fn employee(
    id: EmployeeId,
    department: DepartmentId
  ) -> Employee {
    Employee {
      id,
      name: "Giorgi".to_string(),
      surname: "Kapanadze".to_string(),
      avatar: None,
      department: Some(Department {
        id:   department,
        name: format!("department {department}"),
        icon: None
      })
    }
  }

  fn complete_draft() -> TaskDraft {
    TaskDraft {
      title:          "Prepare release notes".to_string(),
      description:    String::new(),
      due_date:       Some(today()),
      status_id:      Some(1),
      priority_id:    Some(2),
      department_id:  Some(3),
      employee_id:    Some(4),
      saved_due_date: None
    }
  }

  #[test]
  fn complete_draft_maps_title_to_name() {
    let payload = complete_draft()
      .validate(today(), &[employee(4, 3)])
      .expect("valid draft");

    assert_eq!(payload.name, "Prepare release notes");
    assert_eq!(payload.description, None);
    assert_eq!(payload.employee_id, 4);
  }

  #[test]
  fn one_character_title_is_rejected() {
    let draft = TaskDraft {
      title: "x".to_string(),
      ..complete_draft()
    };
    let errors = draft
      .validate(today(), &[])
      .expect_err("too short");

    assert_eq!(
      errors.for_field(Field::Title),
      Some(&Problem::TooShort(MIN_NAME_CHARS))
    );
    assert_eq!(errors.errors.len(), 1);
  }

  #[test]
  fn title_length_bounds_count_characters() {
    let at_limit = TaskDraft {
      title: "ა".repeat(MAX_TEXT_CHARS),
      ..complete_draft()
    };
    assert!(at_limit.validate(today(), &[]).is_ok());

    let over = TaskDraft {
      title: "a".repeat(MAX_TEXT_CHARS + 1),
      ..complete_draft()
    };
    assert_eq!(
      over
        .validate(today(), &[])
        .expect_err("too long")
        .for_field(Field::Title),
      Some(&Problem::TooLong(MAX_TEXT_CHARS))
    );
  }

  #[test]
  fn description_needs_four_words_when_present() {
    let draft = TaskDraft {
      description: "only three words".to_string(),
      ..complete_draft()
    };
    assert_eq!(
      draft
        .validate(today(), &[])
        .expect_err("short description")
        .for_field(Field::Description),
      Some(&Problem::TooFewWords(MIN_DESCRIPTION_WORDS))
    );

    let draft = TaskDraft {
      description: "  now it has four words  "
        .to_string(),
      ..complete_draft()
    };
    let payload = draft
      .validate(today(), &[])
      .expect("valid description");
    assert_eq!(
      payload.description.as_deref(),
      Some("now it has four words")
    );
  }

  #[test]
  fn missing_selections_are_all_reported() {
    let draft = TaskDraft {
      title: "Valid title".to_string(),
      ..TaskDraft::default()
    };
    let errors = draft
      .validate(today(), &[])
      .expect_err("incomplete");
    let fields: Vec<Field> = errors
      .errors
      .iter()
      .map(|error| error.field)
      .collect();

    assert_eq!(
      fields,
      vec![
        Field::DueDate,
        Field::Status,
        Field::Priority,
        Field::Department,
        Field::Employee,
      ]
    );
  }

  #[test]
  fn past_due_date_is_rejected() {
    let draft = TaskDraft {
      due_date: today().pred_opt(),
      ..complete_draft()
    };
    assert_eq!(
      draft
        .validate(today(), &[])
        .expect_err("past date")
        .for_field(Field::DueDate),
      Some(&Problem::InPast)
    );
  }

  #[test]
  fn overdue_task_keeps_its_saved_date() {
    let overdue = today().pred_opt();
    let draft = TaskDraft {
      due_date: overdue,
      saved_due_date: overdue,
      ..complete_draft()
    };
    assert!(draft.validate(today(), &[]).is_ok());

    let moved = TaskDraft {
      due_date: overdue.and_then(|date| date.pred_opt()),
      ..draft
    };
    assert_eq!(
      moved
        .validate(today(), &[])
        .expect_err("moved into the past")
        .for_field(Field::DueDate),
      Some(&Problem::InPast)
    );
  }

  #[test]
  fn assignee_must_match_department() {
    let errors = complete_draft()
      .validate(today(), &[employee(4, 9)])
      .expect_err("wrong department");
    assert_eq!(
      errors.for_field(Field::Employee),
      Some(&Problem::WrongDepartment)
    );
  }

  #[test]
  fn employee_draft_checks_letters_and_avatar() {
    let draft = EmployeeDraft {
      name:          "ნინო".to_string(),
      surname:       "Smith2".to_string(),
      department_id: Some(1),
      avatar:        Some(AvatarFile {
        name:      "me.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size:      10
      })
    };
    let errors = draft.validate().expect_err("invalid");

    assert_eq!(errors.for_field(Field::Name), None);
    assert_eq!(
      errors.for_field(Field::Surname),
      Some(&Problem::InvalidLetters)
    );
    assert_eq!(
      errors.for_field(Field::Avatar),
      Some(&Problem::NotAnImage)
    );
  }

  #[test]
  fn employee_avatar_size_limit() {
    let mut draft = EmployeeDraft {
      name:          "Nino".to_string(),
      surname:       "Beridze".to_string(),
      department_id: Some(2),
      avatar:        Some(AvatarFile {
        name:      "me.png".to_string(),
        mime_type: "image/png".to_string(),
        size:      MAX_AVATAR_BYTES + 1
      })
    };
    let errors = draft.validate().expect_err("too large");
    assert_eq!(
      errors.to_string(),
      "Avatar must be at most 600 KB"
    );

    if let Some(avatar) = draft.avatar.as_mut() {
      avatar.size = MAX_AVATAR_BYTES;
    }
    let payload =
      draft.validate().expect("valid employee");
    assert_eq!(payload.department_id, 2);
    assert_eq!(payload.form_fields()[2].1, "2");
  }

  #[test]
  fn blank_comment_is_rejected() {
    assert!(validate_comment("   ", None).is_err());
    let payload =
      validate_comment(" thanks! ", Some(3))
        .expect("valid");
    assert_eq!(payload.text, "thanks!");
    assert_eq!(payload.parent_id, Some(3));
  }

  #[test]
  fn employee_picker_narrows_by_department() {
    let staff =
      vec![
        employee(1, 1),
        employee(2, 2),
        employee(3, 1),
      ];
    let ids: Vec<EmployeeId> =
      employees_in_department(&staff, Some(1))
        .iter()
        .map(|employee| employee.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(
      employees_in_department(&staff, None).len(),
      3
    );
  }
}
