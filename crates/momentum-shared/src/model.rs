use chrono::{
  DateTime,
  Local,
  NaiveDate,
  NaiveDateTime,
  TimeZone
};
use serde::{
  Deserialize,
  Serialize
};

pub type TaskId = u64;
pub type CommentId = u64;
pub type StatusId = u64;
pub type DepartmentId = u64;
pub type PriorityId = u64;
pub type EmployeeId = u64;

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Status {
  pub id:   StatusId,
  pub name: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Department {
  pub id:   DepartmentId,
  pub name: String,
  #[serde(default)]
  pub icon: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Priority {
  pub id:   PriorityId,
  pub name: String,
  #[serde(default)]
  pub icon: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Employee {
  pub id:         EmployeeId,
  pub name:       String,
  pub surname:    String,
  #[serde(default)]
  pub avatar:     Option<String>,
  #[serde(default)]
  pub department: Option<Department>
}

impl Employee {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.name, self.surname)
      .trim()
      .to_string()
  }

  /// Two-letter fallback shown when the
  /// avatar image is missing.
  pub fn initials(&self) -> String {
    [&self.name, &self.surname]
      .iter()
      .filter_map(|part| {
        part.trim().chars().next()
      })
      .flat_map(char::to_uppercase)
      .collect()
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Logo {
  pub id:   u64,
  #[serde(default)]
  pub name: String,
  #[serde(default, alias = "url", alias = "logo")]
  pub icon: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct Task {
  pub id:             TaskId,
  pub name:           String,
  #[serde(default)]
  pub description:    Option<String>,
  pub due_date:       String,
  pub status:         Status,
  pub department:     Department,
  pub priority:       Priority,
  pub employee:       Employee,
  #[serde(default)]
  pub total_comments: u32
}

impl Task {
  pub fn due(&self) -> Option<NaiveDate> {
    parse_due_date(&self.due_date)
  }

  pub fn description_text(&self) -> &str {
    self
      .description
      .as_deref()
      .unwrap_or_default()
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Comment {
  pub id:              CommentId,
  pub text:            String,
  pub task_id:         TaskId,
  #[serde(default)]
  pub parent_id:       Option<CommentId>,
  #[serde(default)]
  pub author_avatar:   Option<String>,
  #[serde(default)]
  pub author_nickname: String,
  #[serde(default)]
  pub created_at:      Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Vec::is_empty"
  )]
  pub sub_comments:    Vec<Comment>
}

impl Comment {
  pub fn is_top_level(&self) -> bool {
    self.parent_id.is_none()
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskCreate {
  pub name:          String,
  pub description:   Option<String>,
  pub due_date:      NaiveDate,
  pub status_id:     StatusId,
  pub priority_id:   PriorityId,
  pub department_id: DepartmentId,
  pub employee_id:   EmployeeId
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskStatusUpdate {
  pub status_id: StatusId
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct CommentCreate {
  pub text:      String,
  pub parent_id: Option<CommentId>
}

/// Text fields of `POST /employees`. The
/// avatar file is sent as its own
/// multipart part.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct EmployeeCreate {
  pub name:          String,
  pub surname:       String,
  pub department_id: DepartmentId
}

impl EmployeeCreate {
  pub fn form_fields(
    &self
  ) -> Vec<(&'static str, String)> {
    vec![
      ("name", self.name.clone()),
      ("surname", self.surname.clone()),
      (
        "department_id",
        self.department_id.to_string(),
      ),
    ]
  }
}

/// The API sends due dates either as a
/// bare `YYYY-MM-DD` or as a full
/// timestamp; only the date part matters.
pub fn parse_due_date(
  raw: &str
) -> Option<NaiveDate> {
  let date_part = raw.trim().get(..10)?;
  NaiveDate::parse_from_str(
    date_part, "%Y-%m-%d"
  )
  .ok()
}

pub fn format_due_date(
  raw: &str
) -> String {
  match parse_due_date(raw) {
    | Some(date) => {
      date.format("%a, %d/%m/%Y").to_string()
    }
    | None => raw.to_string()
  }
}

/// Comment timestamp as `dd Mon, HH:MM` in
/// the browser's time zone. Unreadable input
/// renders as nothing.
pub fn format_comment_time(raw: &str) -> String {
  format_comment_time_in(raw, &Local)
}

pub fn format_comment_time_in<Tz>(
  raw: &str,
  zone: &Tz
) -> String
where
  Tz: TimeZone,
  Tz::Offset: std::fmt::Display
{
  let raw = raw.trim();
  let parsed = DateTime::parse_from_rfc3339(raw)
    .map(|stamp| stamp.with_timezone(zone))
    .ok()
    .or_else(|| {
      ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|pattern| {
          NaiveDateTime::parse_from_str(raw, pattern).ok()
        })
        .map(|naive| zone.from_utc_datetime(&naive))
    });

  parsed.map_or_else(String::new, |stamp| {
    stamp.format("%d %b, %H:%M").to_string()
  })
}

/// The API sometimes prefixes an absolute
/// image URL with its own storage path
/// (`…/storage/https://…`); only the inner
/// URL loads.
pub fn normalize_image_url(url: &str) -> String {
  let url = url.trim();
  if url.contains("/storage/https://")
    && let Some((_, inner)) = url.split_once("/storage/")
  {
    return inner.to_string();
  }
  url.to_string()
}

/// Normalized image source, or `None` when
/// there is nothing to load.
pub fn image_src(url: Option<&str>) -> Option<String> {
  url
    .map(normalize_image_url)
    .filter(|src| !src.is_empty())
}

pub fn truncate_text(
  text: &str,
  max_chars: usize
) -> String {
  let trimmed = text.trim();
  if trimmed.chars().count() <= max_chars {
    return trimmed.to_string();
  }
  let mut out: String = trimmed
    .chars()
    .take(max_chars)
    .collect();
  out = out.trim_end().to_string();
  out.push('…');
  out
}
