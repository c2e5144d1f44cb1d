use gloo::net::http::{
  Request,
  RequestBuilder
};
use momentum_shared::error::decode_response;
use momentum_shared::model::{
  CommentId,
  TaskId
};
use momentum_shared::{
  ApiError,
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
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::app::config::ApiConfig;

/// Authenticated client for the task
/// service. One attempt per call: no retry,
/// no timeout, no de-duplication.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
  base_url: String,
  token:    String
}

/// Everything the dashboard needs, fetched
/// as one batch.
#[derive(Clone, Default, PartialEq)]
pub struct Board {
  pub tasks:       Vec<Task>,
  pub statuses:    Vec<Status>,
  pub departments: Vec<Department>,
  pub priorities:  Vec<Priority>,
  pub employees:   Vec<Employee>
}

#[derive(Clone, PartialEq)]
pub struct TaskPage {
  pub task:     Task,
  pub comments: Vec<Comment>,
  pub statuses: Vec<Status>
}

#[derive(Clone, Default, PartialEq)]
pub struct FormOptions {
  pub statuses:    Vec<Status>,
  pub priorities:  Vec<Priority>,
  pub departments: Vec<Department>,
  pub employees:   Vec<Employee>
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Self {
    Self {
      base_url: config.base_url.clone(),
      token:    config.token.clone()
    }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }

  fn authorize(
    &self,
    builder: RequestBuilder
  ) -> RequestBuilder {
    builder
      .header(
        "Authorization",
        &format!("Bearer {}", self.token)
      )
      .header("Accept", "application/json")
  }

  async fn get<T>(
    &self,
    path: &str
  ) -> Result<T, ApiError>
  where
    T: DeserializeOwned
  {
    let request = self
      .authorize(Request::get(&self.url(path)))
      .header(
        "Content-Type",
        "application/json"
      )
      .build()
      .map_err(|error| {
        ApiError::Encode(error.to_string())
      })?;
    send("GET", path, request).await
  }

  async fn post<T, B>(
    &self,
    path: &str,
    body: &B
  ) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized
  {
    let request = self
      .authorize(Request::post(&self.url(path)))
      .json(body)
      .map_err(|error| {
        ApiError::Encode(error.to_string())
      })?;
    send("POST", path, request).await
  }

  async fn put<T, B>(
    &self,
    path: &str,
    body: &B
  ) -> Result<T, ApiError>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized
  {
    let request = self
      .authorize(Request::put(&self.url(path)))
      .json(body)
      .map_err(|error| {
        ApiError::Encode(error.to_string())
      })?;
    send("PUT", path, request).await
  }

  pub async fn list_tasks(
    &self
  ) -> Result<Vec<Task>, ApiError> {
    self.get("/tasks").await
  }

  pub async fn get_task(
    &self,
    id: TaskId
  ) -> Result<Task, ApiError> {
    self.get(&format!("/tasks/{id}")).await
  }

  pub async fn create_task(
    &self,
    payload: &TaskCreate
  ) -> Result<Task, ApiError> {
    self.post("/tasks", payload).await
  }

  pub async fn update_task(
    &self,
    id: TaskId,
    payload: &TaskCreate
  ) -> Result<Task, ApiError> {
    self
      .put(&format!("/tasks/{id}"), payload)
      .await
  }

  pub async fn update_task_status(
    &self,
    id: TaskId,
    payload: &TaskStatusUpdate
  ) -> Result<Task, ApiError> {
    self
      .put(&format!("/tasks/{id}"), payload)
      .await
  }

  pub async fn list_statuses(
    &self
  ) -> Result<Vec<Status>, ApiError> {
    self.get("/statuses").await
  }

  pub async fn list_departments(
    &self
  ) -> Result<Vec<Department>, ApiError> {
    self.get("/departments").await
  }

  pub async fn list_priorities(
    &self
  ) -> Result<Vec<Priority>, ApiError> {
    self.get("/priorities").await
  }

  pub async fn list_employees(
    &self
  ) -> Result<Vec<Employee>, ApiError> {
    self.get("/employees").await
  }

  pub async fn list_logos(
    &self
  ) -> Result<Vec<Logo>, ApiError> {
    self.get("/logos").await
  }

  pub async fn list_comments(
    &self,
    task_id: TaskId
  ) -> Result<Vec<Comment>, ApiError> {
    self
      .get(&format!("/tasks/{task_id}/comments"))
      .await
  }

  pub async fn create_comment(
    &self,
    task_id: TaskId,
    payload: &CommentCreate
  ) -> Result<Comment, ApiError> {
    self
      .post(
        &format!("/tasks/{task_id}/comments"),
        payload
      )
      .await
  }

  /// Sent as `multipart/form-data`; the
  /// browser sets the boundary header.
  pub async fn create_employee(
    &self,
    payload: &EmployeeCreate,
    avatar: &web_sys::File
  ) -> Result<Employee, ApiError> {
    let form = web_sys::FormData::new()
      .map_err(js_encode_error)?;
    for (key, value) in payload.form_fields() {
      form
        .append_with_str(key, &value)
        .map_err(js_encode_error)?;
    }
    form
      .append_with_blob_and_filename(
        "avatar",
        avatar,
        &avatar.name()
      )
      .map_err(js_encode_error)?;

    let request = self
      .authorize(Request::post(
        &self.url("/employees")
      ))
      .body(form)
      .map_err(|error| {
        ApiError::Encode(error.to_string())
      })?;
    send("POST", "/employees", request).await
  }

  pub async fn load_board(
    &self
  ) -> Result<Board, ApiError> {
    let (
      tasks,
      statuses,
      departments,
      priorities,
      employees
    ) = futures::try_join!(
      self.list_tasks(),
      self.list_statuses(),
      self.list_departments(),
      self.list_priorities(),
      self.list_employees()
    )?;

    tracing::info!(
      tasks = tasks.len(),
      statuses = statuses.len(),
      "loaded board"
    );
    Ok(Board {
      tasks,
      statuses,
      departments,
      priorities,
      employees
    })
  }

  pub async fn load_task_page(
    &self,
    id: TaskId
  ) -> Result<TaskPage, ApiError> {
    let (task, comments, statuses) = futures::try_join!(
      self.get_task(id),
      self.list_comments(id),
      self.list_statuses()
    )?;

    tracing::info!(
      task_id = id,
      comments = comments.len(),
      "loaded task page"
    );
    Ok(TaskPage {
      task,
      comments,
      statuses
    })
  }

  pub async fn load_form_options(
    &self
  ) -> Result<FormOptions, ApiError> {
    let (
      statuses,
      priorities,
      departments,
      employees
    ) = futures::try_join!(
      self.list_statuses(),
      self.list_priorities(),
      self.list_departments(),
      self.list_employees()
    )?;

    Ok(FormOptions {
      statuses,
      priorities,
      departments,
      employees
    })
  }
}

async fn send<T>(
  method: &str,
  path: &str,
  request: Request
) -> Result<T, ApiError>
where
  T: DeserializeOwned
{
  let response =
    request.send().await.map_err(|error| {
      tracing::error!(method, path, %error, "request failed to send");
      ApiError::Transport(error.to_string())
    })?;
  let status = response.status();
  let body =
    response.text().await.map_err(|error| {
      ApiError::Transport(error.to_string())
    })?;

  tracing::debug!(
    method,
    path,
    status,
    "api response"
  );
  decode_response(status, &body).inspect_err(
    |error| {
      tracing::error!(method, path, %error, "api call failed");
    }
  )
}

fn js_encode_error(
  error: wasm_bindgen::JsValue
) -> ApiError {
  ApiError::Encode(format!("{error:?}"))
}

/// Reply target of a comment about to be
/// posted, for log fields.
pub fn describe_target(
  parent_id: Option<CommentId>
) -> String {
  parent_id.map_or_else(
    || "top-level".to_string(),
    |id| format!("reply to #{id}")
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn urls_join_base_and_path() {
    let client = ApiClient::new(&ApiConfig {
      base_url: "https://example.test/api".to_string(),
      token:    "secret".to_string()
    });
    assert_eq!(
      client.url("/tasks/4/comments"),
      "https://example.test/api/tasks/4/comments"
    );
  }

  #[test]
  fn comment_targets_are_described_for_logs() {
    assert_eq!(describe_target(None), "top-level");
    assert_eq!(describe_target(Some(9)), "reply to #9");
  }
}
