use momentum_shared::model::TaskId;
use yew::{
  Html,
  html
};
use yew_router::Routable;

use crate::components::{
  Dashboard,
  TaskDetail,
  TaskForm
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
  #[at("/")]
  Dashboard,
  #[at("/create")]
  CreateTask,
  #[at("/edit/:id")]
  EditTask { id: TaskId },
  #[at("/tasks/:task_id")]
  Task { task_id: TaskId },
  #[at("/task/:task_id/comments")]
  TaskComments { task_id: TaskId },
  #[not_found]
  #[at("/404")]
  NotFound
}

pub fn switch(route: Route) -> Html {
  tracing::debug!(
    path = %route.to_path(),
    "routing"
  );
  match route {
    | Route::Dashboard => {
      html! { <Dashboard /> }
    }
    | Route::CreateTask => {
      html! { <TaskForm task_id={None::<TaskId>} /> }
    }
    | Route::EditTask { id } => {
      html! { <TaskForm task_id={Some(id)} /> }
    }
    | Route::Task { task_id } => html! {
      <TaskDetail task_id={task_id} focus_comments={false} />
    },
    | Route::TaskComments { task_id } => html! {
      <TaskDetail task_id={task_id} focus_comments={true} />
    },
    | Route::NotFound => html! {
      <div class="page-error">{ "Page not found." }</div>
    }
  }
}
