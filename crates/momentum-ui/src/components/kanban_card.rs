use momentum_shared::Task;
use momentum_shared::model::{
  format_due_date,
  image_src,
  truncate_text
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};
use yew_router::prelude::use_navigator;

use super::EmployeeAvatar;
use crate::app::routes::Route;

const CARD_DESCRIPTION_CHARS: usize = 100;

#[derive(Properties, PartialEq)]
pub struct KanbanCardProps {
  pub task:   Task,
  pub accent: &'static str
}

#[function_component(KanbanCard)]
pub fn kanban_card(
  props: &KanbanCardProps
) -> Html {
  let navigator = use_navigator();
  let task_id = props.task.id;

  let onclick = Callback::from(
    move |_: MouseEvent| {
      if let Some(navigator) =
        navigator.as_ref()
      {
        navigator
          .push(&Route::Task { task_id });
      }
    }
  );

  let description = truncate_text(
    props.task.description_text(),
    CARD_DESCRIPTION_CHARS
  );

  html! {
      <article class="task-card" style={format!("border-color:{};", props.accent)} {onclick}>
          <div class="kanban-card-meta">
              <span class="badge priority">
                  if let Some(icon) = image_src(props.task.priority.icon.as_deref()) {
                      <img src={icon} alt="" />
                  }
                  { &props.task.priority.name }
              </span>
              <span class="badge department">{ &props.task.department.name }</span>
              <span class="due">{ format_due_date(&props.task.due_date) }</span>
          </div>
          <div class="kanban-card-title">{ &props.task.name }</div>
          if !description.is_empty() {
              <div class="task-subtitle">{ description }</div>
          }
          <div class="kanban-card-footer">
              <EmployeeAvatar employee={props.task.employee.clone()} />
              <span class="comment-count">{ format!("💬 {}", props.task.total_comments) }</span>
          </div>
      </article>
  }
}
