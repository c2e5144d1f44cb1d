use momentum_shared::{
  Status,
  Task
};
use yew::{
  Html,
  Properties,
  function_component,
  html
};

use super::{
  KanbanCard,
  lane_color
};

#[derive(Properties, PartialEq)]
pub struct KanbanColumnProps {
  pub status:     Status,
  pub column_idx: usize,
  pub cards:      Vec<Task>
}

#[function_component(KanbanColumn)]
pub fn kanban_column(
  props: &KanbanColumnProps
) -> Html {
  let color = lane_color(props.column_idx);

  html! {
      <div class="kanban-column">
          <div class="column-header" style={format!("background:{color};")}>
              { &props.status.name }
          </div>
          {
              if props.cards.is_empty() {
                  html! { <div class="kanban-empty">{ "No tasks" }</div> }
              } else {
                  html! {
                      <>
                          {
                              for props.cards.iter().map(|task| html! {
                                  <KanbanCard
                                      key={task.id.to_string()}
                                      task={task.clone()}
                                      accent={color}
                                  />
                              })
                          }
                      </>
                  }
              }
          }
      </div>
  }
}
