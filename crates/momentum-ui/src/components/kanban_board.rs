use momentum_shared::filters::group_by_status;
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

use super::KanbanColumn;

#[derive(Properties, PartialEq)]
pub struct KanbanBoardProps {
  pub statuses: Vec<Status>,
  /// Already filtered.
  pub tasks:    Vec<Task>
}

#[function_component(KanbanBoard)]
pub fn kanban_board(
  props: &KanbanBoardProps
) -> Html {
  let visible: Vec<&Task> =
    props.tasks.iter().collect();
  let columns =
    group_by_status(&props.statuses, &visible);

  html! {
      <div class="board">
          {
              for columns.into_iter().enumerate().map(|(column_idx, column)| {
                  html! {
                      <KanbanColumn
                          key={column.status.id.to_string()}
                          status={column.status.clone()}
                          column_idx={column_idx}
                          cards={column.tasks.into_iter().cloned().collect::<Vec<Task>>()}
                      />
                  }
              })
          }
      </div>
  }
}

pub(crate) fn lane_color(
  column_idx: usize
) -> &'static str {
  const LANE_COLORS: [&str; 4] = [
    "#F7BC30", "#FB5607", "#FF006E",
    "#3A86FF"
  ];
  LANE_COLORS[column_idx % LANE_COLORS.len()]
}

#[cfg(test)]
mod tests {
  use super::lane_color;

  #[test]
  fn lane_colors_cycle_after_four_columns() {
    assert_eq!(lane_color(0), "#F7BC30");
    assert_eq!(lane_color(3), "#3A86FF");
    assert_eq!(lane_color(4), lane_color(0));
  }
}
