use std::collections::BTreeSet;

use momentum_shared::{
  FilterDimension,
  FilterStore,
  Task
};
use yew::{
  Callback,
  Html,
  UseStateHandle,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_state
};

use super::{
  FilterBar,
  KanbanBoard
};
use crate::api::Board;
use crate::app::AppContext;
use crate::app::storage::SessionStore;

#[function_component(Dashboard)]
pub fn dashboard() -> Html {
  let context = use_context::<AppContext>()
    .expect("AppContext is provided by App");

  let board = use_state(|| None::<Board>);
  let load_error = use_state(|| None::<String>);
  let filters = {
    let key = context.filter_key.clone();
    use_state(move || FilterStore::load(SessionStore, &key))
  };

  {
    let board = board.clone();
    let load_error = load_error.clone();
    let api = context.api.clone();

    use_effect_with(context.employees_revision, move |revision| {
      let revision = *revision;
      wasm_bindgen_futures::spawn_local(async move {
        tracing::info!(revision, "refreshing board");
        match api.load_board().await {
          | Ok(loaded) => {
            load_error.set(None);
            board.set(Some(loaded));
          }
          | Err(error) => {
            tracing::error!(%error, "board load failed");
            load_error.set(Some(error.to_string()));
          }
        }
      });
      || ()
    });
  }

  let on_departments = {
    let filters = filters.clone();
    Callback::from(move |ids: BTreeSet<u64>| {
      apply_filters(&filters, |store| store.set_departments(ids));
    })
  };
  let on_priorities = {
    let filters = filters.clone();
    Callback::from(move |ids: BTreeSet<u64>| {
      apply_filters(&filters, |store| store.set_priorities(ids));
    })
  };
  let on_employee = {
    let filters = filters.clone();
    Callback::from(move |id: Option<u64>| {
      apply_filters(&filters, |store| store.set_employee(id));
    })
  };
  let on_remove = {
    let filters = filters.clone();
    Callback::from(move |(dimension, id): (FilterDimension, u64)| {
      apply_filters(&filters, |store| store.remove(dimension, id));
    })
  };
  let on_clear = {
    let filters = filters.clone();
    Callback::from(move |_| {
      apply_filters(&filters, FilterStore::clear);
    })
  };

  if let Some(message) = (*load_error).clone() {
    return html! {
        <div class="page-error">
            <h2>{ "Could not load the board" }</h2>
            <p>{ message }</p>
        </div>
    };
  }

  let Some(board) = (*board).clone() else {
    return html! { <div class="loading">{ "Loading tasks…" }</div> };
  };

  let visible: Vec<Task> = filters
    .visible(&board.tasks)
    .into_iter()
    .cloned()
    .collect();

  html! {
      <>
          <h1 class="page-title">{ "Tasks" }</h1>
          <FilterBar
              departments={board.departments.clone()}
              priorities={board.priorities.clone()}
              employees={board.employees.clone()}
              selection={filters.selection().clone()}
              on_departments={on_departments}
              on_priorities={on_priorities}
              on_employee={on_employee}
              on_remove={on_remove}
              on_clear={on_clear}
          />
          <KanbanBoard statuses={board.statuses.clone()} tasks={visible} />
      </>
  }
}

/// Applies one operation to a copy of the
/// store; the store writes through to session
/// storage before the new state is set.
fn apply_filters(
  filters: &UseStateHandle<FilterStore<SessionStore>>,
  apply: impl FnOnce(&mut FilterStore<SessionStore>)
) {
  let mut next = (**filters).clone();
  apply(&mut next);
  tracing::debug!(selection = ?next.selection(), "filters changed");
  filters.set(next);
}
