use std::collections::BTreeSet;

use momentum_shared::model::image_src;
use momentum_shared::widgets::{
  MultiSelect,
  SingleSelect
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html,
  use_node_ref,
  use_state
};

use super::use_outside_click;

#[derive(Clone, PartialEq)]
pub struct SelectOption {
  pub id:     u64,
  pub label:  String,
  pub avatar: Option<String>
}

impl SelectOption {
  pub fn new(id: u64, label: impl Into<String>) -> Self {
    Self {
      id,
      label: label.into(),
      avatar: None
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct MultiSelectDropdownProps {
  pub label:      String,
  pub options:    Vec<SelectOption>,
  pub selected:   BTreeSet<u64>,
  pub on_confirm: Callback<BTreeSet<u64>>
}

/// Checkbox dropdown. Ticks are staged and
/// reach `on_confirm` only through the
/// "Select" button.
#[function_component(MultiSelectDropdown)]
pub fn multi_select_dropdown(
  props: &MultiSelectDropdownProps
) -> Html {
  let state = use_state(MultiSelect::default);
  let node = use_node_ref();

  {
    let state = state.clone();
    use_outside_click(
      node.clone(),
      state.is_open(),
      Callback::from(move |_| {
        let mut next = (*state).clone();
        next.dismiss();
        state.set(next);
      })
    );
  }

  let on_toggle_open = {
    let state = state.clone();
    let committed = props.selected.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*state).clone();
      if next.is_open() {
        next.dismiss();
      } else {
        next.open(&committed);
      }
      state.set(next);
    })
  };

  let on_select = {
    let state = state.clone();
    let on_confirm = props.on_confirm.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*state).clone();
      if let Some(selection) = next.confirm() {
        tracing::debug!(count = selection.len(), "multi-select confirmed");
        on_confirm.emit(selection);
      }
      state.set(next);
    })
  };

  html! {
      <div class="dropdown" ref={node}>
          <button
              class={classes!("dropdown-toggle", state.is_open().then_some("open"))}
              onclick={on_toggle_open}
          >
              { &props.label }
          </button>
          if state.is_open() {
              <div class="dropdown-panel">
                  {
                      for props.options.iter().map(|option| {
                          let id = option.id;
                          let checked = state.is_staged(id);
                          let onclick = {
                              let state = state.clone();
                              Callback::from(move |_: MouseEvent| {
                                  let mut next = (*state).clone();
                                  next.toggle(id);
                                  state.set(next);
                              })
                          };
                          html! {
                              <div class="option" key={id.to_string()} {onclick}>
                                  <input type="checkbox" checked={checked} readonly={true} />
                                  { option_content(option) }
                              </div>
                          }
                      })
                  }
                  <div class="actions">
                      <button class="btn primary" onclick={on_select}>{ "Select" }</button>
                  </div>
              </div>
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct SingleSelectDropdownProps {
  pub label:     String,
  pub options:   Vec<SelectOption>,
  pub selected:  Option<u64>,
  pub on_choose: Callback<Option<u64>>
}

/// Choosing an option commits it at once.
/// Choosing the selected option again clears
/// it.
#[function_component(SingleSelectDropdown)]
pub fn single_select_dropdown(
  props: &SingleSelectDropdownProps
) -> Html {
  let state = use_state(SingleSelect::default);
  let node = use_node_ref();

  {
    let state = state.clone();
    use_outside_click(
      node.clone(),
      state.is_open(),
      Callback::from(move |_| {
        let mut next = (*state).clone();
        next.dismiss();
        state.set(next);
      })
    );
  }

  let on_toggle_open = {
    let state = state.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*state).clone();
      next.toggle();
      state.set(next);
    })
  };

  html! {
      <div class="dropdown" ref={node}>
          <button
              class={classes!("dropdown-toggle", state.is_open().then_some("open"))}
              onclick={on_toggle_open}
          >
              { &props.label }
          </button>
          if state.is_open() {
              <div class="dropdown-panel">
                  {
                      for props.options.iter().map(|option| {
                          let id = option.id;
                          let selected = props.selected == Some(id);
                          let onclick = {
                              let state = state.clone();
                              let on_choose = props.on_choose.clone();
                              Callback::from(move |_: MouseEvent| {
                                  let mut next = (*state).clone();
                                  let choice = if selected { None } else { Some(id) };
                                  if let Some(choice) = next.choose(choice) {
                                      on_choose.emit(choice);
                                  }
                                  state.set(next);
                              })
                          };
                          html! {
                              <div class={classes!("option", selected.then_some("selected"))} key={id.to_string()} {onclick}>
                                  <input type="radio" checked={selected} readonly={true} />
                                  { option_content(option) }
                              </div>
                          }
                      })
                  }
              </div>
          }
      </div>
  }
}

fn option_content(option: &SelectOption) -> Html {
  html! {
      <>
          if let Some(src) = image_src(option.avatar.as_deref()) {
              <img class="avatar" src={src} alt="" />
          }
          <span>{ &option.label }</span>
      </>
  }
}
