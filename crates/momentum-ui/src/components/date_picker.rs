use chrono::NaiveDate;
use momentum_shared::widgets::DatePicker;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  UseStateHandle,
  classes,
  function_component,
  html,
  use_node_ref,
  use_state
};

use super::use_outside_click;

const WEEKDAYS: [&str; 7] =
  ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Properties, PartialEq)]
pub struct DateInputProps {
  pub value:     Option<NaiveDate>,
  pub today:     NaiveDate,
  /// Days before this are greyed out.
  #[prop_or_default]
  pub min_date:  Option<NaiveDate>,
  pub on_change: Callback<NaiveDate>
}

#[function_component(DateInput)]
pub fn date_input(props: &DateInputProps) -> Html {
  let picker = {
    let focus = props.value.unwrap_or(props.today);
    let min_date = props.min_date;
    use_state(move || DatePicker::new(focus, min_date))
  };
  let node = use_node_ref();

  let update = {
    let picker = picker.clone();
    move |apply: fn(&mut DatePicker)| {
      let picker = picker.clone();
      Callback::from(move |_: MouseEvent| {
        let mut next = (*picker).clone();
        apply(&mut next);
        picker.set(next);
      })
    }
  };

  {
    let picker = picker.clone();
    use_outside_click(
      node.clone(),
      picker.is_open(),
      Callback::from(move |_| {
        let mut next = (*picker).clone();
        next.dismiss();
        picker.set(next);
      })
    );
  }

  let label = props
    .value
    .map(|date| date.format("%d/%m/%Y").to_string())
    .unwrap_or_else(|| "Choose a date".to_string());

  html! {
      <div class="date-input" ref={node}>
          <button
              type="button"
              class={classes!("dropdown-toggle", picker.is_open().then_some("open"))}
              onclick={update(DatePicker::toggle)}
          >
              { label }
          </button>
          if picker.is_open() {
              <div class="calendar">
                  <div class="calendar-header">
                      <button type="button" onclick={update(DatePicker::previous_month)}>{ "‹" }</button>
                      <span>{ picker.title() }</span>
                      <button type="button" onclick={update(DatePicker::next_month)}>{ "›" }</button>
                  </div>
                  <table>
                      <thead>
                          <tr>
                              { for WEEKDAYS.iter().map(|day| html! { <th>{ *day }</th> }) }
                          </tr>
                      </thead>
                      <tbody>
                          { for picker.weeks().into_iter().map(|week| html! {
                              <tr>
                                  { for week.into_iter().map(|cell| day_cell(&picker, cell, props)) }
                              </tr>
                          }) }
                      </tbody>
                  </table>
              </div>
          }
      </div>
  }
}

fn day_cell(
  picker: &UseStateHandle<DatePicker>,
  cell: Option<NaiveDate>,
  props: &DateInputProps
) -> Html {
  let Some(date) = cell else {
    return html! { <td class="empty"></td> };
  };

  let selectable = picker.is_selectable(date);
  let onclick = {
    let picker = picker.clone();
    let on_change = props.on_change.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*picker).clone();
      if let Some(chosen) = next.choose(date) {
        on_change.emit(chosen);
      }
      picker.set(next);
    })
  };

  html! {
      <td
          class={classes!(
              "day",
              (!selectable).then_some("disabled"),
              (props.value == Some(date)).then_some("selected"),
              (date == props.today).then_some("today")
          )}
          {onclick}
      >
          { date.format("%-d").to_string() }
      </td>
  }
}
