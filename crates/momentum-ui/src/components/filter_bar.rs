use std::collections::BTreeSet;

use momentum_shared::{
  Department,
  Employee,
  FilterDimension,
  FilterSelection,
  Priority
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

use super::{
  MultiSelectDropdown,
  SelectOption,
  SingleSelectDropdown
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub departments:    Vec<Department>,
  pub priorities:     Vec<Priority>,
  pub employees:      Vec<Employee>,
  pub selection:      FilterSelection,
  pub on_departments: Callback<BTreeSet<u64>>,
  pub on_priorities:  Callback<BTreeSet<u64>>,
  pub on_employee:    Callback<Option<u64>>,
  pub on_remove:      Callback<(FilterDimension, u64)>,
  pub on_clear:       Callback<()>
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
  let department_options: Vec<SelectOption> = props
    .departments
    .iter()
    .map(|department| SelectOption::new(department.id, department.name.clone()))
    .collect();
  let priority_options: Vec<SelectOption> = props
    .priorities
    .iter()
    .map(|priority| SelectOption {
      id:     priority.id,
      label:  priority.name.clone(),
      avatar: priority.icon.clone()
    })
    .collect();
  let employee_options: Vec<SelectOption> = props
    .employees
    .iter()
    .map(|employee| SelectOption {
      id:     employee.id,
      label:  employee.full_name(),
      avatar: employee.avatar.clone()
    })
    .collect();

  let chips = props.selection.chips();
  let on_clear = {
    let on_clear = props.on_clear.clone();
    Callback::from(move |_: MouseEvent| on_clear.emit(()))
  };

  html! {
      <section class="filters">
          <div class="filter-bar">
              <MultiSelectDropdown
                  label="Department"
                  options={department_options}
                  selected={props.selection.departments.clone()}
                  on_confirm={props.on_departments.clone()}
              />
              <MultiSelectDropdown
                  label="Priority"
                  options={priority_options}
                  selected={props.selection.priorities.clone()}
                  on_confirm={props.on_priorities.clone()}
              />
              <SingleSelectDropdown
                  label="Employee"
                  options={employee_options}
                  selected={props.selection.employee}
                  on_choose={props.on_employee.clone()}
              />
          </div>
          if !chips.is_empty() {
              <div class="chips">
                  {
                      for chips.into_iter().map(|(dimension, id)| {
                          let label = chip_label(props, dimension, id);
                          let on_remove = props.on_remove.clone();
                          html! {
                              <span class="chip" key={format!("{dimension:?}-{id}")}>
                                  { label }
                                  <button
                                      class="chip-remove"
                                      onclick={Callback::from(move |_: MouseEvent| {
                                          on_remove.emit((dimension, id));
                                      })}
                                  >
                                      { "×" }
                                  </button>
                              </span>
                          }
                      })
                  }
                  <button class="btn link" onclick={on_clear}>{ "Clear all" }</button>
              </div>
          }
      </section>
  }
}

fn chip_label(
  props: &FilterBarProps,
  dimension: FilterDimension,
  id: u64
) -> String {
  let found = match dimension {
    | FilterDimension::Department => props
      .departments
      .iter()
      .find(|department| department.id == id)
      .map(|department| department.name.clone()),
    | FilterDimension::Priority => props
      .priorities
      .iter()
      .find(|priority| priority.id == id)
      .map(|priority| priority.name.clone()),
    | FilterDimension::Employee => props
      .employees
      .iter()
      .find(|employee| employee.id == id)
      .map(Employee::full_name)
  };
  found.unwrap_or_else(|| format!("#{id}"))
}
