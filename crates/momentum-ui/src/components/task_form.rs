use chrono::NaiveDate;
use momentum_shared::model::TaskId;
use momentum_shared::validation::{
  Field,
  employees_in_department
};
use momentum_shared::{
  Task,
  TaskDraft,
  ValidationErrors
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  UseStateHandle,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_state
};
use yew_router::prelude::use_navigator;

use super::DateInput;
use crate::api::FormOptions;
use crate::app::AppContext;
use crate::app::routes::Route;

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  /// `None` creates a new task.
  pub task_id: Option<TaskId>
}

/// Create and edit form. Nothing is sent
/// until the draft validates.
#[function_component(TaskForm)]
pub fn task_form(props: &TaskFormProps) -> Html {
  let context = use_context::<AppContext>()
    .expect("AppContext is provided by App");
  let navigator = use_navigator();
  let task_id = props.task_id;
  let today = chrono::Local::now().date_naive();

  let options = use_state(|| None::<FormOptions>);
  let draft = use_state(TaskDraft::default);
  let errors = use_state(ValidationErrors::default);
  let load_error = use_state(|| None::<String>);
  let submit_error = use_state(|| None::<String>);
  let submitting = use_state(|| false);

  {
    let options = options.clone();
    let draft = draft.clone();
    let load_error = load_error.clone();
    let api = context.api.clone();

    use_effect_with(task_id, move |task_id| {
      let task_id = *task_id;
      wasm_bindgen_futures::spawn_local(async move {
        let loaded = match task_id {
          | Some(id) => futures::try_join!(
            api.load_form_options(),
            api.get_task(id)
          )
          .map(|(options, task)| (options, Some(task))),
          | None => api
            .load_form_options()
            .await
            .map(|options| (options, None))
        };

        match loaded {
          | Ok((loaded, task)) => {
            let initial = match task {
              | Some(task) => draft_from_task(&task),
              | None => TaskDraft {
                status_id: loaded.statuses.first().map(|status| status.id),
                ..TaskDraft::default()
              }
            };
            draft.set(initial);
            options.set(Some(loaded));
          }
          | Err(error) => {
            tracing::error!(?task_id, %error, "task form load failed");
            load_error.set(Some(error.to_string()));
          }
        }
      });
      || ()
    });
  }

  // A new employee may have been added from
  // the navigation bar.
  {
    let options = options.clone();
    let api = context.api.clone();

    use_effect_with(context.employees_revision, move |revision| {
      let revision = *revision;
      if revision > 0 {
        wasm_bindgen_futures::spawn_local(async move {
          match api.list_employees().await {
            | Ok(employees) => {
              if let Some(current) = (*options).clone() {
                options.set(Some(FormOptions {
                  employees,
                  ..current
                }));
              }
            }
            | Err(error) => {
              tracing::warn!(revision, %error, "employee reload failed");
            }
          }
        });
      }
      || ()
    });
  }

  let on_title = {
    let draft = draft.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlInputElement = event.target_unchecked_into();
      edit_draft(&draft, |draft| draft.title = input.value());
    })
  };
  let on_description = {
    let draft = draft.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlTextAreaElement = event.target_unchecked_into();
      edit_draft(&draft, |draft| draft.description = input.value());
    })
  };
  let on_due_date = {
    let draft = draft.clone();
    Callback::from(move |date: NaiveDate| {
      edit_draft(&draft, |draft| draft.due_date = Some(date));
    })
  };
  let on_status = {
    let draft = draft.clone();
    Callback::from(move |id: Option<u64>| {
      edit_draft(&draft, |draft| draft.status_id = id);
    })
  };
  let on_priority = {
    let draft = draft.clone();
    Callback::from(move |id: Option<u64>| {
      edit_draft(&draft, |draft| draft.priority_id = id);
    })
  };
  let on_department = {
    let draft = draft.clone();
    let options = options.clone();
    Callback::from(move |id: Option<u64>| {
      let employees = (*options)
        .as_ref()
        .map(|options| options.employees.clone())
        .unwrap_or_default();
      edit_draft(&draft, |draft| {
        draft.department_id = id;
        let still_eligible = employees_in_department(&employees, id)
          .iter()
          .any(|employee| Some(employee.id) == draft.employee_id);
        if !still_eligible {
          draft.employee_id = None;
        }
      });
    })
  };
  let on_employee = {
    let draft = draft.clone();
    Callback::from(move |id: Option<u64>| {
      edit_draft(&draft, |draft| draft.employee_id = id);
    })
  };

  let onsubmit = {
    let draft = draft.clone();
    let options = options.clone();
    let errors = errors.clone();
    let submit_error = submit_error.clone();
    let submitting = submitting.clone();
    let api = context.api.clone();
    Callback::from(move |event: SubmitEvent| {
      event.prevent_default();
      let employees = (*options)
        .as_ref()
        .map(|options| options.employees.clone())
        .unwrap_or_default();

      let payload = match draft.validate(today, &employees) {
        | Ok(payload) => payload,
        | Err(rejected) => {
          errors.set(rejected);
          return;
        }
      };
      errors.set(ValidationErrors::default());
      submitting.set(true);

      let api = api.clone();
      let navigator = navigator.clone();
      let submit_error = submit_error.clone();
      let submitting = submitting.clone();
      wasm_bindgen_futures::spawn_local(async move {
        let result = match task_id {
          | Some(id) => api.update_task(id, &payload).await,
          | None => api.create_task(&payload).await
        };
        submitting.set(false);

        match result {
          | Ok(saved) => {
            tracing::info!(task_id = saved.id, "task saved");
            if let Some(navigator) = navigator.as_ref() {
              navigator.push(&Route::Task { task_id: saved.id });
            }
          }
          | Err(error) => submit_error.set(Some(error.to_string()))
        }
      });
    })
  };

  if let Some(message) = (*load_error).clone() {
    return html! {
        <div class="page-error">
            <h2>{ "Could not load the form" }</h2>
            <p>{ message }</p>
        </div>
    };
  }

  let Some(loaded) = (*options).clone() else {
    return html! { <div class="loading">{ "Loading…" }</div> };
  };

  let title = if task_id.is_some() { "Edit task" } else { "Create new task" };
  let statuses: Vec<(u64, String)> = loaded
    .statuses
    .iter()
    .map(|status| (status.id, status.name.clone()))
    .collect();
  let priorities: Vec<(u64, String)> = loaded
    .priorities
    .iter()
    .map(|priority| (priority.id, priority.name.clone()))
    .collect();
  let departments: Vec<(u64, String)> = loaded
    .departments
    .iter()
    .map(|department| (department.id, department.name.clone()))
    .collect();
  let employees: Vec<(u64, String)> =
    employees_in_department(&loaded.employees, draft.department_id)
      .into_iter()
      .map(|employee| (employee.id, employee.full_name()))
      .collect();

  html! {
      <form class="task-form" {onsubmit} novalidate={true}>
          <h1 class="page-title">{ title }</h1>

          <label class="field">
              <span>{ "Title*" }</span>
              <input type="text" value={draft.title.clone()} oninput={on_title} />
              { field_error(&errors, Field::Title) }
          </label>

          <label class="field">
              <span>{ "Description" }</span>
              <textarea value={draft.description.clone()} oninput={on_description} />
              { field_error(&errors, Field::Description) }
          </label>

          { select_field("Priority*", &priorities, draft.priority_id, on_priority) }
          { field_error(&errors, Field::Priority) }
          { select_field("Status*", &statuses, draft.status_id, on_status) }
          { field_error(&errors, Field::Status) }
          { select_field("Department*", &departments, draft.department_id, on_department) }
          { field_error(&errors, Field::Department) }
          { select_field("Employee*", &employees, draft.employee_id, on_employee) }
          { field_error(&errors, Field::Employee) }

          <div class="field">
              <span>{ "Due date*" }</span>
              <DateInput
                  value={draft.due_date}
                  today={today}
                  min_date={Some(today)}
                  on_change={on_due_date}
              />
              { field_error(&errors, Field::DueDate) }
          </div>

          if let Some(message) = (*submit_error).clone() {
              <p class="inline-error">{ message }</p>
          }
          <button type="submit" class="btn primary" disabled={*submitting}>
              { if task_id.is_some() { "Save task" } else { "Create task" } }
          </button>
      </form>
  }
}

fn draft_from_task(task: &Task) -> TaskDraft {
  TaskDraft {
    title:          task.name.clone(),
    description:    task.description_text().to_string(),
    due_date:       task.due(),
    status_id:      Some(task.status.id),
    priority_id:    Some(task.priority.id),
    department_id:  Some(task.department.id),
    employee_id:    Some(task.employee.id),
    saved_due_date: task.due()
  }
}

fn edit_draft(
  draft: &UseStateHandle<TaskDraft>,
  apply: impl FnOnce(&mut TaskDraft)
) {
  let mut next = (**draft).clone();
  apply(&mut next);
  draft.set(next);
}

fn field_error(errors: &ValidationErrors, field: Field) -> Html {
  match errors.for_field(field) {
    | Some(problem) => html! {
        <p class="inline-error">{ format!("{} {problem}", field.label()) }</p>
    },
    | None => html! {}
  }
}

/// `<select>` with an empty first entry;
/// choosing it emits `None`.
fn select_field(
  label: &'static str,
  options: &[(u64, String)],
  selected: Option<u64>,
  on_change: Callback<Option<u64>>
) -> Html {
  let onchange = Callback::from(move |event: Event| {
    let select: HtmlSelectElement = event.target_unchecked_into();
    on_change.emit(select.value().parse::<u64>().ok());
  });

  html! {
      <label class="field">
          <span>{ label }</span>
          <select {onchange}>
              <option value="" selected={selected.is_none()}>{ "—" }</option>
              {
                  for options.iter().map(|(id, name)| html! {
                      <option
                          key={id.to_string()}
                          value={id.to_string()}
                          selected={selected == Some(*id)}
                      >
                          { name }
                      </option>
                  })
              }
          </select>
      </label>
  }
}

#[cfg(test)]
mod tests {
  use momentum_shared::{
    Department,
    Employee,
    Priority,
    Status
  };

  use super::*;

  fn overdue_task() -> Task {
    let department = Department {
      id:   3,
      name: "Design".to_string(),
      icon: None
    };
    Task {
      id:             7,
      name:           "Refresh icons".to_string(),
      description:    None,
      due_date:       "2026-01-10T00:00:00.000000Z".to_string(),
      status:         Status {
        id:   2,
        name: "In progress".to_string()
      },
      department:     department.clone(),
      priority:       Priority {
        id:   1,
        name: "Low".to_string(),
        icon: None
      },
      employee:       Employee {
        id:         4,
        name:       "Nino".to_string(),
        surname:    "Beridze".to_string(),
        avatar:     None,
        department: Some(department)
      },
      total_comments: 0
    }
  }

  #[test]
  fn editing_an_overdue_task_keeps_its_date() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19)
      .expect("valid date");
    let draft = draft_from_task(&overdue_task());

    let payload = draft
      .validate(today, &[])
      .expect("saved date is accepted");
    assert_eq!(
      payload.due_date,
      NaiveDate::from_ymd_opt(2026, 1, 10)
        .expect("valid date")
    );
  }
}
