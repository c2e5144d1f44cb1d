use momentum_shared::validation::{
  AvatarFile,
  Field
};
use momentum_shared::{
  Department,
  Employee,
  EmployeeDraft,
  ValidationErrors
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  Url
};
use yew::{
  Callback,
  Event,
  Html,
  InputEvent,
  MouseEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  UseStateHandle,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_node_ref,
  use_state
};

use super::use_outside_click;
use crate::app::AppContext;

#[derive(Properties, PartialEq)]
pub struct EmployeeModalProps {
  pub on_close:   Callback<()>,
  pub on_created: Callback<Employee>
}

#[function_component(EmployeeModal)]
pub fn employee_modal(props: &EmployeeModalProps) -> Html {
  let context = use_context::<AppContext>()
    .expect("AppContext is provided by App");

  let departments = use_state(Vec::<Department>::new);
  let draft = use_state(EmployeeDraft::default);
  let file = use_state(|| None::<web_sys::File>);
  let preview = use_state(|| None::<String>);
  let errors = use_state(ValidationErrors::default);
  let submit_error = use_state(|| None::<String>);
  let submitting = use_state(|| false);
  let dialog = use_node_ref();

  use_outside_click(dialog.clone(), true, props.on_close.clone());

  {
    let departments = departments.clone();
    let submit_error = submit_error.clone();
    let api = context.api.clone();
    use_effect_with((), move |_| {
      wasm_bindgen_futures::spawn_local(async move {
        match api.list_departments().await {
          | Ok(list) => departments.set(list),
          | Err(error) => submit_error.set(Some(error.to_string()))
        }
      });
      || ()
    });
  }

  // Object URLs live until revoked.
  {
    let preview = (*preview).clone();
    use_effect_with(preview, |preview| {
      let preview = preview.clone();
      move || {
        if let Some(url) = preview {
          let _ = Url::revoke_object_url(&url);
        }
      }
    });
  }

  let on_name = {
    let draft = draft.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlInputElement = event.target_unchecked_into();
      edit_draft(&draft, |draft| draft.name = input.value());
    })
  };
  let on_surname = {
    let draft = draft.clone();
    Callback::from(move |event: InputEvent| {
      let input: HtmlInputElement = event.target_unchecked_into();
      edit_draft(&draft, |draft| draft.surname = input.value());
    })
  };
  let on_department = {
    let draft = draft.clone();
    Callback::from(move |event: Event| {
      let select: HtmlSelectElement = event.target_unchecked_into();
      let id = select.value().parse::<u64>().ok();
      edit_draft(&draft, |draft| draft.department_id = id);
    })
  };
  let on_avatar = {
    let draft = draft.clone();
    let file = file.clone();
    let preview = preview.clone();
    Callback::from(move |event: Event| {
      let input: HtmlInputElement = event.target_unchecked_into();
      let chosen = input.files().and_then(|files| files.get(0));
      let metadata = chosen.as_ref().map(|chosen| AvatarFile {
        name:      chosen.name(),
        mime_type: chosen.type_(),
        size:      chosen.size() as u64
      });
      let url = chosen
        .as_ref()
        .filter(|chosen| chosen.type_().starts_with("image/"))
        .and_then(|chosen| Url::create_object_url_with_blob(chosen).ok());

      edit_draft(&draft, |draft| draft.avatar = metadata);
      preview.set(url);
      file.set(chosen);
    })
  };
  let on_remove_avatar = {
    let draft = draft.clone();
    let file = file.clone();
    let preview = preview.clone();
    Callback::from(move |_: MouseEvent| {
      edit_draft(&draft, |draft| draft.avatar = None);
      preview.set(None);
      file.set(None);
    })
  };
  let on_cancel = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| on_close.emit(()))
  };

  let onsubmit = {
    let draft = draft.clone();
    let file = file.clone();
    let errors = errors.clone();
    let submit_error = submit_error.clone();
    let submitting = submitting.clone();
    let on_created = props.on_created.clone();
    let api = context.api.clone();
    Callback::from(move |event: SubmitEvent| {
      event.prevent_default();
      let payload = match draft.validate() {
        | Ok(payload) => payload,
        | Err(rejected) => {
          errors.set(rejected);
          return;
        }
      };
      let Some(avatar) = (*file).clone() else {
        return;
      };
      errors.set(ValidationErrors::default());
      submitting.set(true);

      let api = api.clone();
      let submit_error = submit_error.clone();
      let submitting = submitting.clone();
      let on_created = on_created.clone();
      wasm_bindgen_futures::spawn_local(async move {
        let result = api.create_employee(&payload, &avatar).await;
        submitting.set(false);
        match result {
          | Ok(employee) => on_created.emit(employee),
          | Err(error) => submit_error.set(Some(error.to_string()))
        }
      });
    })
  };

  html! {
      <div class="modal-backdrop">
          <form class="modal" ref={dialog} {onsubmit} novalidate={true}>
              <h2>{ "Add employee" }</h2>

              <div class="row">
                  <label class="field">
                      <span>{ "Name*" }</span>
                      <input type="text" value={draft.name.clone()} oninput={on_name} />
                      { field_error(&errors, Field::Name) }
                  </label>
                  <label class="field">
                      <span>{ "Surname*" }</span>
                      <input type="text" value={draft.surname.clone()} oninput={on_surname} />
                      { field_error(&errors, Field::Surname) }
                  </label>
              </div>

              <div class="field">
                  <span>{ "Avatar*" }</span>
                  if let Some(url) = (*preview).clone() {
                      <div class="avatar-preview">
                          <img src={url} alt="" />
                          <button type="button" class="btn link" onclick={on_remove_avatar}>
                              { "Remove" }
                          </button>
                      </div>
                  } else {
                      <input type="file" accept="image/*" onchange={on_avatar} />
                  }
                  { field_error(&errors, Field::Avatar) }
              </div>

              <label class="field">
                  <span>{ "Department*" }</span>
                  <select onchange={on_department}>
                      <option value="" selected={draft.department_id.is_none()}>{ "—" }</option>
                      {
                          for departments.iter().map(|department| html! {
                              <option
                                  key={department.id.to_string()}
                                  value={department.id.to_string()}
                                  selected={draft.department_id == Some(department.id)}
                              >
                                  { &department.name }
                              </option>
                          })
                      }
                  </select>
                  { field_error(&errors, Field::Department) }
              </label>

              if let Some(message) = (*submit_error).clone() {
                  <p class="inline-error">{ message }</p>
              }
              <div class="actions">
                  <button type="button" class="btn" onclick={on_cancel}>{ "Cancel" }</button>
                  <button type="submit" class="btn primary" disabled={*submitting}>
                      { "Add employee" }
                  </button>
              </div>
          </form>
      </div>
  }
}

fn edit_draft(
  draft: &UseStateHandle<EmployeeDraft>,
  apply: impl FnOnce(&mut EmployeeDraft)
) {
  let mut next = (**draft).clone();
  apply(&mut next);
  draft.set(next);
}

fn field_error(errors: &ValidationErrors, field: Field) -> Html {
  errors
    .for_field(field)
    .map(|problem| html! {
        <p class="inline-error">{ format!("{} {problem}", field.label()) }</p>
    })
    .unwrap_or_default()
}
