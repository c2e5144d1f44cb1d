pub mod config;
pub mod routes;
pub mod storage;

use gloo::console::log;
use momentum_shared::Employee;
use yew::{
  Callback,
  ContextProvider,
  Html,
  function_component,
  html,
  use_memo,
  use_state
};
use yew_router::{
  BrowserRouter,
  Switch
};

use crate::api::ApiClient;
use crate::components::{
  EmployeeModal,
  Navigation,
  OutsideClickProvider
};
use config::load_app_config;
use routes::{
  Route,
  switch
};

/// Shared by every screen through
/// `use_context`.
#[derive(Clone, PartialEq)]
pub struct AppContext {
  pub api:                ApiClient,
  pub filter_key:         String,
  /// Bumped whenever an employee is created
  /// so pickers reload the employee list.
  pub employees_revision: u64
}

#[function_component(App)]
pub fn app() -> Html {
  let config = use_memo((), |_| load_app_config());
  let employees_revision = use_state(|| 0_u64);
  let employee_modal_open = use_state(|| false);

  let context = AppContext {
    api:                ApiClient::new(&config.api),
    filter_key:         config.session.filter_key.clone(),
    employees_revision: *employees_revision
  };

  let on_add_employee = {
    let employee_modal_open =
      employee_modal_open.clone();
    Callback::from(move |_| {
      ui_debug("nav.add_employee", "opening employee modal");
      employee_modal_open.set(true);
    })
  };

  let on_modal_close = {
    let employee_modal_open =
      employee_modal_open.clone();
    Callback::from(move |_| {
      employee_modal_open.set(false);
    })
  };

  let on_employee_created = {
    let employee_modal_open =
      employee_modal_open.clone();
    let employees_revision =
      employees_revision.clone();
    Callback::from(move |employee: Employee| {
      tracing::info!(
        employee_id = employee.id,
        "employee created"
      );
      employees_revision.set(*employees_revision + 1);
      employee_modal_open.set(false);
    })
  };

  if !config.api.has_token() {
    return html! {
        <div class="page-error">
            <h2>{ "Momentum is not configured" }</h2>
            <p>{ "Build the app with MOMENTUM_API_TOKEN set to the API bearer token." }</p>
        </div>
    };
  }

  html! {
      <BrowserRouter>
          <ContextProvider<AppContext> context={context}>
              <OutsideClickProvider>
                  <Navigation on_add_employee={on_add_employee} />
                  <main class="page">
                      <Switch<Route> render={switch} />
                  </main>
                  if *employee_modal_open {
                      <EmployeeModal
                          on_close={on_modal_close}
                          on_created={on_employee_created}
                      />
                  }
              </OutsideClickProvider>
          </ContextProvider<AppContext>>
      </BrowserRouter>
  }
}

pub fn ui_debug(event: &str, detail: &str) {
  tracing::debug!(event, detail, "ui-debug");
  log!(format!("[ui-debug] {event}: {detail}"));
}
