use momentum_shared::Logo;
use momentum_shared::model::image_src;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_state
};
use yew_router::prelude::Link;

use crate::app::AppContext;
use crate::app::routes::Route;

#[derive(Properties, PartialEq)]
pub struct NavigationProps {
  pub on_add_employee: Callback<MouseEvent>
}

#[function_component(Navigation)]
pub fn navigation(props: &NavigationProps) -> Html {
  let context = use_context::<AppContext>();
  let logo = use_state(|| None::<Logo>);

  {
    let logo = logo.clone();
    let api = context.as_ref().map(|context| context.api.clone());
    use_effect_with((), move |_| {
      if let Some(api) = api {
        wasm_bindgen_futures::spawn_local(async move {
          match api.list_logos().await {
            | Ok(logos) => logo.set(logos.into_iter().next()),
            | Err(error) => {
              tracing::warn!(%error, "failed loading logos; using text brand")
            }
          }
        });
      }
      || ()
    });
  }

  let brand = match (*logo)
    .as_ref()
    .and_then(|logo| image_src(logo.icon.as_deref()))
  {
    | Some(src) => html! { <img src={src} alt="Momentum" /> },
    | None => html! { <span class="brand-text">{ "Momentum" }</span> }
  };

  html! {
      <header class="nav">
          <Link<Route> to={Route::Dashboard} classes={classes!("brand")}>
              { brand }
          </Link<Route>>
          <div class="actions">
              <button class="btn" onclick={props.on_add_employee.clone()}>
                  { "Add employee" }
              </button>
              <Link<Route> to={Route::CreateTask} classes={classes!("btn", "primary")}>
                  { "+ Create task" }
              </Link<Route>>
          </div>
      </header>
  }
}
